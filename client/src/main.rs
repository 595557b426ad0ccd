// src/main.rs

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use stockroom_client::table::{paginate, render_page, DEFAULT_PAGE_SIZE};
use stockroom_client::{CsvIngestor, CsvUpload, EntryForm, IdentityStore, ProductStoreClient, DEFAULT_API_URL};
use stockroom_core::Product;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "stockroom", version, about = "Manage inventory records on a Stockroom server")]
struct Cli {
  /// Base URL of the API, including the version prefix.
  #[arg(long, env = "STOCKROOM_API_URL", default_value = DEFAULT_API_URL)]
  api_url: String,

  /// Where the client identifier is kept.
  #[arg(long, env = "STOCKROOM_IDENTITY_FILE")]
  identity_file: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Show one page of your products.
  List {
    #[arg(long, default_value_t = 1)]
    page: usize,
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,
  },
  /// Add a single product.
  Add {
    #[arg(long)]
    sku: String,
    /// Whole number, zero or more.
    #[arg(long)]
    quantity: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long)]
    store: String,
  },
  /// Upload a CSV file with the header `sku,quantity,description,store`.
  Upload {
    file: PathBuf,
    /// Validate the file without sending anything.
    #[arg(long)]
    dry_run: bool,
  },
  /// Delete one of your products by id.
  Delete { id: i64 },
  /// Print this client's identifier.
  Whoami,
}

#[tokio::main]
async fn main() -> ExitCode {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
    .with_writer(std::io::stderr)
    .init();

  match run(Cli::parse()).await {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      eprintln!("error: {:#}", err);
      ExitCode::FAILURE
    }
  }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
  let identity_path = cli
    .identity_file
    .or_else(IdentityStore::default_path)
    .context("No identity file location; set STOCKROOM_IDENTITY_FILE or HOME")?;
  let client = Arc::new(ProductStoreClient::new(cli.api_url, IdentityStore::new(identity_path)));

  match cli.command {
    Command::List { page, page_size } => {
      let products = client.list().await?;
      print_page(&products, page, page_size);
    }
    Command::Add {
      sku,
      quantity,
      description,
      store,
    } => {
      let mut form = EntryForm {
        sku,
        quantity,
        description,
        store,
      };
      let added = form.submit(client.as_ref()).await?;
      println!("Added {} ({} at {}).", added.sku, added.quantity, added.store);
      print_page(&client.snapshot(), 1, DEFAULT_PAGE_SIZE);
    }
    Command::Upload { file, dry_run } => {
      let upload = CsvUpload::from_path(&file).with_context(|| format!("Could not read {}", file.display()))?;
      let report = CsvIngestor::new().ingest(upload, client.clone(), dry_run).await?;
      if report.submitted {
        println!("Uploaded {} products.", report.rows.len());
        print_page(&client.snapshot(), 1, DEFAULT_PAGE_SIZE);
      } else {
        println!("{} rows are valid; nothing was sent.", report.rows.len());
      }
    }
    Command::Delete { id } => {
      let products = client.remove(id).await?;
      println!("Deleted product {}.", id);
      print_page(&products, 1, DEFAULT_PAGE_SIZE);
    }
    Command::Whoami => {
      println!("{}", client.user_id()?);
    }
  }
  Ok(())
}

fn print_page(products: &[Product], number: usize, page_size: usize) {
  print!("{}", render_page(&paginate(products, number, page_size)));
}
