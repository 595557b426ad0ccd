// src/ingest.rs

//! CSV ingestion as a workflow pipeline.
//!
//! `check_file -> parse_csv -> validate_rows -> submit_batch`. Validation is
//! all-or-nothing: a single bad row means the submitter is never called.

use std::path::Path;
use std::sync::Arc;

use stockroom_core::schema::{render_row_errors, RowError};
use stockroom_core::{ContextData, Pipeline, PipelineControl, ProductInput, WorkflowError};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::rows::TextRow;
use crate::store::{BatchSubmitter, StoreError};

pub const CSV_MEDIA_TYPE: &str = "text/csv";

#[derive(Debug, Error)]
pub enum IngestError {
  #[error("{0}")]
  File(&'static str),

  #[error("Could not parse CSV: {0}")]
  Parse(String),

  /// Row numbers count the header line, so the first data row is row 2.
  #[error("{}", render_row_errors("Row", .0))]
  Rows(Vec<RowError>),

  #[error("CSV file contains no product rows")]
  Empty,

  #[error(transparent)]
  Submit(#[from] StoreError),

  #[error("Ingestion pipeline failed: {0}")]
  Workflow(#[from] WorkflowError),
}

/// A file handed to the ingestor, as a browser would describe an upload.
#[derive(Debug, Clone)]
pub struct CsvUpload {
  pub file_name: String,
  pub media_type: String,
  pub contents: Vec<u8>,
}

impl CsvUpload {
  pub fn new(file_name: impl Into<String>, media_type: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
    Self {
      file_name: file_name.into(),
      media_type: media_type.into(),
      contents: contents.into(),
    }
  }

  /// Reads a file from disk. The media type is guessed from the extension.
  pub fn from_path(path: &Path) -> std::io::Result<Self> {
    let contents = std::fs::read(path)?;
    let file_name = path
      .file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .unwrap_or_default();
    let media_type = if has_csv_extension(&file_name) {
      CSV_MEDIA_TYPE
    } else {
      "application/octet-stream"
    };
    Ok(Self::new(file_name, media_type, contents))
  }
}

fn has_csv_extension(file_name: &str) -> bool {
  file_name.to_ascii_lowercase().ends_with(".csv")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
  /// Validated rows in file order.
  pub rows: Vec<ProductInput>,
  /// False for a dry run.
  pub submitted: bool,
}

pub struct IngestCtx {
  pub upload: CsvUpload,
  pub submitter: Arc<dyn BatchSubmitter>,
  pub dry_run: bool,
  pub parsed: Vec<TextRow>,
  pub validated: Vec<ProductInput>,
  pub submitted: bool,
}

impl IngestCtx {
  pub fn new(upload: CsvUpload, submitter: Arc<dyn BatchSubmitter>, dry_run: bool) -> Self {
    Self {
      upload,
      submitter,
      dry_run,
      parsed: Vec::new(),
      validated: Vec::new(),
      submitted: false,
    }
  }
}

pub struct CsvIngestor {
  pipeline: Pipeline<IngestCtx, IngestError>,
}

impl Default for CsvIngestor {
  fn default() -> Self {
    Self::new()
  }
}

impl CsvIngestor {
  pub fn new() -> Self {
    let mut p = Pipeline::<IngestCtx, IngestError>::new(&[
      ("check_file", false, None),
      ("parse_csv", false, None),
      ("validate_rows", false, None),
      (
        "submit_batch",
        false,
        Some(Arc::new(|ctx: &ContextData<IngestCtx>| ctx.read().dry_run)),
      ),
    ]);

    p.on_step("check_file", check_file_step);
    p.on_step("parse_csv", parse_csv_step);
    p.on_step("validate_rows", validate_rows_step);
    p.on_step("submit_batch", submit_batch_step);

    Self { pipeline: p }
  }

  /// Runs one upload through the pipeline. With `dry_run` the rows are
  /// checked but not handed to `submitter`.
  #[instrument(name = "ingest", skip_all, fields(file = %upload.file_name, dry_run = dry_run), err(Display))]
  pub async fn ingest(
    &self,
    upload: CsvUpload,
    submitter: Arc<dyn BatchSubmitter>,
    dry_run: bool,
  ) -> Result<IngestReport, IngestError> {
    let ctx = ContextData::new(IngestCtx::new(upload, submitter, dry_run));
    self.pipeline.run(ctx.clone()).await?;

    let guard = ctx.read();
    Ok(IngestReport {
      rows: guard.validated.clone(),
      submitted: guard.submitted,
    })
  }
}

async fn check_file_step(ctx: ContextData<IngestCtx>) -> Result<PipelineControl, IngestError> {
  let guard = ctx.read();
  if guard.upload.media_type != CSV_MEDIA_TYPE {
    return Err(IngestError::File("Only CSV files are allowed"));
  }
  if !has_csv_extension(&guard.upload.file_name) {
    return Err(IngestError::File("File must have .csv extension"));
  }
  Ok(PipelineControl::Continue)
}

#[instrument(name = "ingest::parse_csv", skip_all, err(Display))]
async fn parse_csv_step(ctx: ContextData<IngestCtx>) -> Result<PipelineControl, IngestError> {
  let parsed = {
    let guard = ctx.read();
    parse_rows(&guard.upload.contents)?
  };
  if parsed.is_empty() {
    return Err(IngestError::Empty);
  }
  info!(rows = parsed.len(), "CSV parsed.");
  ctx.write().parsed = parsed;
  Ok(PipelineControl::Continue)
}

/// Cells are looked up by header name. A row shorter than the header leaves
/// the trailing fields missing; cells past the header are ignored. Either way
/// the row goes on to validation rather than failing the file.
fn parse_rows(contents: &[u8]) -> Result<Vec<TextRow>, IngestError> {
  let parse_error = |e: csv::Error| IngestError::Parse(e.to_string());
  let mut reader = csv::ReaderBuilder::new()
    .has_headers(true)
    .flexible(true)
    .trim(csv::Trim::Headers)
    .from_reader(contents);

  let headers = reader.headers().map_err(parse_error)?.clone();
  let column = |name: &str| headers.iter().position(|h| h == name);
  let (sku, quantity, description, store) = (column("sku"), column("quantity"), column("description"), column("store"));

  reader
    .records()
    .map(|record| -> Result<TextRow, IngestError> {
      let record = record.map_err(parse_error)?;
      let cell = |index: Option<usize>| {
        index
          .and_then(|i| record.get(i))
          .filter(|v| !v.is_empty())
          .map(str::to_string)
      };
      Ok(TextRow {
        sku: cell(sku),
        quantity: cell(quantity),
        description: cell(description),
        store: cell(store),
      })
    })
    .collect()
}

async fn validate_rows_step(ctx: ContextData<IngestCtx>) -> Result<PipelineControl, IngestError> {
  let parsed = std::mem::take(&mut ctx.write().parsed);
  let mut validated = Vec::with_capacity(parsed.len());
  let mut failures = Vec::new();

  for (index, row) in parsed.iter().enumerate() {
    match row.validate() {
      Ok(input) => validated.push(input),
      Err(errors) => failures.push(RowError { row: index + 2, errors }),
    }
  }

  if !failures.is_empty() {
    warn!(bad_rows = failures.len(), "CSV rejected.");
    return Err(IngestError::Rows(failures));
  }
  ctx.write().validated = validated;
  Ok(PipelineControl::Continue)
}

#[instrument(name = "ingest::submit_batch", skip_all, err(Display))]
async fn submit_batch_step(ctx: ContextData<IngestCtx>) -> Result<PipelineControl, IngestError> {
  let (submitter, batch) = {
    let guard = ctx.read();
    (guard.submitter.clone(), guard.validated.clone())
  };

  let rows = batch.len();
  submitter.submit(batch).await?;
  info!(rows, "CSV batch submitted.");
  ctx.write().submitted = true;
  Ok(PipelineControl::Continue)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn header_names_are_trimmed_and_extra_columns_ignored() {
    let rows = parse_rows(b" sku , quantity ,store,notes\nA-1,3,LON,x\n").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].sku.as_deref(), Some("A-1"));
    assert_eq!(rows[0].store.as_deref(), Some("LON"));
    assert_eq!(rows[0].description, None);
  }

  #[test]
  fn blank_lines_are_skipped() {
    let rows = parse_rows(b"sku,quantity,description,store\n\nA-1,3,,LON\n\n").unwrap();
    assert_eq!(rows.len(), 1);
  }

  #[test]
  fn short_and_long_rows_are_kept_for_validation() {
    let rows = parse_rows(b"sku,quantity,description,store\nA-1,3\nB-2,4,,LON,extra\n").unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].quantity.as_deref(), Some("3"));
    assert_eq!(rows[0].store, None);
    assert_eq!(rows[1].store.as_deref(), Some("LON"));
  }

  #[test]
  fn invalid_utf8_fails_the_file() {
    let err = parse_rows(b"sku,quantity,description,store\nA-1,3,\xff\xfe,LON\n").unwrap_err();
    assert!(matches!(err, IngestError::Parse(_)));
  }

  #[test]
  fn extension_check_ignores_case() {
    assert!(has_csv_extension("stock.CSV"));
    assert!(!has_csv_extension("stock.csv.txt"));
  }
}
