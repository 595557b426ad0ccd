// src/main.rs

use actix_cors::Cors;
use actix_web::{web as actix_data, App, HttpServer};
use stockroom_server::config::AppConfig;
use stockroom_server::state::AppState;
use stockroom_server::web::configure_app_routes;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE) // Log when spans close, showing duration
    .init();

  tracing::info!("Starting stockroom server...");

  let app_config = AppConfig::from_env().map_err(|e| {
    tracing::error!(error = %e, "Failed to load application configuration.");
    e
  })?;

  let repo = stockroom_server::connect_repository(&app_config).await.map_err(|e| {
    tracing::error!(error = %e, "Failed to initialize the product store.");
    e
  })?;

  let server_address = app_config.bind_address();
  let max_body_bytes = app_config.max_body_bytes;
  let app_state = AppState::new(app_config, repo);
  tracing::info!("Backend available on {}", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(Cors::permissive())
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(|cfg| configure_app_routes(cfg, max_body_bytes))
  })
  .bind(&server_address)?
  .run()
  .await?;

  Ok(())
}
