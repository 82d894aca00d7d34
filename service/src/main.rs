// service/src/main.rs

use cart_service::{web::catch_panics, web::configure_app_routes, AppConfig, AppState, LogFormat};

use actix_web::{middleware::from_fn, web as actix_data, App, HttpServer}; // Renamed web to actix_data
use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter}; // For span events in tracing

fn init_tracing(format: LogFormat) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")); // Allow RUST_LOG override
  match format {
    LogFormat::Pretty => tracing_subscriber::fmt()
      .with_env_filter(filter)
      .with_span_events(FmtSpan::CLOSE) // Log when spans close, showing duration
      .init(),
    LogFormat::Json => tracing_subscriber::fmt()
      .json()
      .with_env_filter(filter)
      .with_current_span(true)
      .init(),
  }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  // Load application configuration
  let app_config = Arc::new(AppConfig::from_env().context("Failed to load application configuration")?);
  init_tracing(app_config.log_format);

  tracing::info!(
    store = ?app_config.store_backend,
    write_policy = ?app_config.write_policy,
    "Starting cart service..."
  );

  let app_state = AppState::from_config(app_config.clone()).await.map_err(|e| {
    tracing::error!(error = %e, "Failed to initialize application state.");
    e
  })?;

  // Configure and Start Actix Web Server
  let server_address = app_config.bind_address();
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone())) // Share AppState with handlers
      .wrap(from_fn(catch_panics))
      .wrap(tracing_actix_web::TracingLogger::default()) // Actix middleware for tracing requests
      .configure(configure_app_routes)
  })
  .bind(&server_address)
  .with_context(|| format!("Failed to bind {}", server_address))?
  .run()
  .await
  .context("HTTP server terminated with an error")
}
