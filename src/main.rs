// conference-export-service/src/main.rs

use anyhow::Context;
use conference_export::api;
use conference_export::composer::{DocumentComposer, PageLayout};
use conference_export::config::Config;
use conference_export::countries::CountryLookup;
use conference_export::persistence::ConferenceDb;
use conference_export::pipeline::ExportPipeline;
use conference_export::renderers::{ChromeBrowser, PdfRenderer};
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Print to stderr BEFORE logging initialization to catch early failures
    eprintln!("Starting conference-export-service...");

    // Load configuration
    let config = match Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("FATAL: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.service.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!(
        service = %config.service.name,
        version = env!("CARGO_PKG_VERSION"),
        "Starting Conference Export Service"
    );

    let pool = SqlitePoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
        .with_context(|| format!("Failed to open database {}", config.database.url))?;

    info!(url = %config.database.url, "Database pool ready");

    let browser = Arc::new(ChromeBrowser::new(
        config.renderer.chrome_binary.clone(),
        config.renderer.virtual_time_budget_ms,
    ));
    let renderer = PdfRenderer::new(
        browser,
        config.renderer.max_concurrent,
        config.renderer.navigation_timeout(),
    );
    let composer = DocumentComposer::with_template(PageLayout::from(&config.renderer), &config.templates)
        .context("Failed to load export template")?;

    let pipeline = Arc::new(ExportPipeline::new(
        ConferenceDb::new(pool),
        Arc::new(CountryLookup::from_path(&config.export.countries_path)),
        composer,
        renderer,
        config.export.excluded_username.clone(),
    ));

    let listener = tokio::net::TcpListener::bind(&config.http.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.http.bind_addr))?;

    info!(
        addr = %config.http.bind_addr,
        max_concurrent_renders = config.renderer.max_concurrent,
        "Listening for export requests"
    );

    let cancel = CancellationToken::new();
    let cancel_for_signal = cancel.clone();

    // Spawn signal handler
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received shutdown signal, draining requests");
                cancel_for_signal.cancel();
            }
            Err(err) => {
                error!("Unable to listen for shutdown signal: {}", err);
            }
        }
    });

    axum::serve(listener, api::router(pipeline))
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .context("HTTP server failed")?;

    info!("Conference export service stopped");

    Ok(())
}
