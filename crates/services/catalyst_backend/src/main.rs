// File: services/catalyst_backend/src/main.rs
use catalyst_backend::app::build_app;
use catalyst_common::{log_error, log_result, Context, SystemClock};
use catalyst_config::load_config;
use catalyst_db::{CatalystRepositoryFactory, DbClient, RepositoryFactory};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        log_error(&e, "Campus Catalyst backend stopped");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Arc::new(load_config().context("loading configuration")?);

    // Keep the guard alive so buffered file logs are flushed on exit.
    let _log_guard = catalyst_common::init_from_config(config.logging.as_ref());

    let db_client = DbClient::new(&config).await?;
    let repos = CatalystRepositoryFactory::new().create_repository(db_client.clone());
    log_result(
        repos.init_schema().await,
        "Database schema ready",
        "Schema bootstrap failed",
    )?;

    let app = build_app(config.clone(), db_client, Arc::new(SystemClock));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
