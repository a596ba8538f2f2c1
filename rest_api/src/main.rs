// rest_api/src/main.rs

use anyhow::Result;
use clap::Parser;
use log::{error, info};
use patient_api::cli::CliArgs;
use patient_api::start_server;
use tokio::sync::oneshot;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let args = CliArgs::parse();
    let config = args.resolve_config()?;
    info!(
        "Starting patient API on {}:{} with {} storage",
        config.server.host, config.server.port, config.storage.engine
    );

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Ctrl-C received, shutting down."),
            Err(e) => error!("Failed to listen for Ctrl-C: {}", e),
        }
        let _ = shutdown_tx.send(());
    });

    start_server(config, shutdown_rx).await
}
