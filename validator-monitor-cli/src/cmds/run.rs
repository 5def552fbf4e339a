use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::sync::broadcast;

use validator_monitor::logging::init_logging;
use validator_monitor::Monitor;

#[derive(Debug, Parser)]
#[command(about = "Run the monitor until interrupted")]
pub struct Opts {
    #[clap(long, default_value = super::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[clap(long, env = "VALIDATOR_MONITOR_LOG_LEVEL", help = "Overrides log_level from the config")]
    log_level: Option<String>,
}

pub async fn run(opts: &Opts) -> Result<()> {
    let config = super::load_config(&opts.config)?;
    init_logging(
        config.logs_path.clone(),
        config.logs_enabled,
        opts.log_level.clone().or_else(|| config.log_level.clone()),
    )?;

    log::info!(
        "Starting monitor for validator {} against {}",
        config.validator_address,
        config.rpc_endpoint
    );

    let mut monitor = Monitor::from_config(&config)?;
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let monitor_task = tokio::spawn(async move {
        monitor.run(shutdown_rx).await;
    });

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;
    log::info!("Received Ctrl-C, initiating shutdown...");
    let _ = shutdown_tx.send(());

    monitor_task.await.context("Monitor task failed")?;
    log::info!("Monitor shutdown complete");

    Ok(())
}
