use anyhow::Result;
use async_trait::async_trait;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use validator_monitor::logging::init_logging;
use validator_monitor::{
    AlertError, AlertSink, Monitor, MonitorSettings, RpcClient, TelegramSink,
};

#[derive(Debug, Parser)]
#[command(about = "Run one monitor cycle and print what was observed")]
pub struct Opts {
    #[clap(long, default_value = super::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[clap(long, help = "Deliver alerts to the configured channel instead of printing them")]
    send_alerts: bool,
}

/// Prints alerts instead of delivering them
struct ConsoleSink;

#[async_trait]
impl AlertSink for ConsoleSink {
    async fn send(&self, message: &str) -> Result<(), AlertError> {
        println!("🚨 {}", message);
        Ok(())
    }
}

pub async fn run(opts: &Opts) -> Result<()> {
    let config = super::load_config(&opts.config)?;
    init_logging(None, Some(false), config.log_level.clone())?;

    let rpc = Arc::new(RpcClient::from_config(&config)?);
    let sink: Arc<dyn AlertSink> = if opts.send_alerts {
        Arc::new(TelegramSink::from_config(&config)?)
    } else {
        Arc::new(ConsoleSink)
    };

    let mut monitor = Monitor::new(MonitorSettings::from_config(&config), rpc.clone(), rpc, sink);
    let report = monitor.run_cycle().await;
    println!("Observed: {}", monitor.state());

    if report.is_healthy() {
        println!("✅ No alerts raised for validator {}", config.validator_address);
    } else {
        println!(
            "⚠️  {} alert(s) raised for validator {}",
            report.alerts.len(),
            config.validator_address
        );
    }

    Ok(())
}
