use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use validator_monitor::{AlertSink, TelegramSink};

#[derive(Debug, Parser)]
#[command(about = "Send a test message through the configured alert channel")]
pub struct Opts {
    #[clap(long, default_value = super::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[clap(long, default_value = "Test alert from validator-monitor.")]
    message: String,
}

pub async fn run(opts: &Opts) -> Result<()> {
    let config = super::load_config(&opts.config)?;
    let sink = TelegramSink::from_config(&config)?;

    sink.send(&opts.message)
        .await
        .with_context(|| format!("Failed to deliver test alert to chat {}", sink.chat_id()))?;

    println!("📨 Test alert delivered to chat {}", sink.chat_id());
    Ok(())
}
