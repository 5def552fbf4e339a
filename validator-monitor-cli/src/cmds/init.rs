use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;

use validator_monitor::Config;

#[derive(Debug, Parser)]
#[command(about = "Write a config file template")]
pub struct Opts {
    #[clap(long, default_value = super::DEFAULT_CONFIG_PATH, help = "Destination; .json writes JSON, anything else YAML")]
    config: PathBuf,

    #[clap(long, help = "Overwrite an existing file")]
    force: bool,
}

pub async fn run(opts: &Opts) -> Result<()> {
    if opts.config.exists() && !opts.force {
        bail!(
            "{} already exists, pass --force to overwrite it",
            opts.config.display()
        );
    }

    Config::template().save(&opts.config)?;

    println!("✨ Wrote config template to {}", opts.config.display());
    println!("   Fill in validator_address, rpc_endpoint, telegram_bot_token and telegram_chat_id,");
    println!("   then start monitoring with: validator-monitor run --config {}", opts.config.display());

    Ok(())
}
