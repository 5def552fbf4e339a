mod cmds;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "validator-monitor")]
#[command(version)]
#[command(about = "Watch a Polygon validator's checkpoints and block heights", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Run the monitor until interrupted")]
    Run(cmds::run::Opts),

    #[command(about = "Run one monitor cycle and print what was observed")]
    Check(cmds::check::Opts),

    #[command(about = "Write a config file template")]
    Init(cmds::init::Opts),

    #[command(about = "Send a test message through the configured alert channel")]
    TestAlert(cmds::test_alert::Opts),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    match &cli.command {
        Commands::Run(opts) => cmds::run::run(opts).await?,
        Commands::Check(opts) => cmds::check::run(opts).await?,
        Commands::Init(opts) => cmds::init::run(opts).await?,
        Commands::TestAlert(opts) => cmds::test_alert::run(opts).await?,
    }

    Ok(())
}
