pub mod check;
pub mod init;
pub mod run;
pub mod test_alert;

use anyhow::{Context, Result};
use std::path::Path;

use validator_monitor::Config;

pub const DEFAULT_CONFIG_PATH: &str = "./config.yaml";

/// Load and validate the config file named on the command line
pub fn load_config(path: &Path) -> Result<Config> {
    let config = Config::from_filepath(path)?;
    config
        .validate()
        .with_context(|| format!("Invalid config file {}", path.display()))?;
    Ok(config)
}
