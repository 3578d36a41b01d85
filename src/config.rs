use common::types::config::Config;
use log::{info, warn};
use std::fmt;
use std::fmt::Display;
use std::fs::File;
use std::path::Path;
use crate::bootstrap_config::BootstrapConfig;

pub(super) fn load_config(bootstrap_config: &BootstrapConfig) -> Result<Config, ConfigError> {
    let path: &Path = Path::new(&bootstrap_config.config_file);

    if !path.exists() {
        warn!(target: "main", "Config file '{path:?}' not found, using defaults");
        return Ok(Config::default());
    }

    let config_file = File::open(path)?;
    let config: Config = serde_yml::from_reader(config_file)?;

    info!(target: "main", "Config read successfully from '{path:?}'");

    Ok(config)
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    IO(#[from] std::io::Error),
    Yaml(#[from] serde_yml::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let err: &dyn Display = match self {
            ConfigError::IO(err) => err,
            ConfigError::Yaml(err) => err,
        };
        write!(f, "{}", err)
    }
}
