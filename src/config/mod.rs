use std::fs;
use std::path::{Path, PathBuf};
use log::info;
use serde::Deserialize;
use crate::common::Result;

#[derive(Deserialize, Debug, PartialEq)]
#[serde(default)]
pub(crate) struct Config {
    /// Prefix for amounts in reports
    pub(crate) currency_symbol: String,
    /// Local storage file. `--store` takes precedence.
    pub(crate) store_path: Option<PathBuf>,
    /// REPL history file
    pub(crate) history_file: String,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            currency_symbol: "₹".to_string(),
            store_path: None,
            history_file: ".finsage_history".to_string(),
        }
    }
}

impl Config {
    /// Load from a TOML file. A missing file gives the defaults.
    pub(crate) fn load_from_file(file_path: &Path) -> Result<Config> {
        if file_path.is_file() {
            info!("Loading config from {}", file_path.display());
            let config: Config = toml::from_str(&fs::read_to_string(file_path)?)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }
}
