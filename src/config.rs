// Runtime configuration for the CLI and the API server
//
// Environment overrides:
//   PRICEBOOK_DATA_DIR    directory the price file is resolved against
//   PRICEBOOK_PRICE_FILE  price file name inside the data directory
//   PRICEBOOK_BIND        address the API server listens on

use std::path::{Path, PathBuf};

pub const DEFAULT_PRICE_FILE: &str = "price_list.csv";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

pub const ENV_DATA_DIR: &str = "PRICEBOOK_DATA_DIR";
pub const ENV_PRICE_FILE: &str = "PRICEBOOK_PRICE_FILE";
pub const ENV_BIND: &str = "PRICEBOOK_BIND";

/// Data directory shipped with the crate
pub fn default_data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data")
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub price_file: String,
    pub bind_addr: String,
}

impl Config {
    /// Defaults overridden by whatever is set in the environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (empty values count as unset)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Config::default();

        Config {
            data_dir: get(ENV_DATA_DIR).map(PathBuf::from).unwrap_or(defaults.data_dir),
            price_file: get(ENV_PRICE_FILE).unwrap_or(defaults.price_file),
            bind_addr: get(ENV_BIND).unwrap_or(defaults.bind_addr),
        }
    }

    /// Full path of the configured price file
    pub fn price_path(&self) -> PathBuf {
        self.data_dir.join(&self.price_file)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: default_data_dir(),
            price_file: DEFAULT_PRICE_FILE.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}
