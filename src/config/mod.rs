//! Configuration loading
//!
//! TOML-backed, with built-in defaults for every key so the file is purely
//! an override layer. The production profile (parallelism 5, 1s delay with
//! up to 5s jitter, 250s timeout, depth 2) is encoded in the defaults.

mod types;

pub use types::{Config, FetchLimits, OutputConfig, ReportConfig, UploadConfig};

use crate::ConfigResult;
use std::path::Path;

/// Loads configuration from a TOML file.
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    let contents = std::fs::read_to_string(path)?;
    let config = toml::from_str(&contents)?;
    Ok(config)
}
