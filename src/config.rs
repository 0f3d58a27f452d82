//! User settings read from a TOML file.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::store::http::DEFAULT_BASE_URL;

pub const DEFAULT_CACHE_CAPACITY: u64 = 256;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Root URL of the remote database.
    pub base_url: String,
    /// Entries kept by each result cache.
    pub cache_capacity: u64,
    /// Directory exported files are written to.
    pub output_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            base_url: DEFAULT_BASE_URL.to_string(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            output_dir: dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

impl Settings {
    /// Loads `path`, or the default config file if it exists, or defaults.
    ///
    /// An explicit path must exist; the default location is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Settings::from_file(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Settings::from_file(&path),
                _ => Ok(Settings::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;

        Settings::from_toml(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("supram").join("config.toml"))
}

// -- Tests -------------------------------------------------------------------
