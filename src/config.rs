//! Runtime configuration.
//!
//! Defaults, then a JSON settings file, then `CATALOG_*` environment
//! variables (a `.env` file is loaded first when present).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::lifecycle::DeletePolicy;
use crate::merge::ZeroPolicy;

pub const DEFAULT_SETTINGS_FILE: &str = "appsettings.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub media_root: PathBuf,
    pub mailbox_capacity: usize,
    pub zero_policy: ZeroPolicy,
    pub delete_policy: DeletePolicy,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            media_root: PathBuf::from("wwwroot"),
            mailbox_capacity: 32,
            zero_policy: ZeroPolicy::Skip,
            delete_policy: DeletePolicy::BestEffort,
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    /// Loads the settings file named by `CATALOG_CONFIG` (or
    /// `appsettings.json` if it exists) and applies environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let config = match std::env::var("CATALOG_CONFIG") {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) if Path::new(DEFAULT_SETTINGS_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_SETTINGS_FILE))?
            }
            Err(_) => Self::default(),
        };
        config.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Read settings file");
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Applies `CATALOG_*` overrides looked up through `lookup`.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(root) = lookup("CATALOG_MEDIA_ROOT") {
            self.media_root = PathBuf::from(root);
        }
        if let Some(value) = lookup("CATALOG_MAILBOX_CAPACITY") {
            self.mailbox_capacity = parse_value("CATALOG_MAILBOX_CAPACITY", &value)?;
        }
        if let Some(value) = lookup("CATALOG_ZERO_POLICY") {
            self.zero_policy = parse_value("CATALOG_ZERO_POLICY", &value)?;
        }
        if let Some(value) = lookup("CATALOG_DELETE_POLICY") {
            self.delete_policy = parse_value("CATALOG_DELETE_POLICY", &value)?;
        }
        if let Some(filter) = lookup("CATALOG_LOG_FILTER") {
            self.log_filter = filter;
        }
        Ok(self)
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
