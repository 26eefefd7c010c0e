//! Pipeline configuration with layered defaults: built-in values, then an
//! optional TOML file, then CLI overrides applied by the binary.

use crate::core::{Error, Result};
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_return_window_days() -> i64 {
    30
}

/// Ingest configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Days after delivery before an unrefunded, paid order is presumed
    /// eligible for send-to-FBA disposition.
    #[serde(default = "default_return_window_days")]
    pub return_window_days: i64,

    /// Anchor timestamp for the return-window comparison. `None` means the
    /// current wall clock; tests and reproducible runs should set it.
    #[serde(default)]
    pub as_of: Option<NaiveDateTime>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            return_window_days: default_return_window_days(),
            as_of: None,
        }
    }
}

impl IngestConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::file_system_with_source("failed to read config file", path, e)
        })?;
        let config: IngestConfig = toml::from_str(&content)
            .map_err(|e| Error::config(format!("invalid config {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from an optional path, falling back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.return_window_days < 0 {
            return Err(Error::config(format!(
                "return_window_days must be non-negative, got {}",
                self.return_window_days
            )));
        }
        Ok(())
    }

    /// The timestamp the return-window rule compares against.
    pub fn as_of_or_now(&self) -> NaiveDateTime {
        self.as_of.unwrap_or_else(|| Utc::now().naive_utc())
    }
}
