//! Daemon settings loaded from ledger.toml
//!
//! Every field is optional in the file; anything left out takes its default.
//! `DATABASE_URL` in the environment wins over the file.

use crate::{
    config::database::{DEFAULT_DATABASE_URL, get_database_url},
    core::retention::RetentionPolicy,
    errors::{Error, Result},
};
use serde::Deserialize;
use std::{path::Path, time::Duration};
use tracing::{debug, info};

/// Settings file read when no other path is given
pub const DEFAULT_CONFIG_PATH: &str = "ledger.toml";

/// Top-level settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Connection string passed to `SeaORM`
    pub database_url: String,
    /// Retention job parameters
    pub retention: RetentionSettings,
}

/// Retention job parameters, in whole seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RetentionSettings {
    /// Transactions older than this are pruned
    pub older_than_secs: u64,
    /// Time between retention passes
    pub interval_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            retention: RetentionSettings::default(),
        }
    }
}

impl Default for RetentionSettings {
    fn default() -> Self {
        Self {
            older_than_secs: 3600,
            interval_secs: 60,
        }
    }
}

impl RetentionSettings {
    /// Converts the configured seconds into a validated policy.
    pub fn policy(&self) -> Result<RetentionPolicy> {
        RetentionPolicy::new(
            Duration::from_secs(self.older_than_secs),
            Duration::from_secs(self.interval_secs),
        )
    }
}

/// Parses settings from a TOML file.
///
/// # Errors
/// Returns `Config` if the file cannot be read or is not valid TOML.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    parse_settings(&contents)
}

fn parse_settings(contents: &str) -> Result<Settings> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse ledger.toml: {e}"),
    })
}

/// Loads the daemon settings.
///
/// A missing file yields the defaults. `DATABASE_URL` overrides whatever the
/// file says.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    let mut settings = if path.exists() {
        debug!("Loading settings from {:?}", path);
        load_config(path)?
    } else {
        info!("No settings file at {:?}, using defaults", path);
        Settings::default()
    };

    if let Some(url) = get_database_url() {
        settings.database_url = url;
    }

    Ok(settings)
}
