//! Configuration loading.
//!
//! Configuration is read from a TOML file with the following resolution
//! order:
//! 1. an explicit path (e.g. `--config <path>`), which must exist
//! 2. `~/.geogate/config.toml` (user)
//! 3. `/etc/geogate/config.toml` (system)
//!
//! If neither default location exists the built-in defaults are used.
//! Environment variables are applied on top of whatever was loaded:
//!
//! | Variable | Field | Default |
//! |---|---|---|
//! | `MAX_ADDRESS_CACHE_SIZE` | `cache.max_address_entries` | 10000 |
//! | `MAX_IP_CACHE_SIZE` | `cache.max_ip_entries` | 5000 |
//! | `MAX_REVERSE_CACHE_SIZE` | `cache.max_reverse_geocode_entries` | address size |
//! | `DEFAULT_RATE_LIMIT_PER_SECOND` | `rate_limit.default_per_second` | 10 |
//! | `RATE_LIMIT_SWEEP_SECS` | `rate_limit.sweep_interval_secs` | 300 |
//!
//! Empty or unparsable values are ignored with a warning.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cache::CacheConfig;
use crate::limiter::RateLimitConfig;
use crate::{GeogateError, Result};

const ENV_MAX_ADDRESS: &str = "MAX_ADDRESS_CACHE_SIZE";
const ENV_MAX_IP: &str = "MAX_IP_CACHE_SIZE";
const ENV_MAX_REVERSE: &str = "MAX_REVERSE_CACHE_SIZE";
const ENV_DEFAULT_RATE: &str = "DEFAULT_RATE_LIMIT_PER_SECOND";
const ENV_SWEEP_SECS: &str = "RATE_LIMIT_SWEEP_SECS";

/// Geogate configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

impl Config {
    /// Load, apply environment overrides and validate.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::from_file(&path)?,
            None => {
                debug!("no config file found, using defaults");
                Self::default()
            }
        };
        config.apply_env_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse a config file without overrides or validation.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            GeogateError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            GeogateError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| GeogateError::Configuration(e.to_string()))
    }

    /// Resolve the config file path, `None` when no default file exists.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(GeogateError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".geogate").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/geogate/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }

    /// Apply overrides read through `lookup`, normally `std::env::var`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(n) = env_value(&lookup, ENV_MAX_ADDRESS) {
            self.cache.max_address_entries = n;
        }
        if let Some(n) = env_value(&lookup, ENV_MAX_IP) {
            self.cache.max_ip_entries = n;
        }
        if let Some(n) = env_value(&lookup, ENV_MAX_REVERSE) {
            self.cache.max_reverse_geocode_entries = Some(n);
        }
        if let Some(n) = env_value(&lookup, ENV_DEFAULT_RATE) {
            self.rate_limit.default_per_second = n;
        }
        if let Some(n) = env_value(&lookup, ENV_SWEEP_SECS) {
            self.rate_limit.sweep_interval_secs = n;
        }
    }

    /// Reject settings that would make the gateway unusable.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("cache.max_address_entries", self.cache.max_address_entries),
            ("cache.max_ip_entries", self.cache.max_ip_entries),
            (
                "cache.max_reverse_geocode_entries",
                self.cache.reverse_geocode_capacity(),
            ),
            (
                "rate_limit.default_per_second",
                u64::from(self.rate_limit.default_per_second),
            ),
            ("rate_limit.sweep_interval_secs", self.rate_limit.sweep_interval_secs),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(GeogateError::Configuration(format!(
                    "{field} must be positive"
                )));
            }
        }
        Ok(())
    }
}

fn env_value<T, F>(lookup: &F, name: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(name)?;
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(variable = name, value = raw, "ignoring unparsable environment override");
            None
        }
    }
}
