//! Environment configuration
//!
//! | Variable              | Default          |
//! |-----------------------|------------------|
//! | `NETBOX_URL`          | required         |
//! | `NETBOX_TOKEN`        | required         |
//! | `IGNORE_SSL_ERRORS`   | `false`          |
//! | `VERBOSE`             | `false`          |
//! | `DEVICE_TYPE_LIBRARY` | `./device-types` |
//! | `VENDORS`             | all vendors      |

use crate::error::SyncError;
use std::path::PathBuf;

const DEFAULT_LIBRARY_PATH: &str = "./device-types";

/// Runtime configuration for a sync run
#[derive(Debug, Clone, PartialEq)]
pub struct SyncConfig {
    pub netbox_url: String,
    pub netbox_token: String,
    pub ignore_ssl_errors: bool,
    pub verbose: bool,
    pub library_path: PathBuf,
    /// Restrict the run to these vendors (names or slugs); empty means all
    pub vendors: Vec<String>,
}

impl SyncConfig {
    /// Load configuration from process environment variables
    pub fn from_env() -> Result<Self, SyncError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SyncError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let netbox_url = required(&lookup, "NETBOX_URL")?;
        let netbox_token = required(&lookup, "NETBOX_TOKEN")?;
        let ignore_ssl_errors = flag(&lookup, "IGNORE_SSL_ERRORS")?;
        let verbose = flag(&lookup, "VERBOSE")?;
        let library_path = lookup("DEVICE_TYPE_LIBRARY")
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_LIBRARY_PATH), PathBuf::from);
        let vendors = lookup("VENDORS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            netbox_url,
            netbox_token,
            ignore_ssl_errors,
            verbose,
            library_path,
            vendors,
        })
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String, SyncError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| SyncError::InvalidConfig(format!("{} environment variable is required", key)))
}

fn flag<F>(lookup: &F, key: &str) -> Result<bool, SyncError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(false),
        Some(value) => parse_bool(&value).ok_or_else(|| {
            SyncError::InvalidConfig(format!("{} must be a boolean, got '{}'", key, value))
        }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
