//! Sync-specific error types.
//!
//! This module defines error types for the device-type sync that are not
//! covered by upstream library errors.

use netbox_client::NetBoxError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while syncing device types into NetBox.
#[derive(Debug, Error)]
pub enum SyncError {
    /// NetBox API error
    #[error("NetBox error: {0}")]
    NetBox(#[from] NetBoxError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A device-type definition file could not be parsed
    #[error("Invalid device type definition {}: {message}", path.display())]
    Library {
        /// File that failed to parse
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// NetBox reported a version this tool cannot interpret
    #[error("Unsupported NetBox version: {0}")]
    IncompatibleVersion(String),

    /// Filesystem error while reading the library
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
