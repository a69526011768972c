//! NetBox Device-Type Sync
//!
//! Pushes a device-type library into NetBox:
//! - Manufacturers: created for every vendor NetBox does not know yet
//! - Device types: created per (manufacturer, model) pair that is missing
//! - Interface templates: created per device type for every missing interface name
//!
//! Existing objects are never modified; a run only fills gaps.

mod compat;
mod config;
mod counter;
mod device_types;
mod error;
mod library;
mod sync;
mod test_utils;

use crate::config::SyncConfig;
use crate::library::Library;
use crate::sync::NetBoxSync;
use anyhow::Context;
use netbox_client::{ClientOptions, NetBoxClient};
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = SyncConfig::from_env();
    init_tracing(config.as_ref().is_ok_and(|c| c.verbose));
    let config = config.context("Failed to load configuration")?;

    info!("Starting NetBox device-type sync");
    info!("Configuration:");
    info!("  NetBox URL: {}", config.netbox_url);
    info!("  Library: {}", config.library_path.display());
    if !config.vendors.is_empty() {
        info!("  Vendors: {}", config.vendors.join(", "));
    }

    let library = Library::load_dir(&config.library_path)
        .with_context(|| format!("Failed to load device types from {}", config.library_path.display()))?
        .filter_vendors(&config.vendors);
    if library.is_empty() {
        warn!("No device type definitions found, nothing to sync");
        return Ok(());
    }

    if config.ignore_ssl_errors {
        debug!("IGNORE_SSL_ERRORS is set, disabling SSL verification");
    }
    let options = ClientOptions {
        accept_invalid_certs: config.ignore_ssl_errors,
        ..ClientOptions::default()
    };
    let client = NetBoxClient::with_options(config.netbox_url.clone(), config.netbox_token.clone(), options)
        .context("NetBox API Error")?;

    let started = chrono::Utc::now();
    let mut sync = NetBoxSync::connect(Arc::new(client))
        .await
        .context("Failed to connect to NetBox")?;
    debug!(
        "NetBox {} module types supported: {}",
        sync.version(),
        sync.supports_modules()
    );
    sync.run(&library).await.context("Sync aborted")?;

    sync.counter().log_summary();
    info!(
        "Sync finished in {}s",
        (chrono::Utc::now() - started).num_milliseconds() as f64 / 1000.0
    );

    Ok(())
}
