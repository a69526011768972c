//! NetBox sync entry point
//!
//! Connects to NetBox, builds the existence caches once, then creates
//! whatever the library has that NetBox does not: manufacturers first,
//! then device types, then each device type's interface templates.

use crate::compat::NetBoxVersion;
use crate::counter::SyncCounter;
use crate::device_types::DeviceTypeSync;
use crate::error::SyncError;
use crate::library::{Library, Vendor};
use netbox_client::{Manufacturer, NetBoxClientTrait, NetBoxError};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// One sync session against a NetBox instance
pub struct NetBoxSync {
    client: Arc<dyn NetBoxClientTrait>,
    counter: SyncCounter,
    version: NetBoxVersion,
    existing_manufacturers: HashMap<String, Manufacturer>,
    device_types: DeviceTypeSync,
}

impl std::fmt::Debug for NetBoxSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetBoxSync")
            .field("base_url", &self.client.base_url())
            .field("version", &self.version)
            .field("counter", &self.counter)
            .field("existing_manufacturers", &self.existing_manufacturers.len())
            .field("device_types", &self.device_types)
            .finish()
    }
}

impl NetBoxSync {
    /// Validate the token, check the NetBox version and load the existence caches
    pub async fn connect(client: Arc<dyn NetBoxClientTrait>) -> Result<Self, SyncError> {
        info!("Connecting to NetBox at {}", client.base_url());
        client.validate_token().await?;

        let version = Self::verify_compatibility(client.as_ref()).await?;
        let existing_manufacturers = Self::get_manufacturers(client.as_ref()).await?;
        debug!("Found {} existing manufacturers", existing_manufacturers.len());
        let device_types = DeviceTypeSync::new(Arc::clone(&client), version.interface_template_filter()).await?;

        Ok(Self {
            client,
            counter: SyncCounter::default(),
            version,
            existing_manufacturers,
            device_types,
        })
    }

    async fn verify_compatibility(client: &dyn NetBoxClientTrait) -> Result<NetBoxVersion, SyncError> {
        let status = client.get_status().await?;
        let version: NetBoxVersion = status.netbox_version.parse()?;
        info!("NetBox version {}", status.netbox_version);
        if version.supports_modules() {
            debug!("NetBox {} supports module types", version);
        }
        Ok(version)
    }

    async fn get_manufacturers(client: &dyn NetBoxClientTrait) -> Result<HashMap<String, Manufacturer>, NetBoxError> {
        let manufacturers = client.query_manufacturers(&[], true).await?;
        Ok(manufacturers.into_iter().map(|m| (m.name.clone(), m)).collect())
    }

    /// Version reported by NetBox at connect time
    pub fn version(&self) -> NetBoxVersion {
        self.version
    }

    /// Module types are available on the connected instance
    pub fn supports_modules(&self) -> bool {
        self.version.supports_modules()
    }

    /// Tallies so far
    pub fn counter(&self) -> &SyncCounter {
        &self.counter
    }

    /// Create every vendor whose name is not already a manufacturer in NetBox
    pub async fn create_manufacturers(&mut self, vendors: &[Vendor]) -> Result<(), SyncError> {
        let mut to_create = Vec::new();
        for vendor in vendors {
            match self.existing_manufacturers.get(&vendor.name) {
                Some(existing) => {
                    debug!("Manufacturer Exists: {} - {}", existing.name, existing.id);
                }
                None => {
                    debug!("Manufacturer queued for addition: {}", vendor.name);
                    to_create.push(vendor.to_request());
                }
            }
        }

        if to_create.is_empty() {
            return Ok(());
        }

        match self.client.create_manufacturers(&to_create).await {
            Ok(created) => {
                for manufacturer in created {
                    info!("Manufacturer Created: {} - {}", manufacturer.name, manufacturer.id);
                    self.counter.manufacturer += 1;
                    self.existing_manufacturers.insert(manufacturer.name.clone(), manufacturer);
                }
                Ok(())
            }
            Err(e) if e.is_request_error() => {
                error!("Error creating manufacturers");
                debug!("Error during manufacturer creation. - {}", e);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Sync the whole library and return the tallies
    pub async fn run(&mut self, library: &Library) -> Result<SyncCounter, SyncError> {
        info!(
            "Syncing {} device types from {} vendors",
            library.device_types().len(),
            library.vendors().len()
        );

        self.create_manufacturers(&library.vendors()).await?;
        self.device_types
            .create_device_types(library.device_types(), &self.existing_manufacturers, &mut self.counter)
            .await?;

        for definition in library.device_types() {
            let Some(device_type_id) = self
                .device_types
                .get(&definition.manufacturer, &definition.model)
                .map(|dt| dt.id)
            else {
                debug!(
                    "Skipping interfaces for {} {}: device type not in NetBox",
                    definition.manufacturer, definition.model
                );
                continue;
            };

            if let Err(e) = self
                .device_types
                .create_interfaces(&definition.interfaces, device_type_id, &mut self.counter)
                .await
            {
                match e {
                    SyncError::NetBox(ref inner) if inner.is_request_error() => {
                        warn!("Skipping interfaces for {} {}: {}", definition.manufacturer, definition.model, e);
                    }
                    other => return Err(other),
                }
            }
        }

        Ok(self.counter.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::definition;
    use netbox_client::{MockNetBoxClient, MockResource};

    async fn connect(mock: &MockNetBoxClient) -> NetBoxSync {
        NetBoxSync::connect(Arc::new(mock.clone())).await.unwrap()
    }

    fn vendor(name: &str) -> Vendor {
        Vendor {
            name: name.to_string(),
            slug: netbox_client::slugify(name),
        }
    }

    fn library() -> Library {
        Library::from_definitions(vec![
            definition(
                "Juniper",
                "EX2300-24T",
                &[("ge-0/0/0", "1000base-t"), ("ge-0/0/1", "1000base-t"), ("em0", "1000base-t")],
            ),
            definition("Juniper", "QFX5120-48Y", &[("et-0/0/48", "100gbase-x-qsfp28")]),
            definition("Arista", "DCS-7050SX3-48YC8", &[("Ethernet1", "25gbase-x-sfp28")]),
        ])
    }

    #[tokio::test]
    async fn test_connect_reads_version() {
        let mock = MockNetBoxClient::new("http://mock-netbox");
        mock.set_version("3.1.4");
        let sync = connect(&mock).await;
        assert_eq!(sync.version(), NetBoxVersion { major: 3, minor: 1 });
        assert!(!sync.supports_modules());
    }

    #[tokio::test]
    async fn test_connect_rejects_unparsable_version() {
        let mock = MockNetBoxClient::new("http://mock-netbox");
        mock.set_version("nightly");
        let err = NetBoxSync::connect(Arc::new(mock)).await.unwrap_err();
        assert!(matches!(err, SyncError::IncompatibleVersion(_)));
    }

    #[tokio::test]
    async fn test_create_manufacturers_only_creates_missing() {
        let mock = MockNetBoxClient::new("http://mock-netbox");
        mock.add_manufacturer("Juniper");
        let mut sync = connect(&mock).await;

        sync.create_manufacturers(&[vendor("Juniper"), vendor("Arista"), vendor("Palo Alto")])
            .await
            .unwrap();

        assert_eq!(sync.counter().manufacturer, 2);
        assert_eq!(mock.create_requests(MockResource::Manufacturers), vec![2]);
    }

    #[tokio::test]
    async fn test_create_manufacturers_nothing_missing_issues_no_request() {
        let mock = MockNetBoxClient::new("http://mock-netbox");
        mock.add_manufacturer("Juniper");
        let mut sync = connect(&mock).await;

        sync.create_manufacturers(&[vendor("Juniper")]).await.unwrap();

        assert!(sync.counter().is_empty());
        assert!(mock.create_requests(MockResource::Manufacturers).is_empty());
    }

    #[tokio::test]
    async fn test_rejected_manufacturer_batch_is_logged_not_fatal() {
        let mock = MockNetBoxClient::new("http://mock-netbox");
        mock.fail_creates(MockResource::Manufacturers);
        let mut sync = connect(&mock).await;

        let result = sync.create_manufacturers(&[vendor("Arista")]).await;

        assert!(result.is_ok());
        assert_eq!(sync.counter().manufacturer, 0);
    }

    #[tokio::test]
    async fn test_run_creates_everything_on_empty_netbox() {
        let mock = MockNetBoxClient::new("http://mock-netbox");
        let mut sync = connect(&mock).await;

        let counter = sync.run(&library()).await.unwrap();

        assert_eq!(counter.manufacturer, 2);
        assert_eq!(counter.added, 3);
        assert_eq!(counter.updated, 5);
        assert_eq!(counter.module_added, 0);
    }

    #[tokio::test]
    async fn test_run_is_idempotent() {
        let mock = MockNetBoxClient::new("http://mock-netbox");
        connect(&mock).await.run(&library()).await.unwrap();

        let second = connect(&mock).await.run(&library()).await.unwrap();

        assert!(second.is_empty(), "second run created {second}");
        assert_eq!(mock.create_requests(MockResource::Manufacturers), vec![2]);
        assert_eq!(mock.create_requests(MockResource::DeviceTypes), vec![3]);
    }

    #[tokio::test]
    async fn test_run_fills_gaps_in_partial_netbox() {
        let mock = MockNetBoxClient::new("http://mock-netbox");
        let juniper = mock.add_manufacturer("Juniper");
        let ex = mock.add_device_type(&juniper, "EX2300-24T");
        mock.add_interface_template(&ex, "ge-0/0/0", "1000base-t");
        let mut sync = connect(&mock).await;

        let counter = sync.run(&library()).await.unwrap();

        assert_eq!(counter.manufacturer, 1);
        assert_eq!(counter.added, 2);
        assert_eq!(counter.updated, 4);
        assert_eq!(mock.interface_template_count(ex.id), 3);
    }

    #[tokio::test]
    async fn test_run_on_netbox_4_uses_renamed_filter() {
        let mock = MockNetBoxClient::new("http://mock-netbox");
        mock.set_version("4.1.3");
        let juniper = mock.add_manufacturer("Juniper");
        let ex = mock.add_device_type(&juniper, "EX2300-24T");
        mock.add_interface_template(&ex, "ge-0/0/0", "1000base-t");
        let mut sync = connect(&mock).await;

        let lib = Library::from_definitions(vec![definition("Juniper", "EX2300-24T", &[("ge-0/0/0", "1000base-t")])]);
        let counter = sync.run(&lib).await.unwrap();

        assert!(counter.is_empty());
    }

    #[tokio::test]
    async fn test_run_continues_when_manufacturers_rejected() {
        let mock = MockNetBoxClient::new("http://mock-netbox");
        mock.add_manufacturer("Juniper");
        mock.fail_creates(MockResource::Manufacturers);
        let mut sync = connect(&mock).await;

        let counter = sync.run(&library()).await.unwrap();

        // Arista could not be created, so only the Juniper device types land
        assert_eq!(counter.manufacturer, 0);
        assert_eq!(counter.added, 2);
        assert_eq!(counter.updated, 4);
    }

    #[tokio::test]
    async fn test_authentication_failure_on_create_aborts_run() {
        let mock = MockNetBoxClient::new("http://mock-netbox");
        mock.fail_creates_with(MockResource::Manufacturers, NetBoxError::Authentication);
        let mut sync = connect(&mock).await;

        let err = sync.run(&library()).await.unwrap_err();

        assert!(matches!(err, SyncError::NetBox(NetBoxError::Authentication(_))));
        assert!(mock.create_requests(MockResource::DeviceTypes).is_empty());
    }

    #[tokio::test]
    async fn test_authentication_failure_on_device_types_aborts_run() {
        let mock = MockNetBoxClient::new("http://mock-netbox");
        mock.fail_creates_with(MockResource::DeviceTypes, NetBoxError::Authentication);
        let mut sync = connect(&mock).await;

        let err = sync.run(&library()).await.unwrap_err();

        assert!(matches!(err, SyncError::NetBox(NetBoxError::Authentication(_))));
        assert_eq!(sync.counter().manufacturer, 2);
    }

    #[tokio::test]
    async fn test_authentication_failure_on_interface_templates_aborts_run() {
        let mock = MockNetBoxClient::new("http://mock-netbox");
        mock.fail_creates_with(MockResource::InterfaceTemplates, NetBoxError::Authentication);
        let mut sync = connect(&mock).await;

        let err = sync.run(&library()).await.unwrap_err();

        assert!(matches!(err, SyncError::NetBox(NetBoxError::Authentication(_))));
        // stops at the first device type
        assert_eq!(mock.create_requests(MockResource::InterfaceTemplates), vec![3]);
    }

    #[tokio::test]
    async fn test_rejected_template_query_skips_only_that_device_type() {
        let mock = MockNetBoxClient::new("http://mock-netbox");
        let juniper = mock.add_manufacturer("Juniper");
        let arista = mock.add_manufacturer("Arista");
        let ex = mock.add_device_type(&juniper, "EX2300-24T");
        let qfx = mock.add_device_type(&juniper, "QFX5120-48Y");
        let dcs = mock.add_device_type(&arista, "DCS-7050SX3-48YC8");
        mock.fail_queries_matching(MockResource::InterfaceTemplates, &ex.id.to_string(), NetBoxError::Api);
        let mut sync = connect(&mock).await;

        let counter = sync.run(&library()).await.unwrap();

        assert_eq!(counter.updated, 2);
        assert_eq!(mock.interface_template_count(ex.id), 0);
        assert_eq!(mock.interface_template_count(qfx.id), 1);
        assert_eq!(mock.interface_template_count(dcs.id), 1);
    }

    #[tokio::test]
    async fn test_authentication_failure_on_template_query_aborts_run() {
        let mock = MockNetBoxClient::new("http://mock-netbox");
        let juniper = mock.add_manufacturer("Juniper");
        mock.add_device_type(&juniper, "EX2300-24T");
        mock.fail_queries(MockResource::InterfaceTemplates, NetBoxError::Authentication);
        let mut sync = connect(&mock).await;

        let err = sync.run(&library()).await.unwrap_err();

        assert!(matches!(err, SyncError::NetBox(NetBoxError::Authentication(_))));
        assert!(mock.create_requests(MockResource::InterfaceTemplates).is_empty());
    }

    #[tokio::test]
    async fn test_connect_fails_when_manufacturer_query_fails() {
        let mock = MockNetBoxClient::new("http://mock-netbox");
        mock.fail_queries(MockResource::Manufacturers, NetBoxError::Authentication);

        let err = NetBoxSync::connect(Arc::new(mock)).await.unwrap_err();

        assert!(matches!(err, SyncError::NetBox(NetBoxError::Authentication(_))));
    }
}
