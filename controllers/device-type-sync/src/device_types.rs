//! Device type and interface template sync
//!
//! Device types are keyed by (manufacturer name, model); interface templates
//! by name within their device type.

use crate::counter::SyncCounter;
use crate::error::SyncError;
use crate::library::{DeviceTypeDefinition, InterfaceDefinition};
use netbox_client::{DeviceType, Manufacturer, NetBoxClientTrait, NetBoxError};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Existence-cache key for a device type
type DeviceTypeKey = (String, String);

fn key(manufacturer: &str, model: &str) -> DeviceTypeKey {
    (manufacturer.to_string(), model.to_string())
}

/// Creates missing device types and their interface templates.
pub struct DeviceTypeSync {
    client: Arc<dyn NetBoxClientTrait>,
    /// Query parameter filtering interface templates by device type
    template_filter: &'static str,
    existing_device_types: HashMap<DeviceTypeKey, DeviceType>,
}

impl std::fmt::Debug for DeviceTypeSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceTypeSync")
            .field("base_url", &self.client.base_url())
            .field("template_filter", &self.template_filter)
            .field("existing_device_types", &self.existing_device_types.len())
            .finish()
    }
}

impl DeviceTypeSync {
    /// Build the device-type existence cache from every device type in NetBox
    pub async fn new(client: Arc<dyn NetBoxClientTrait>, template_filter: &'static str) -> Result<Self, NetBoxError> {
        let existing_device_types = Self::get_device_types(client.as_ref()).await?;
        debug!("Found {} existing device types", existing_device_types.len());
        Ok(Self {
            client,
            template_filter,
            existing_device_types,
        })
    }

    async fn get_device_types(client: &dyn NetBoxClientTrait) -> Result<HashMap<DeviceTypeKey, DeviceType>, NetBoxError> {
        let device_types = client.query_device_types(&[], true).await?;
        Ok(device_types
            .into_iter()
            .map(|dt| (key(&dt.manufacturer.name, &dt.model), dt))
            .collect())
    }

    /// Look up a device type in the existence cache
    pub fn get(&self, manufacturer: &str, model: &str) -> Option<&DeviceType> {
        self.existing_device_types.get(&key(manufacturer, model))
    }

    /// Create every definition not already present in NetBox.
    ///
    /// Definitions whose manufacturer is not in `manufacturers` are skipped.
    /// A rejected bulk request is logged and leaves the counter untouched.
    pub async fn create_device_types(
        &mut self,
        definitions: &[DeviceTypeDefinition],
        manufacturers: &HashMap<String, Manufacturer>,
        counter: &mut SyncCounter,
    ) -> Result<(), SyncError> {
        let mut to_create = Vec::new();
        for definition in definitions {
            if let Some(existing) = self.get(&definition.manufacturer, &definition.model) {
                debug!("Device Type Exists: {} - {} - {}", existing.manufacturer.name, existing.model, existing.id);
                continue;
            }
            let Some(manufacturer) = manufacturers.get(&definition.manufacturer) else {
                warn!(
                    "Skipping device type {}: manufacturer {} is not in NetBox",
                    definition.model, definition.manufacturer
                );
                continue;
            };
            debug!("Device Type queued for addition: {} - {}", definition.manufacturer, definition.model);
            to_create.push(definition.to_request(manufacturer.id));
        }

        if to_create.is_empty() {
            return Ok(());
        }

        match self.client.create_device_types(&to_create).await {
            Ok(created) => {
                for device_type in created {
                    info!("Device Type Created: {} - {} - {}", device_type.manufacturer.name, device_type.model, device_type.id);
                    counter.added += 1;
                    self.existing_device_types
                        .insert(key(&device_type.manufacturer.name, &device_type.model), device_type);
                }
                Ok(())
            }
            Err(e) if e.is_request_error() => {
                error!("Error creating device types");
                debug!("Error during device type creation. - {}", e);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Create the interface templates of `device_type_id` that NetBox does not have yet
    pub async fn create_interfaces(
        &self,
        interfaces: &[InterfaceDefinition],
        device_type_id: u64,
        counter: &mut SyncCounter,
    ) -> Result<(), SyncError> {
        if interfaces.is_empty() {
            return Ok(());
        }

        let id = device_type_id.to_string();
        let existing: HashSet<String> = self
            .client
            .query_interface_templates(&[(self.template_filter, id.as_str())], true)
            .await?
            .into_iter()
            .map(|template| template.name)
            .collect();

        let to_create: Vec<_> = interfaces
            .iter()
            .filter(|interface| !existing.contains(&interface.name))
            .map(|interface| interface.to_request(device_type_id))
            .collect();

        if to_create.is_empty() {
            debug!("Interface templates for device type {} are up to date", device_type_id);
            return Ok(());
        }

        match self.client.create_interface_templates(&to_create).await {
            Ok(created) => {
                for template in created {
                    debug!(
                        "Interface Template Created: {} - {} - {} - {}",
                        template.name,
                        template.interface_type.value,
                        template.device_type.as_ref().map_or(device_type_id, |dt| dt.id),
                        template.id
                    );
                    counter.updated += 1;
                }
                Ok(())
            }
            Err(e) if e.is_request_error() => {
                error!("Error '{}' creating Interface", e);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::definition;
    use netbox_client::{MockNetBoxClient, MockResource};

    async fn sync_for(mock: &MockNetBoxClient) -> DeviceTypeSync {
        DeviceTypeSync::new(Arc::new(mock.clone()), "devicetype_id").await.unwrap()
    }

    fn manufacturers(mock: &MockNetBoxClient, names: &[&str]) -> HashMap<String, Manufacturer> {
        names
            .iter()
            .map(|name| (name.to_string(), mock.add_manufacturer(name)))
            .collect()
    }

    #[tokio::test]
    async fn test_existing_device_types_are_cached_by_manufacturer_and_model() {
        let mock = MockNetBoxClient::new("http://mock-netbox");
        let juniper = mock.add_manufacturer("Juniper");
        let arista = mock.add_manufacturer("Arista");
        mock.add_device_type(&juniper, "EX2300-24T");
        mock.add_device_type(&arista, "EX2300-24T");

        let sync = sync_for(&mock).await;
        assert_eq!(sync.get("Juniper", "EX2300-24T").map(|dt| dt.manufacturer.id), Some(juniper.id));
        assert_eq!(sync.get("Arista", "EX2300-24T").map(|dt| dt.manufacturer.id), Some(arista.id));
        assert!(sync.get("Cisco", "EX2300-24T").is_none());
    }

    #[tokio::test]
    async fn test_create_device_types_only_creates_missing() {
        let mock = MockNetBoxClient::new("http://mock-netbox");
        let mfgs = manufacturers(&mock, &["Juniper"]);
        mock.add_device_type(&mfgs["Juniper"], "EX2300-24T");
        let mut sync = sync_for(&mock).await;
        let mut counter = SyncCounter::default();

        let definitions = vec![
            definition("Juniper", "EX2300-24T", &[]),
            definition("Juniper", "EX4400-48F", &[]),
            definition("Juniper", "QFX5120-48Y", &[]),
        ];
        sync.create_device_types(&definitions, &mfgs, &mut counter).await.unwrap();

        assert_eq!(counter.added, 2);
        assert_eq!(mock.create_requests(MockResource::DeviceTypes), vec![2]);
        assert!(sync.get("Juniper", "QFX5120-48Y").is_some());
    }

    #[tokio::test]
    async fn test_create_device_types_skips_unknown_manufacturer() {
        let mock = MockNetBoxClient::new("http://mock-netbox");
        let mfgs = manufacturers(&mock, &["Juniper"]);
        let mut sync = sync_for(&mock).await;
        let mut counter = SyncCounter::default();

        let definitions = vec![definition("Cisco", "C9300-48P", &[])];
        sync.create_device_types(&definitions, &mfgs, &mut counter).await.unwrap();

        assert_eq!(counter.added, 0);
        assert!(mock.create_requests(MockResource::DeviceTypes).is_empty());
    }

    #[tokio::test]
    async fn test_rejected_device_type_batch_is_logged_not_fatal() {
        let mock = MockNetBoxClient::new("http://mock-netbox");
        let mfgs = manufacturers(&mock, &["Juniper"]);
        mock.fail_creates(MockResource::DeviceTypes);
        let mut sync = sync_for(&mock).await;
        let mut counter = SyncCounter::default();

        let definitions = vec![definition("Juniper", "EX4400-48F", &[])];
        let result = sync.create_device_types(&definitions, &mfgs, &mut counter).await;

        assert!(result.is_ok());
        assert_eq!(counter.added, 0);
        assert!(sync.get("Juniper", "EX4400-48F").is_none());
    }

    #[tokio::test]
    async fn test_create_interfaces_diffs_by_name() {
        let mock = MockNetBoxClient::new("http://mock-netbox");
        let juniper = mock.add_manufacturer("Juniper");
        let ex = mock.add_device_type(&juniper, "EX2300-24T");
        mock.add_interface_template(&ex, "ge-0/0/0", "1000base-t");
        let sync = sync_for(&mock).await;
        let mut counter = SyncCounter::default();

        let desired = definition(
            "Juniper",
            "EX2300-24T",
            &[("ge-0/0/0", "1000base-t"), ("ge-0/0/1", "1000base-t"), ("xe-0/1/0", "10gbase-x-sfpp")],
        );
        sync.create_interfaces(&desired.interfaces, ex.id, &mut counter).await.unwrap();

        assert_eq!(counter.updated, 2);
        assert_eq!(mock.interface_template_count(ex.id), 3);
        assert_eq!(mock.create_requests(MockResource::InterfaceTemplates), vec![2]);
    }

    #[tokio::test]
    async fn test_create_interfaces_up_to_date_issues_no_create() {
        let mock = MockNetBoxClient::new("http://mock-netbox");
        let juniper = mock.add_manufacturer("Juniper");
        let ex = mock.add_device_type(&juniper, "EX2300-24T");
        mock.add_interface_template(&ex, "ge-0/0/0", "1000base-t");
        let sync = sync_for(&mock).await;
        let mut counter = SyncCounter::default();

        let desired = definition("Juniper", "EX2300-24T", &[("ge-0/0/0", "1000base-t")]);
        sync.create_interfaces(&desired.interfaces, ex.id, &mut counter).await.unwrap();

        assert!(counter.is_empty());
        assert!(mock.create_requests(MockResource::InterfaceTemplates).is_empty());
    }

    #[tokio::test]
    async fn test_rejected_interface_batch_is_logged_not_fatal() {
        let mock = MockNetBoxClient::new("http://mock-netbox");
        let juniper = mock.add_manufacturer("Juniper");
        let ex = mock.add_device_type(&juniper, "EX2300-24T");
        mock.fail_creates(MockResource::InterfaceTemplates);
        let sync = sync_for(&mock).await;
        let mut counter = SyncCounter::default();

        let desired = definition("Juniper", "EX2300-24T", &[("ge-0/0/0", "1000base-t")]);
        let result = sync.create_interfaces(&desired.interfaces, ex.id, &mut counter).await;

        assert!(result.is_ok());
        assert_eq!(counter.updated, 0);
        assert_eq!(mock.interface_template_count(ex.id), 0);
    }

    #[tokio::test]
    async fn test_authentication_failure_on_device_types_is_returned() {
        let mock = MockNetBoxClient::new("http://mock-netbox");
        let mfgs = manufacturers(&mock, &["Juniper"]);
        mock.fail_creates_with(MockResource::DeviceTypes, NetBoxError::Authentication);
        let mut sync = sync_for(&mock).await;
        let mut counter = SyncCounter::default();

        let definitions = vec![definition("Juniper", "EX4400-48F", &[])];
        let err = sync.create_device_types(&definitions, &mfgs, &mut counter).await.unwrap_err();

        assert!(matches!(err, SyncError::NetBox(NetBoxError::Authentication(_))));
        assert_eq!(counter.added, 0);
    }

    #[tokio::test]
    async fn test_rejected_template_query_is_returned_to_caller() {
        let mock = MockNetBoxClient::new("http://mock-netbox");
        let juniper = mock.add_manufacturer("Juniper");
        let ex = mock.add_device_type(&juniper, "EX2300-24T");
        mock.fail_queries(MockResource::InterfaceTemplates, NetBoxError::Api);
        let sync = sync_for(&mock).await;
        let mut counter = SyncCounter::default();

        let desired = definition("Juniper", "EX2300-24T", &[("ge-0/0/0", "1000base-t")]);
        let err = sync.create_interfaces(&desired.interfaces, ex.id, &mut counter).await.unwrap_err();

        assert!(matches!(err, SyncError::NetBox(ref e) if e.is_request_error()));
        assert!(mock.create_requests(MockResource::InterfaceTemplates).is_empty());
    }
}
