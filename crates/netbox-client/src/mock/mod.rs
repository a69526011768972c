//! Mock NetBoxClient for unit testing
//!
//! This module provides a mock implementation of NetBoxClientTrait that can be used
//! in unit tests without requiring a running NetBox instance.
//!
//! The mock is organized into modules:
//! - `dcim.rs` - DCIM operations (manufacturers, device types, interface templates)
//! - `helpers.rs` - Helper functions for creating nested types

mod helpers;
mod dcim;

use crate::error::NetBoxError;
use crate::models::*;
use crate::netbox_trait::NetBoxClientTrait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Builds the error an injected failure returns, e.g. `NetBoxError::Authentication`
pub type MockFailure = fn(String) -> NetBoxError;

/// Resource kinds the mock can be told to reject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockResource {
    Manufacturers,
    DeviceTypes,
    InterfaceTemplates,
}

/// Mock NetBoxClient for testing
///
/// This mock stores resources in memory and can be configured to return
/// specific responses for testing different scenarios. Bulk creates are
/// all-or-nothing, like NetBox's transactional bulk endpoints.
#[derive(Clone, Debug)]
pub struct MockNetBoxClient {
    pub(crate) base_url: String,
    pub(crate) version: Arc<Mutex<String>>,
    // In-memory storage for resources
    pub(crate) manufacturers: Arc<Mutex<HashMap<String, Manufacturer>>>,
    pub(crate) device_types: Arc<Mutex<HashMap<u64, DeviceType>>>,
    pub(crate) interface_templates: Arc<Mutex<HashMap<u64, InterfaceTemplate>>>,
    // Failure injection and request accounting
    pub(crate) failing: Arc<Mutex<HashMap<MockResource, MockFailure>>>,
    /// Query failures; `Some(value)` only fails queries with that filter value
    pub(crate) failing_queries: Arc<Mutex<Vec<(MockResource, Option<String>, MockFailure)>>>,
    pub(crate) create_requests: Arc<Mutex<Vec<(MockResource, usize)>>>,
    // Counter for generating IDs
    pub(crate) next_id: Arc<Mutex<u64>>,
}

impl MockNetBoxClient {
    /// Create a new mock client reporting NetBox 3.7.0
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            version: Arc::new(Mutex::new("3.7.0".to_string())),
            manufacturers: Arc::new(Mutex::new(HashMap::new())),
            device_types: Arc::new(Mutex::new(HashMap::new())),
            interface_templates: Arc::new(Mutex::new(HashMap::new())),
            failing: Arc::new(Mutex::new(HashMap::new())),
            failing_queries: Arc::new(Mutex::new(Vec::new())),
            create_requests: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(Mutex::new(1)),
        }
    }

    /// Set the version reported by `get_status`
    pub fn set_version(&self, version: &str) {
        *self.version.lock().unwrap() = version.to_string();
    }

    /// Make every create request for `resource` fail with an API error
    pub fn fail_creates(&self, resource: MockResource) {
        self.fail_creates_with(resource, NetBoxError::Api);
    }

    /// Make every create request for `resource` fail with the given error kind
    pub fn fail_creates_with(&self, resource: MockResource, failure: MockFailure) {
        self.failing.lock().unwrap().insert(resource, failure);
    }

    /// Make every query for `resource` fail with the given error kind
    pub fn fail_queries(&self, resource: MockResource, failure: MockFailure) {
        self.failing_queries.lock().unwrap().push((resource, None, failure));
    }

    /// Fail queries for `resource` whose filters carry `value` (e.g. a device type id)
    pub fn fail_queries_matching(&self, resource: MockResource, value: &str, failure: MockFailure) {
        self.failing_queries
            .lock()
            .unwrap()
            .push((resource, Some(value.to_string()), failure));
    }

    /// Seed a manufacturer (for test setup)
    pub fn add_manufacturer(&self, name: &str) -> Manufacturer {
        let id = self.next_id();
        let manufacturer = dcim::build_manufacturer(self, id, &ManufacturerRequest::from_name(name));
        self.manufacturers.lock().unwrap().insert(name.to_string(), manufacturer.clone());
        manufacturer
    }

    /// Seed a device type under an existing manufacturer (for test setup)
    pub fn add_device_type(&self, manufacturer: &Manufacturer, model: &str) -> DeviceType {
        let id = self.next_id();
        let request = DeviceTypeRequest {
            manufacturer: manufacturer.id,
            model: model.to_string(),
            slug: slugify(model),
            part_number: None,
            u_height: None,
            is_full_depth: None,
            comments: None,
        };
        let device_type = dcim::build_device_type(self, id, &request);
        self.device_types.lock().unwrap().insert(id, device_type.clone());
        device_type
    }

    /// Seed an interface template on an existing device type (for test setup)
    pub fn add_interface_template(&self, device_type: &DeviceType, name: &str, interface_type: &str) -> InterfaceTemplate {
        let id = self.next_id();
        let request = InterfaceTemplateRequest {
            device_type: device_type.id,
            name: name.to_string(),
            interface_type: interface_type.to_string(),
            mgmt_only: false,
            label: None,
            description: None,
        };
        let template = dcim::build_interface_template(self, id, &request);
        self.interface_templates.lock().unwrap().insert(id, template.clone());
        template
    }

    /// Number of stored interface templates for a device type
    pub fn interface_template_count(&self, device_type_id: u64) -> usize {
        self.interface_templates
            .lock()
            .unwrap()
            .values()
            .filter(|t| t.device_type.as_ref().map(|dt| dt.id) == Some(device_type_id))
            .count()
    }

    /// Batch sizes of create requests issued for `resource`, in order
    pub fn create_requests(&self, resource: MockResource) -> Vec<usize> {
        self.create_requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(kind, _)| *kind == resource)
            .map(|(_, size)| *size)
            .collect()
    }

    /// Generate next ID
    pub(crate) fn next_id(&self) -> u64 {
        let mut id = self.next_id.lock().unwrap();
        let current = *id;
        *id += 1;
        current
    }

    /// Record a create request and apply failure injection
    pub(crate) fn record_create(&self, resource: MockResource, size: usize) -> Result<(), NetBoxError> {
        self.create_requests.lock().unwrap().push((resource, size));
        match self.failing.lock().unwrap().get(&resource) {
            Some(failure) => Err(failure(format!("POST {:?} failed - injected failure", resource))),
            None => Ok(()),
        }
    }

    /// Apply query failure injection
    pub(crate) fn check_query(&self, resource: MockResource, filters: &[(&str, &str)]) -> Result<(), NetBoxError> {
        let failing = self.failing_queries.lock().unwrap();
        let hit = failing.iter().find(|(kind, value, _)| {
            *kind == resource && value.as_deref().is_none_or(|v| filters.iter().any(|(_, f)| *f == v))
        });
        match hit {
            Some((_, _, failure)) => Err(failure(format!("GET {:?} {:?} failed - injected failure", resource, filters))),
            None => Ok(()),
        }
    }

    /// Get helpers instance
    pub(crate) fn helpers(&self) -> helpers::Helpers {
        helpers::Helpers::new(self.base_url.clone())
    }
}

#[async_trait::async_trait]
impl NetBoxClientTrait for MockNetBoxClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn validate_token(&self) -> Result<(), NetBoxError> {
        Ok(())
    }

    async fn get_status(&self) -> Result<Status, NetBoxError> {
        Ok(Status {
            netbox_version: self.version.lock().unwrap().clone(),
            django_version: None,
            python_version: None,
            plugins: serde_json::Value::Null,
        })
    }

    // DCIM Operations - delegated to dcim module
    async fn query_manufacturers(&self, filters: &[(&str, &str)], fetch_all: bool) -> Result<Vec<Manufacturer>, NetBoxError> {
        dcim::query_manufacturers(self, filters, fetch_all).await
    }

    async fn create_manufacturers(&self, requests: &[ManufacturerRequest]) -> Result<Vec<Manufacturer>, NetBoxError> {
        dcim::create_manufacturers(self, requests).await
    }

    async fn query_device_types(&self, filters: &[(&str, &str)], fetch_all: bool) -> Result<Vec<DeviceType>, NetBoxError> {
        dcim::query_device_types(self, filters, fetch_all).await
    }

    async fn create_device_types(&self, requests: &[DeviceTypeRequest]) -> Result<Vec<DeviceType>, NetBoxError> {
        dcim::create_device_types(self, requests).await
    }

    async fn query_interface_templates(&self, filters: &[(&str, &str)], fetch_all: bool) -> Result<Vec<InterfaceTemplate>, NetBoxError> {
        dcim::query_interface_templates(self, filters, fetch_all).await
    }

    async fn create_interface_templates(&self, requests: &[InterfaceTemplateRequest]) -> Result<Vec<InterfaceTemplate>, NetBoxError> {
        dcim::create_interface_templates(self, requests).await
    }
}
