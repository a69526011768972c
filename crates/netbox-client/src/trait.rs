//! NetBoxClient trait for mocking
//!
//! This trait abstracts the NetBoxClient to enable mocking in unit tests.
//! The concrete NetBoxClient implements this trait, and tests can use mock implementations.

use crate::error::NetBoxError;
use crate::models::*;

/// Trait for NetBox API client operations
///
/// This trait enables mocking of NetBox API calls for unit testing.
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait NetBoxClientTrait: Send + Sync {
    /// Get the base URL
    fn base_url(&self) -> &str;

    /// Validate the API token
    async fn validate_token(&self) -> Result<(), NetBoxError>;

    /// Fetch the instance status (carries the NetBox version)
    async fn get_status(&self) -> Result<Status, NetBoxError>;

    // DCIM Operations
    async fn query_manufacturers(&self, filters: &[(&str, &str)], fetch_all: bool) -> Result<Vec<Manufacturer>, NetBoxError>;
    async fn create_manufacturers(&self, requests: &[ManufacturerRequest]) -> Result<Vec<Manufacturer>, NetBoxError>;
    async fn query_device_types(&self, filters: &[(&str, &str)], fetch_all: bool) -> Result<Vec<DeviceType>, NetBoxError>;
    async fn create_device_types(&self, requests: &[DeviceTypeRequest]) -> Result<Vec<DeviceType>, NetBoxError>;
    async fn query_interface_templates(&self, filters: &[(&str, &str)], fetch_all: bool) -> Result<Vec<InterfaceTemplate>, NetBoxError>;
    async fn create_interface_templates(&self, requests: &[InterfaceTemplateRequest]) -> Result<Vec<InterfaceTemplate>, NetBoxError>;
}
