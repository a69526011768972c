//! NetBox API client
//!
//! Implements the NetBox REST API client for the DCIM objects that make up
//! a device-type definition.
//! Based on NetBox API structure: /api/dcim/manufacturers/, /api/dcim/device-types/
//! and /api/dcim/interface-templates/

use crate::common::query::{query_resources, resource_path};
use crate::common::HttpClient;
use crate::error::NetBoxError;
use crate::models::*;
use crate::netbox_trait::NetBoxClientTrait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

const MANUFACTURERS: &str = "dcim/manufacturers";
const DEVICE_TYPES: &str = "dcim/device-types";
const INTERFACE_TEMPLATES: &str = "dcim/interface-templates";

/// Connection options for [`NetBoxClient`]
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout
    pub timeout: Duration,
    /// Skip TLS certificate verification (self-signed NetBox deployments)
    pub accept_invalid_certs: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            accept_invalid_certs: false,
        }
    }
}

/// NetBox API client
#[derive(Debug)]
pub struct NetBoxClient {
    http: HttpClient,
}

impl NetBoxClient {
    /// Create a new NetBox client
    ///
    /// # Arguments
    /// * `base_url` - NetBox base URL (e.g., "http://netbox:80")
    /// * `token` - API token for authentication
    pub fn new(base_url: String, token: String) -> Result<Self, NetBoxError> {
        Self::with_options(base_url, token, ClientOptions::default())
    }

    /// Create a new NetBox client with explicit connection options
    pub fn with_options(base_url: String, token: String, options: ClientOptions) -> Result<Self, NetBoxError> {
        if options.accept_invalid_certs {
            warn!("TLS certificate verification is disabled for {}", base_url);
        }

        let client = Client::builder()
            .timeout(options.timeout)
            .danger_accept_invalid_certs(options.accept_invalid_certs)
            .build()
            .map_err(NetBoxError::Http)?;

        Ok(Self {
            http: HttpClient::new(client, base_url, token),
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    /// Validate the API token by making a simple authenticated request.
    ///
    /// This method tests connectivity and token validity before proceeding with operations.
    /// It makes a lightweight request to the NetBox status endpoint.
    ///
    /// # Returns
    /// * `Ok(())` - Token is valid and NetBox is reachable
    /// * `Err(NetBoxError)` - Token is invalid or NetBox is unreachable
    pub async fn validate_token(&self) -> Result<(), NetBoxError> {
        debug!("Validating NetBox token and connectivity");
        self.get_status().await?;
        debug!("Token validated successfully");
        Ok(())
    }

    /// Get the instance status, including the running NetBox version
    pub async fn get_status(&self) -> Result<Status, NetBoxError> {
        self.http.get("/api/status/").await
    }

    /// POST a batch of objects to a list endpoint.
    ///
    /// An empty batch short-circuits without a request.
    async fn bulk_create<B, T>(&self, endpoint: &str, requests: &[B]) -> Result<Vec<T>, NetBoxError>
    where
        B: serde::Serialize + Sync,
        T: for<'de> serde::Deserialize<'de>,
    {
        if requests.is_empty() {
            return Ok(Vec::new());
        }

        let path = resource_path(&self.http, endpoint, &[]);
        debug!("Bulk creating {} objects at {}", requests.len(), path);
        let created: Vec<T> = self.http.post(&path, requests).await?;

        if created.len() != requests.len() {
            return Err(NetBoxError::Api(format!(
                "Bulk create at {} returned {} objects for {} requested",
                path,
                created.len(),
                requests.len()
            )));
        }

        Ok(created)
    }

    // ============================================================================
    // DCIM API Methods - Manufacturers
    // ============================================================================

    /// Query manufacturers by filters
    pub async fn query_manufacturers(&self, filters: &[(&str, &str)], fetch_all: bool) -> Result<Vec<Manufacturer>, NetBoxError> {
        debug!("Querying manufacturers with filters: {:?}", filters);
        query_resources(&self.http, MANUFACTURERS, filters, fetch_all).await
    }

    /// Create manufacturers in a single bulk request
    pub async fn create_manufacturers(&self, requests: &[ManufacturerRequest]) -> Result<Vec<Manufacturer>, NetBoxError> {
        self.bulk_create(MANUFACTURERS, requests).await
    }

    // ============================================================================
    // DCIM API Methods - Device Types
    // ============================================================================

    /// Query device types by filters
    pub async fn query_device_types(&self, filters: &[(&str, &str)], fetch_all: bool) -> Result<Vec<DeviceType>, NetBoxError> {
        debug!("Querying device types with filters: {:?}", filters);
        query_resources(&self.http, DEVICE_TYPES, filters, fetch_all).await
    }

    /// Create device types in a single bulk request
    pub async fn create_device_types(&self, requests: &[DeviceTypeRequest]) -> Result<Vec<DeviceType>, NetBoxError> {
        self.bulk_create(DEVICE_TYPES, requests).await
    }

    // ============================================================================
    // DCIM API Methods - Interface Templates
    // ============================================================================

    /// Query interface templates by filters
    pub async fn query_interface_templates(&self, filters: &[(&str, &str)], fetch_all: bool) -> Result<Vec<InterfaceTemplate>, NetBoxError> {
        debug!("Querying interface templates with filters: {:?}", filters);
        query_resources(&self.http, INTERFACE_TEMPLATES, filters, fetch_all).await
    }

    /// Create interface templates in a single bulk request
    pub async fn create_interface_templates(&self, requests: &[InterfaceTemplateRequest]) -> Result<Vec<InterfaceTemplate>, NetBoxError> {
        self.bulk_create(INTERFACE_TEMPLATES, requests).await
    }
}

// Implement NetBoxClientTrait for NetBoxClient
// This delegates all trait methods to the existing implementations
#[async_trait::async_trait]
impl NetBoxClientTrait for NetBoxClient {
    fn base_url(&self) -> &str {
        self.base_url()
    }

    async fn validate_token(&self) -> Result<(), NetBoxError> {
        self.validate_token().await
    }

    async fn get_status(&self) -> Result<Status, NetBoxError> {
        self.get_status().await
    }

    async fn query_manufacturers(&self, filters: &[(&str, &str)], fetch_all: bool) -> Result<Vec<Manufacturer>, NetBoxError> {
        self.query_manufacturers(filters, fetch_all).await
    }

    async fn create_manufacturers(&self, requests: &[ManufacturerRequest]) -> Result<Vec<Manufacturer>, NetBoxError> {
        self.create_manufacturers(requests).await
    }

    async fn query_device_types(&self, filters: &[(&str, &str)], fetch_all: bool) -> Result<Vec<DeviceType>, NetBoxError> {
        self.query_device_types(filters, fetch_all).await
    }

    async fn create_device_types(&self, requests: &[DeviceTypeRequest]) -> Result<Vec<DeviceType>, NetBoxError> {
        self.create_device_types(requests).await
    }

    async fn query_interface_templates(&self, filters: &[(&str, &str)], fetch_all: bool) -> Result<Vec<InterfaceTemplate>, NetBoxError> {
        self.query_interface_templates(filters, fetch_all).await
    }

    async fn create_interface_templates(&self, requests: &[InterfaceTemplateRequest]) -> Result<Vec<InterfaceTemplate>, NetBoxError> {
        self.create_interface_templates(requests).await
    }
}
