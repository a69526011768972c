//! NetBox REST API Client
//!
//! A Rust client library for interacting with the NetBox REST API.
//! Provides type-safe models and methods for the DCIM objects that describe
//! hardware: manufacturers, device types and interface templates.
//!
//! # Example
//!
//! ```no_run
//! use netbox_client::{NetBoxClient, ManufacturerRequest};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create a client
//! let client = NetBoxClient::new(
//!     "http://netbox:80".to_string(),
//!     "your-api-token".to_string(),
//! )?;
//!
//! // Fetch every manufacturer across all pages
//! let manufacturers = client.query_manufacturers(&[], true).await?;
//!
//! // Create the ones that are missing in a single bulk request
//! let created = client
//!     .create_manufacturers(&[ManufacturerRequest::from_name("Juniper")])
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **DCIM Operations**: Query and bulk-create manufacturers, device types, interface templates
//! - **Status**: Token validation and NetBox version discovery
//! - **Pagination**: Support for fetching all pages of large result sets
//! - **Mocking**: In-memory `MockNetBoxClient` behind the `test-util` feature

pub mod client;
pub mod common;
pub mod error;
pub mod models;
#[path = "trait.rs"]
pub mod netbox_trait;
#[cfg(feature = "test-util")]
pub mod mock;

pub use client::{ClientOptions, NetBoxClient};
pub use common::{HttpClient, PaginatedResponse};
pub use error::NetBoxError;
pub use models::*;
pub use netbox_trait::NetBoxClientTrait;
#[cfg(feature = "test-util")]
pub use mock::{MockFailure, MockNetBoxClient, MockResource};
