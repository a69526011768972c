//! NetBox API models
//!
//! These models match the NetBox DCIM REST API serializers for the objects
//! the device-type sync touches. See: netbox/dcim/api/serializers_/

use serde::{Deserialize, Serialize};

/// Response of `GET /api/status/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Status {
    #[serde(rename = "netbox-version")]
    pub netbox_version: String,
    #[serde(rename = "django-version", default)]
    pub django_version: Option<String>,
    #[serde(rename = "python-version", default)]
    pub python_version: Option<String>,
    #[serde(default)]
    pub plugins: serde_json::Value,
}

/// Manufacturer model matching NetBox ManufacturerSerializer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Manufacturer {
    pub id: u64,
    pub url: String,
    pub display: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub devicetype_count: Option<u64>,
    #[serde(default)]
    pub created: Option<String>, // ISO 8601 datetime
    #[serde(default)]
    pub last_updated: Option<String>, // ISO 8601 datetime
}

/// Device type model matching NetBox DeviceTypeSerializer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DeviceType {
    pub id: u64,
    pub url: String,
    pub display: String,
    pub manufacturer: NestedManufacturer,
    pub model: String,
    pub slug: String,
    #[serde(default)]
    pub part_number: Option<String>,
    #[serde(default)]
    pub u_height: Option<f64>,
    #[serde(default)]
    pub is_full_depth: Option<bool>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

/// Interface template model matching NetBox InterfaceTemplateSerializer
///
/// `device_type` is null when the template belongs to a module type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct InterfaceTemplate {
    pub id: u64,
    pub url: String,
    pub display: String,
    pub device_type: Option<NestedDeviceType>,
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub interface_type: ChoiceValue,
    #[serde(default)]
    pub mgmt_only: bool,
    #[serde(default)]
    pub description: Option<String>,
}

/// NetBox choice field as returned by the API: `{"value": ..., "label": ...}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChoiceValue {
    pub value: String,
    pub label: String,
}

// Nested serializers (simplified versions for references)

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NestedManufacturer {
    pub id: u64,
    pub url: String,
    pub display: String,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NestedDeviceType {
    pub id: u64,
    pub url: String,
    pub display: String,
    #[serde(default)]
    pub manufacturer: Option<NestedManufacturer>,
    pub model: String,
    #[serde(default)]
    pub slug: Option<String>,
}

// Write serializers (request bodies)

/// Request body for creating a manufacturer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManufacturerRequest {
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ManufacturerRequest {
    /// Build a request deriving the slug from the name
    pub fn from_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            slug: slugify(name),
            description: None,
        }
    }
}

/// Request body for creating a device type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceTypeRequest {
    /// Manufacturer ID
    pub manufacturer: u64,
    pub model: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub u_height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_full_depth: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

/// Request body for creating an interface template
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InterfaceTemplateRequest {
    /// Device type ID
    pub device_type: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub interface_type: String,
    #[serde(default)]
    pub mgmt_only: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// NetBox-style slug matching `^[-a-zA-Z0-9_]+$`
///
/// Lowercases, collapses every run of other characters into a single dash
/// and trims dashes from both ends.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}
