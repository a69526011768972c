//! Helper functions for creating nested NetBox model types

use crate::models::*;

/// Helper functions for creating nested types in mock implementations
pub struct Helpers {
    base_url: String,
}

impl Helpers {
    pub fn new(base_url: String) -> Self {
        Self { base_url }
    }

    /// Helper to create NestedManufacturer from a stored manufacturer
    pub fn nested_manufacturer(&self, manufacturer: &Manufacturer) -> NestedManufacturer {
        NestedManufacturer {
            id: manufacturer.id,
            url: self.object_url("dcim/manufacturers", manufacturer.id),
            display: manufacturer.name.clone(),
            name: manufacturer.name.clone(),
            slug: manufacturer.slug.clone(),
        }
    }

    /// Helper to create a placeholder NestedManufacturer for an unknown ID
    pub fn placeholder_manufacturer(&self, id: u64) -> NestedManufacturer {
        NestedManufacturer {
            id,
            url: self.object_url("dcim/manufacturers", id),
            display: format!("Manufacturer {}", id),
            name: format!("Manufacturer {}", id),
            slug: format!("manufacturer-{}", id),
        }
    }

    /// Helper to create NestedDeviceType from a stored device type
    pub fn nested_device_type(&self, device_type: &DeviceType) -> NestedDeviceType {
        NestedDeviceType {
            id: device_type.id,
            url: self.object_url("dcim/device-types", device_type.id),
            display: device_type.model.clone(),
            manufacturer: Some(device_type.manufacturer.clone()),
            model: device_type.model.clone(),
            slug: Some(device_type.slug.clone()),
        }
    }

    /// Helper to build a NetBox choice value; the label mirrors the value
    pub fn choice(&self, value: &str) -> ChoiceValue {
        ChoiceValue {
            value: value.to_string(),
            label: value.to_uppercase(),
        }
    }

    /// Object URL in the form NetBox returns it
    pub fn object_url(&self, endpoint: &str, id: u64) -> String {
        format!("{}/api/{}/{}/", self.base_url, endpoint, id)
    }
}
