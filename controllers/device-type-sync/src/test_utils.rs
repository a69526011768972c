//! Test utilities for unit testing the sync
//!
//! This module provides helpers for creating test data and setting up test scenarios.

#[cfg(test)]
use crate::library::{DeviceTypeDefinition, InterfaceDefinition};
#[cfg(test)]
use std::path::Path;

/// Helper to create a device type definition with `(name, type)` interfaces
#[cfg(test)]
pub fn definition(manufacturer: &str, model: &str, interfaces: &[(&str, &str)]) -> DeviceTypeDefinition {
    DeviceTypeDefinition {
        manufacturer: manufacturer.to_string(),
        model: model.to_string(),
        slug: None,
        part_number: None,
        u_height: Some(1.0),
        is_full_depth: Some(false),
        comments: None,
        interfaces: interfaces
            .iter()
            .map(|(name, interface_type)| InterfaceDefinition {
                name: (*name).to_string(),
                interface_type: (*interface_type).to_string(),
                mgmt_only: false,
                label: None,
                description: None,
            })
            .collect(),
    }
}

/// Helper to write a definition file below `root`, creating parent directories
#[cfg(test)]
pub fn write_definition(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create definition directory");
    }
    std::fs::write(&path, contents).expect("Failed to write definition");
}
