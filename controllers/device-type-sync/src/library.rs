//! Device-type library loading
//!
//! The desired state is a directory tree of YAML definitions in the
//! community device-type-library layout, one device type per file:
//!
//! ```yaml
//! manufacturer: Juniper
//! model: EX2300-24T
//! slug: juniper-ex2300-24t
//! u_height: 1
//! is_full_depth: false
//! interfaces:
//!   - name: ge-0/0/0
//!     type: 1000base-t
//!   - name: em0
//!     type: 1000base-t
//!     mgmt_only: true
//! ```
//!
//! Keys the sync does not manage (console ports, power ports, ...) are ignored.

use crate::error::SyncError;
use netbox_client::{slugify, DeviceTypeRequest, InterfaceTemplateRequest, ManufacturerRequest};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One device type definition
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DeviceTypeDefinition {
    pub manufacturer: String,
    pub model: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub part_number: Option<String>,
    #[serde(default)]
    pub u_height: Option<f64>,
    #[serde(default)]
    pub is_full_depth: Option<bool>,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default)]
    pub interfaces: Vec<InterfaceDefinition>,
}

impl DeviceTypeDefinition {
    /// Build the NetBox create request once the manufacturer ID is known
    pub fn to_request(&self, manufacturer_id: u64) -> DeviceTypeRequest {
        DeviceTypeRequest {
            manufacturer: manufacturer_id,
            model: self.model.clone(),
            slug: self.slug.clone().unwrap_or_else(|| slugify(&self.model)),
            part_number: self.part_number.clone(),
            u_height: self.u_height,
            is_full_depth: self.is_full_depth,
            comments: self.comments.clone(),
        }
    }
}

/// One interface template definition
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct InterfaceDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub interface_type: String,
    #[serde(default)]
    pub mgmt_only: bool,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl InterfaceDefinition {
    /// Build the NetBox create request stamped with the owning device type
    pub fn to_request(&self, device_type_id: u64) -> InterfaceTemplateRequest {
        InterfaceTemplateRequest {
            device_type: device_type_id,
            name: self.name.clone(),
            interface_type: self.interface_type.clone(),
            mgmt_only: self.mgmt_only,
            label: self.label.clone(),
            description: self.description.clone(),
        }
    }
}

/// A vendor (NetBox manufacturer) derived from the library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vendor {
    pub name: String,
    pub slug: String,
}

impl Vendor {
    pub fn to_request(&self) -> ManufacturerRequest {
        ManufacturerRequest {
            name: self.name.clone(),
            slug: self.slug.clone(),
            description: None,
        }
    }

    fn matches(&self, wanted: &str) -> bool {
        self.name.eq_ignore_ascii_case(wanted) || self.slug.eq_ignore_ascii_case(wanted)
    }
}

/// The full desired state for one run
#[derive(Debug, Clone, Default)]
pub struct Library {
    device_types: Vec<DeviceTypeDefinition>,
}

impl Library {
    /// Build a library from definitions, dropping duplicate (manufacturer, model) pairs
    pub fn from_definitions(definitions: Vec<DeviceTypeDefinition>) -> Self {
        let mut seen = HashSet::new();
        let mut device_types = Vec::with_capacity(definitions.len());
        for definition in definitions {
            let key = (definition.manufacturer.clone(), definition.model.clone());
            if seen.insert(key) {
                device_types.push(definition);
            } else {
                warn!(
                    "Duplicate definition for {} {}, keeping the first",
                    definition.manufacturer, definition.model
                );
            }
        }
        Self { device_types }
    }

    /// Load every `*.yaml` / `*.yml` file under `root`, recursively, in path order
    pub fn load_dir(root: &Path) -> Result<Self, SyncError> {
        let mut files = Vec::new();
        collect_yaml_files(root, &mut files)?;
        files.sort();

        let mut definitions = Vec::with_capacity(files.len());
        for path in files {
            debug!("Loading device type definition {}", path.display());
            let contents = fs::read_to_string(&path)?;
            let definition = parse_definition(&contents).map_err(|e| SyncError::Library {
                path: path.clone(),
                message: e.to_string(),
            })?;
            definitions.push(definition);
        }

        Ok(Self::from_definitions(definitions))
    }

    /// Keep only the named vendors (case-insensitive on name or slug); empty keeps everything
    #[must_use]
    pub fn filter_vendors(self, wanted: &[String]) -> Self {
        if wanted.is_empty() {
            return self;
        }
        let device_types = self
            .device_types
            .into_iter()
            .filter(|dt| {
                let vendor = vendor_for(&dt.manufacturer);
                wanted.iter().any(|w| vendor.matches(w))
            })
            .collect();
        Self { device_types }
    }

    pub fn device_types(&self) -> &[DeviceTypeDefinition] {
        &self.device_types
    }

    /// Distinct vendors in first-seen order
    pub fn vendors(&self) -> Vec<Vendor> {
        let mut seen = HashSet::new();
        self.device_types
            .iter()
            .filter(|dt| seen.insert(dt.manufacturer.as_str()))
            .map(|dt| vendor_for(&dt.manufacturer))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.device_types.is_empty()
    }
}

fn vendor_for(manufacturer: &str) -> Vendor {
    Vendor {
        name: manufacturer.to_string(),
        slug: slugify(manufacturer),
    }
}

fn parse_definition(contents: &str) -> Result<DeviceTypeDefinition, serde_yaml::Error> {
    serde_yaml::from_str(contents)
}

/// Hidden entries (`.git`, `.github`, ...) are skipped and directory
/// symlinks are never followed.
fn collect_yaml_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), SyncError> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            collect_yaml_files(&path, files)?;
        } else if path.is_file()
            && path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext == "yaml" || ext == "yml")
        {
            files.push(path);
        }
    }
    Ok(())
}
