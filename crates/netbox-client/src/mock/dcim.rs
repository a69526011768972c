//! DCIM mock implementations
//!
//! Handles manufacturers, device types and interface templates

use super::{MockNetBoxClient, MockResource};
use crate::error::NetBoxError;
use crate::models::*;
use std::collections::HashSet;

fn filter_value<'a>(filters: &[(&str, &'a str)], key: &str) -> Option<&'a str> {
    filters.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

fn parse_id_filter(filters: &[(&str, &str)], key: &str) -> Result<Option<u64>, NetBoxError> {
    filter_value(filters, key)
        .map(|v| v.parse::<u64>().map_err(|e| NetBoxError::InvalidRequest(format!("{}={}: {}", key, v, e))))
        .transpose()
}

pub(super) fn build_manufacturer(client: &MockNetBoxClient, id: u64, request: &ManufacturerRequest) -> Manufacturer {
    Manufacturer {
        id,
        url: client.helpers().object_url("dcim/manufacturers", id),
        display: request.name.clone(),
        name: request.name.clone(),
        slug: request.slug.clone(),
        description: request.description.clone(),
        devicetype_count: Some(0),
        created: Some(chrono::Utc::now().to_rfc3339()),
        last_updated: Some(chrono::Utc::now().to_rfc3339()),
    }
}

pub(super) fn build_device_type(client: &MockNetBoxClient, id: u64, request: &DeviceTypeRequest) -> DeviceType {
    let helpers = client.helpers();
    let manufacturer = client
        .manufacturers
        .lock()
        .unwrap()
        .values()
        .find(|m| m.id == request.manufacturer)
        .map(|m| helpers.nested_manufacturer(m))
        .unwrap_or_else(|| helpers.placeholder_manufacturer(request.manufacturer));

    DeviceType {
        id,
        url: helpers.object_url("dcim/device-types", id),
        display: request.model.clone(),
        manufacturer,
        model: request.model.clone(),
        slug: request.slug.clone(),
        part_number: request.part_number.clone(),
        u_height: Some(request.u_height.unwrap_or(1.0)),
        is_full_depth: Some(request.is_full_depth.unwrap_or(true)),
        description: None,
        comments: request.comments.clone(),
        created: Some(chrono::Utc::now().to_rfc3339()),
        last_updated: Some(chrono::Utc::now().to_rfc3339()),
    }
}

pub(super) fn build_interface_template(client: &MockNetBoxClient, id: u64, request: &InterfaceTemplateRequest) -> InterfaceTemplate {
    let helpers = client.helpers();
    let device_type = client
        .device_types
        .lock()
        .unwrap()
        .get(&request.device_type)
        .map(|dt| helpers.nested_device_type(dt));

    InterfaceTemplate {
        id,
        url: helpers.object_url("dcim/interface-templates", id),
        display: request.name.clone(),
        device_type,
        name: request.name.clone(),
        label: request.label.clone(),
        interface_type: helpers.choice(&request.interface_type),
        mgmt_only: request.mgmt_only,
        description: request.description.clone(),
    }
}

pub async fn query_manufacturers(client: &MockNetBoxClient, filters: &[(&str, &str)], _fetch_all: bool) -> Result<Vec<Manufacturer>, NetBoxError> {
        client.check_query(MockResource::Manufacturers, filters)?;
        let manufacturers = client.manufacturers.lock().unwrap();
        let name = filter_value(filters, "name");
        let mut results: Vec<Manufacturer> = manufacturers
            .values()
            .filter(|m| name.is_none_or(|n| m.name == n))
            .cloned()
            .collect();
        results.sort_by_key(|m| m.id);
        Ok(results)
}

pub async fn create_manufacturers(client: &MockNetBoxClient, requests: &[ManufacturerRequest]) -> Result<Vec<Manufacturer>, NetBoxError> {
        client.record_create(MockResource::Manufacturers, requests.len())?;

        {
            let manufacturers = client.manufacturers.lock().unwrap();
            let mut seen = HashSet::new();
            for request in requests {
                let taken = manufacturers.values().any(|m| m.name == request.name || m.slug == request.slug);
                if taken || !seen.insert(request.name.as_str()) {
                    return Err(NetBoxError::Api(format!(
                        "POST /api/dcim/manufacturers/ failed: 400 Bad Request - manufacturer with this name already exists: {}",
                        request.name
                    )));
                }
            }
        }

        let created: Vec<Manufacturer> = requests
            .iter()
            .map(|request| build_manufacturer(client, client.next_id(), request))
            .collect();

        let mut manufacturers = client.manufacturers.lock().unwrap();
        for manufacturer in &created {
            manufacturers.insert(manufacturer.name.clone(), manufacturer.clone());
        }
        Ok(created)
}

pub async fn query_device_types(client: &MockNetBoxClient, filters: &[(&str, &str)], _fetch_all: bool) -> Result<Vec<DeviceType>, NetBoxError> {
        client.check_query(MockResource::DeviceTypes, filters)?;
        let manufacturer_id = parse_id_filter(filters, "manufacturer_id")?;
        let model = filter_value(filters, "model");
        let device_types = client.device_types.lock().unwrap();
        let mut results: Vec<DeviceType> = device_types
            .values()
            .filter(|dt| manufacturer_id.is_none_or(|id| dt.manufacturer.id == id))
            .filter(|dt| model.is_none_or(|m| dt.model == m))
            .cloned()
            .collect();
        results.sort_by_key(|dt| dt.id);
        Ok(results)
}

pub async fn create_device_types(client: &MockNetBoxClient, requests: &[DeviceTypeRequest]) -> Result<Vec<DeviceType>, NetBoxError> {
        client.record_create(MockResource::DeviceTypes, requests.len())?;

        {
            let manufacturers = client.manufacturers.lock().unwrap();
            let device_types = client.device_types.lock().unwrap();
            let mut seen = HashSet::new();
            for request in requests {
                if !manufacturers.values().any(|m| m.id == request.manufacturer) {
                    return Err(NetBoxError::Api(format!(
                        "POST /api/dcim/device-types/ failed: 400 Bad Request - related manufacturer {} not found",
                        request.manufacturer
                    )));
                }
                let taken = device_types
                    .values()
                    .any(|dt| dt.manufacturer.id == request.manufacturer && dt.model == request.model);
                if taken || !seen.insert((request.manufacturer, request.model.as_str())) {
                    return Err(NetBoxError::Api(format!(
                        "POST /api/dcim/device-types/ failed: 400 Bad Request - device type {} already exists",
                        request.model
                    )));
                }
            }
        }

        let created: Vec<DeviceType> = requests
            .iter()
            .map(|request| build_device_type(client, client.next_id(), request))
            .collect();

        let mut device_types = client.device_types.lock().unwrap();
        for device_type in &created {
            device_types.insert(device_type.id, device_type.clone());
        }
        Ok(created)
}

pub async fn query_interface_templates(client: &MockNetBoxClient, filters: &[(&str, &str)], _fetch_all: bool) -> Result<Vec<InterfaceTemplate>, NetBoxError> {
        client.check_query(MockResource::InterfaceTemplates, filters)?;
        // NetBox 3.x filters on `devicetype_id`, 4.x on `device_type_id`
        let device_type_id = match parse_id_filter(filters, "device_type_id")? {
            Some(id) => Some(id),
            None => parse_id_filter(filters, "devicetype_id")?,
        };
        let name = filter_value(filters, "name");
        let templates = client.interface_templates.lock().unwrap();
        let mut results: Vec<InterfaceTemplate> = templates
            .values()
            .filter(|t| device_type_id.is_none_or(|id| t.device_type.as_ref().map(|dt| dt.id) == Some(id)))
            .filter(|t| name.is_none_or(|n| t.name == n))
            .cloned()
            .collect();
        results.sort_by_key(|t| t.id);
        Ok(results)
}

pub async fn create_interface_templates(client: &MockNetBoxClient, requests: &[InterfaceTemplateRequest]) -> Result<Vec<InterfaceTemplate>, NetBoxError> {
        client.record_create(MockResource::InterfaceTemplates, requests.len())?;

        {
            let device_types = client.device_types.lock().unwrap();
            let templates = client.interface_templates.lock().unwrap();
            let mut seen = HashSet::new();
            for request in requests {
                if !device_types.contains_key(&request.device_type) {
                    return Err(NetBoxError::Api(format!(
                        "POST /api/dcim/interface-templates/ failed: 400 Bad Request - related device type {} not found",
                        request.device_type
                    )));
                }
                let taken = templates.values().any(|t| {
                    t.name == request.name && t.device_type.as_ref().map(|dt| dt.id) == Some(request.device_type)
                });
                if taken || !seen.insert((request.device_type, request.name.as_str())) {
                    return Err(NetBoxError::Api(format!(
                        "POST /api/dcim/interface-templates/ failed: 400 Bad Request - interface template {} already exists",
                        request.name
                    )));
                }
            }
        }

        let created: Vec<InterfaceTemplate> = requests
            .iter()
            .map(|request| build_interface_template(client, client.next_id(), request))
            .collect();

        let mut templates = client.interface_templates.lock().unwrap();
        for template in &created {
            templates.insert(template.id, template.clone());
        }
        Ok(created)
}
