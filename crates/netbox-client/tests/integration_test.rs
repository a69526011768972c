//! Integration tests for NetBox client
//!
//! These tests require a running NetBox instance.
//! Set NETBOX_URL and NETBOX_TOKEN environment variables to run.

use netbox_client::{ClientOptions, NetBoxClient};

fn client_from_env() -> NetBoxClient {
    let url = std::env::var("NETBOX_URL")
        .unwrap_or_else(|_| "http://localhost:8001".to_string());
    let token = std::env::var("NETBOX_TOKEN")
        .expect("NETBOX_TOKEN environment variable must be set");
    let options = ClientOptions {
        accept_invalid_certs: std::env::var("IGNORE_SSL_ERRORS").is_ok_and(|v| v == "true"),
        ..ClientOptions::default()
    };

    NetBoxClient::with_options(url, token, options).expect("Failed to create client")
}

#[tokio::test]
#[ignore] // Requires running NetBox instance
async fn test_validate_token() {
    let client = client_from_env();

    let result = client.validate_token().await;
    assert!(result.is_ok(), "Failed to validate token: {:?}", result.err());
}

#[tokio::test]
#[ignore]
async fn test_status_reports_version() {
    let client = client_from_env();

    let status = client.get_status().await
        .expect("Failed to fetch status");

    println!("NetBox version {}", status.netbox_version);
    assert!(status.netbox_version.contains('.'));
}

#[tokio::test]
#[ignore]
async fn test_query_manufacturers() {
    let client = client_from_env();

    let manufacturers = client.query_manufacturers(&[], true).await
        .expect("Failed to query manufacturers");

    println!("Found {} manufacturers", manufacturers.len());
}

#[tokio::test]
#[ignore]
async fn test_query_device_types_and_templates() {
    let client = client_from_env();

    let device_types = client.query_device_types(&[], false).await
        .expect("Failed to query device types");

    if let Some(device_type) = device_types.first() {
        let id = device_type.id.to_string();
        let templates = client.query_interface_templates(&[("device_type_id", id.as_str())], true).await
            .expect("Failed to query interface templates");
        println!("{} has {} interface templates", device_type.model, templates.len());
    }
}

#[tokio::test]
#[ignore]
async fn test_create_empty_batch_is_noop() {
    let client = client_from_env();

    let created = client.create_interface_templates(&[]).await
        .expect("Empty batch should not fail");
    assert!(created.is_empty());
}
