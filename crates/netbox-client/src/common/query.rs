//! Query utilities for NetBox API
//!
//! Provides helpers for building queries and handling pagination.

use crate::common::{HttpClient, PaginatedResponse};
use crate::error::NetBoxError;
use serde::Deserialize;

/// Query resources with optional filtering and pagination
///
/// `endpoint` is relative to `/api/`, e.g. `dcim/manufacturers`.
pub async fn query_resources<T: for<'de> Deserialize<'de>>(
    http: &HttpClient,
    endpoint: &str,
    filters: &[(&str, &str)],
    fetch_all: bool,
) -> Result<Vec<T>, NetBoxError> {
    let url = resource_path(http, endpoint, filters);

    if fetch_all {
        http.fetch_all_pages(http.build_url(&url)).await
    } else {
        let response: PaginatedResponse<T> = http.get(&url).await?;
        Ok(response.results)
    }
}

/// Build the list path for an endpoint, with an encoded query string if any
pub fn resource_path(http: &HttpClient, endpoint: &str, filters: &[(&str, &str)]) -> String {
    let url = format!("/api/{}/", endpoint);
    if filters.is_empty() {
        url
    } else {
        format!("{}?{}", url, http.build_query_string(filters))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_path() {
        let http = HttpClient::new(reqwest::Client::new(), "http://netbox".to_string(), "t".to_string());
        assert_eq!(resource_path(&http, "dcim/device-types", &[]), "/api/dcim/device-types/");
        assert_eq!(
            resource_path(&http, "dcim/interface-templates", &[("devicetype_id", "4")]),
            "/api/dcim/interface-templates/?devicetype_id=4"
        );
    }
}
