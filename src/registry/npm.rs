use anyhow::{bail, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use super::{classification, PackageRegistry};
use crate::models::{Ecosystem, LicenseClassification};

/// npm registry client.
pub struct Npm {
    client: Client,
    base_url: String,
}

impl Npm {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

/// `license` may be a string, the legacy `{type}` object or a `licenses` array.
fn license_of(manifest: &Value) -> Option<String> {
    match manifest.get("license") {
        Some(Value::String(s)) => return Some(s.clone()),
        Some(Value::Object(o)) => {
            return o.get("type").and_then(Value::as_str).map(str::to_string);
        }
        _ => {}
    }

    let types: Vec<&str> = manifest
        .get("licenses")
        .and_then(Value::as_array)?
        .iter()
        .filter_map(|l| l.get("type").and_then(Value::as_str))
        .collect();
    if types.is_empty() {
        None
    } else {
        Some(types.join(" OR "))
    }
}

#[async_trait]
impl PackageRegistry for Npm {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Node
    }

    async fn fetch_license(&self, package: &str) -> Result<Option<LicenseClassification>> {
        // Scoped packages need URL encoding: @scope/pkg → @scope%2Fpkg
        let encoded_name = package.trim().replace('/', "%2F");
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), encoded_name);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => return Ok(None),
            s if !s.is_success() => bail!("npm returned HTTP {} for {}", s.as_u16(), package),
            _ => {}
        }

        let data: Value = response.json().await?;

        // The packument carries the license at top level; prefer the latest
        // version's manifest when it is present.
        let latest = data
            .get("dist-tags")
            .and_then(|d| d.get("latest"))
            .and_then(Value::as_str)
            .and_then(|ver| data.get("versions").and_then(|vs| vs.get(ver)));

        let license = latest.and_then(license_of).or_else(|| license_of(&data));
        Ok(Some(classification(license)))
    }
}
