use anyhow::{bail, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use super::{classification, PackageRegistry};
use crate::models::{Ecosystem, LicenseClassification};

/// crates.io API client.
pub struct CratesIo {
    client: Client,
    base_url: String,
}

impl CratesIo {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CrateResponse {
    #[serde(rename = "crate")]
    krate: CrateInfo,
    #[serde(default)]
    versions: Vec<VersionInfo>,
}

#[derive(Debug, Deserialize)]
struct CrateInfo {
    max_stable_version: Option<String>,
    max_version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VersionInfo {
    num: String,
    license: Option<String>,
    #[serde(default)]
    yanked: bool,
}

impl CrateResponse {
    /// License of the newest stable version, else of the newest unyanked one.
    fn license(&self) -> Option<String> {
        let wanted = self
            .krate
            .max_stable_version
            .as_deref()
            .or(self.krate.max_version.as_deref());

        wanted
            .and_then(|num| self.versions.iter().find(|v| v.num == num))
            .or_else(|| self.versions.iter().find(|v| !v.yanked))
            .and_then(|v| v.license.clone())
    }
}

#[async_trait]
impl PackageRegistry for CratesIo {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Rust
    }

    async fn fetch_license(&self, package: &str) -> Result<Option<LicenseClassification>> {
        let url = format!(
            "{}/api/v1/crates/{}",
            self.base_url.trim_end_matches('/'),
            package.trim()
        );

        let response = self.client.get(&url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => return Ok(None),
            s if !s.is_success() => bail!("crates.io returned HTTP {} for {}", s.as_u16(), package),
            _ => {}
        }

        let data: CrateResponse = response.json().await?;
        Ok(Some(classification(data.license())))
    }
}
