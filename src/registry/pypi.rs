use anyhow::{bail, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use super::{classification, PackageRegistry};
use crate::models::{Ecosystem, LicenseClassification};

/// PyPI JSON API client.
pub struct PyPi {
    client: Client,
    base_url: String,
}

impl PyPi {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PackageMetadata {
    info: Option<PackageInfo>,
}

#[derive(Debug, Deserialize)]
struct PackageInfo {
    license_expression: Option<String>,
    license: Option<String>,
    #[serde(default)]
    classifiers: Vec<String>,
}

/// Pick the license label out of PyPI's `info` block.
///
/// `license_expression` (PEP 639) wins, then a `license` field that is not the
/// `UNKNOWN` placeholder, then the last segment of the first
/// `License :: ...` classifier.
fn license_label(info: &PackageInfo) -> Option<String> {
    let declared = [&info.license_expression, &info.license]
        .into_iter()
        .filter_map(|field| field.as_deref().map(str::trim))
        .find(|l| !l.is_empty() && !l.eq_ignore_ascii_case("unknown"));
    if let Some(license) = declared {
        return Some(license.to_string());
    }

    info.classifiers
        .iter()
        .find(|c| c.starts_with("License ::"))
        .and_then(|c| c.rsplit("::").next())
        .map(|last| last.trim().to_string())
        .filter(|l| !l.is_empty())
}

#[async_trait]
impl PackageRegistry for PyPi {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Python
    }

    async fn fetch_license(&self, package: &str) -> Result<Option<LicenseClassification>> {
        let url = format!(
            "{}/pypi/{}/json",
            self.base_url.trim_end_matches('/'),
            package.trim()
        );

        let response = self.client.get(&url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => return Ok(None),
            s if !s.is_success() => bail!("PyPI returned HTTP {} for {}", s.as_u16(), package),
            _ => {}
        }

        let metadata: PackageMetadata = response.json().await?;
        let Some(info) = metadata.info else {
            return Ok(None);
        };

        Ok(Some(classification(license_label(&info))))
    }
}
