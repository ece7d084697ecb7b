//! Async HTTP clients for fetching license data from upstream package registries.
//!
//! Each registry implements [`PackageRegistry`]: `Ok(Some(classification))` on
//! success, `Ok(None)` when the registry has no record for the name, and `Err`
//! on network or decode failures. Registries never expose full license text, so
//! `text` is always empty.

pub mod crates_io;
pub mod npm;
pub mod pypi;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Ecosystem, LicenseClassification, UNCLASSIFIED_LICENSE};

#[async_trait]
pub trait PackageRegistry: Send + Sync {
    fn ecosystem(&self) -> Ecosystem;

    async fn fetch_license(&self, package: &str) -> Result<Option<LicenseClassification>>;
}

/// Wrap a registry license label, substituting a placeholder when it is blank.
fn classification(license: Option<String>) -> LicenseClassification {
    let label = license
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| UNCLASSIFIED_LICENSE.to_string());
    LicenseClassification::new(label, "")
}
