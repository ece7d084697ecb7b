//! Top-level dependency processing: dispatch each input by kind, resolve its
//! license, name it, and return one report per input in input order.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tokio::time::timeout;
use tracing::{info, warn};

use crate::error::{OrNotFound, Resolution, Unresolved};
use crate::models::{
    DependencyInput, DependencyKind, Ecosystem, LicenseClassification, LicenseReport, Outcome,
};
use crate::oracle::{prompts, TextOracle};
use crate::registry::PackageRegistry;
use crate::resolver::{LicenseResolver, NameResolver};

/// Characters of the raw input used as a display name when the oracle has none.
const FALLBACK_NAME_CHARS: usize = 15;

pub struct DependencyProcessor {
    oracle: Arc<dyn TextOracle>,
    names: NameResolver,
    licenses: LicenseResolver,
    registries: Vec<Arc<dyn PackageRegistry>>,
    concurrency: usize,
    item_budget: Duration,
}

impl DependencyProcessor {
    pub fn new(
        oracle: Arc<dyn TextOracle>,
        names: NameResolver,
        licenses: LicenseResolver,
        registries: Vec<Arc<dyn PackageRegistry>>,
    ) -> Self {
        Self {
            oracle,
            names,
            licenses,
            registries,
            concurrency: 1,
            item_budget: Duration::from_secs(180),
        }
    }

    /// Items resolved at once. Output order is unaffected.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Upper bound on the time spent on a single item.
    pub fn with_item_budget(mut self, budget: Duration) -> Self {
        self.item_budget = budget;
        self
    }

    /// Resolve a batch. Always returns exactly one report per input, in order.
    pub async fn process(&self, items: &[DependencyInput]) -> Vec<LicenseReport> {
        self.process_with(items, |_| {}).await
    }

    /// Like [`process`](Self::process), calling `on_report` as each report is
    /// emitted.
    pub async fn process_with<F>(&self, items: &[DependencyInput], on_report: F) -> Vec<LicenseReport>
    where
        F: Fn(&LicenseReport),
    {
        stream::iter(items)
            .map(|item| self.process_one(item))
            .buffered(self.concurrency)
            .inspect(|report| on_report(report))
            .collect()
            .await
    }

    async fn process_one(&self, item: &DependencyInput) -> LicenseReport {
        let (resolved, dep_name) = tokio::join!(
            timeout(self.item_budget, self.classify(item)),
            timeout(self.item_budget, self.display_name(&item.data)),
        );

        let (classification, outcome) = resolved.unwrap_or_else(|_| {
            warn!(data = %item.data, budget = ?self.item_budget, "license resolution timed out");
            (LicenseClassification::unknown(), Outcome::TimedOut)
        });
        let dep_name = dep_name.unwrap_or_else(|_| truncated_name(&item.data));

        LicenseReport::new(dep_name, item.data.clone(), classification, outcome)
    }

    async fn classify(&self, item: &DependencyInput) -> (LicenseClassification, Outcome) {
        let resolution = match &item.data_type {
            DependencyKind::Name => self.resolve_name(&item.data).await,
            DependencyKind::RepositoryLink => self.licenses.resolve_license(&item.data).await,
            DependencyKind::ManifestEntry(ecosystem) => {
                self.resolve_manifest_entry(&item.data, *ecosystem).await
            }
            DependencyKind::Unsupported(kind) => {
                warn!(data_type = %kind, data = %item.data, "unsupported dependency data type");
                return (LicenseClassification::unknown(), Outcome::Unsupported);
            }
        };

        match resolution {
            Ok(classification) => (classification, Outcome::Resolved),
            Err(e) => {
                match &e {
                    Unresolved::NotFound(_) => info!(data = %item.data, reason = %e, "unresolved"),
                    _ => warn!(data = %item.data, reason = %e, "unresolved"),
                }
                (LicenseClassification::unknown(), e.outcome())
            }
        }
    }

    async fn resolve_name(&self, name: &str) -> Resolution<LicenseClassification> {
        let link = self.names.resolve_repository_link(name).await?;
        self.licenses.resolve_license(&link).await
    }

    async fn resolve_manifest_entry(
        &self,
        entry: &str,
        ecosystem: Ecosystem,
    ) -> Resolution<LicenseClassification> {
        let registry = self
            .registries
            .iter()
            .find(|r| r.ecosystem() == ecosystem)
            .ok_or_else(|| Unresolved::not_found(format!("{} registry", ecosystem)))?;

        let package = self.names.resolve_package_name(entry, ecosystem).await?;
        registry
            .fetch_license(&package)
            .await
            .or_not_found(format!("{} package {:?}", ecosystem.registry_name(), package))
    }

    async fn display_name(&self, raw: &str) -> String {
        match self.oracle.ask(&prompts::display_name(raw)).await {
            Some(name) => name,
            None => truncated_name(raw),
        }
    }
}

fn truncated_name(raw: &str) -> String {
    raw.chars().take(FALLBACK_NAME_CHARS).collect()
}
