use serde::{Deserialize, Serialize};

/// Classification used whenever a dependency's license cannot be determined.
pub const UNKNOWN_LICENSE: &str = "Unknown license - potentially private/internal";

/// Label used when a license file was found but could not be classified.
pub const UNCLASSIFIED_LICENSE: &str = "Unknown license";

/// Package ecosystems whose manifest entries can be resolved against a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ecosystem {
    Rust,
    Python,
    Node,
}

impl Ecosystem {
    /// Human name of the ecosystem's public registry, used in search prompts.
    pub fn registry_name(&self) -> &'static str {
        match self {
            Ecosystem::Rust => "crates.io",
            Ecosystem::Python => "PyPI",
            Ecosystem::Node => "npm",
        }
    }
}

impl std::fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ecosystem::Rust => write!(f, "Rust"),
            Ecosystem::Python => write!(f, "Python"),
            Ecosystem::Node => write!(f, "Node"),
        }
    }
}

/// The declared shape of a raw dependency identifier.
///
/// Deserialized from the wire `dataType` string. Unrecognized values are kept
/// as [`DependencyKind::Unsupported`] so a single bad item never fails a batch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum DependencyKind {
    /// Free-text package or project name.
    Name,
    /// Link to a source repository.
    RepositoryLink,
    /// One line of an ecosystem-specific requirements file.
    ManifestEntry(Ecosystem),
    Unsupported(String),
}

impl From<String> for DependencyKind {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "name" => DependencyKind::Name,
            "link" => DependencyKind::RepositoryLink,
            "python" | "pypi" => DependencyKind::ManifestEntry(Ecosystem::Python),
            "npm" | "node" => DependencyKind::ManifestEntry(Ecosystem::Node),
            "cargo" | "rust" => DependencyKind::ManifestEntry(Ecosystem::Rust),
            _ => DependencyKind::Unsupported(raw),
        }
    }
}

impl From<DependencyKind> for String {
    fn from(kind: DependencyKind) -> Self {
        kind.to_string()
    }
}

impl std::fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DependencyKind::Name => write!(f, "name"),
            DependencyKind::RepositoryLink => write!(f, "link"),
            DependencyKind::ManifestEntry(Ecosystem::Python) => write!(f, "python"),
            DependencyKind::ManifestEntry(Ecosystem::Node) => write!(f, "npm"),
            DependencyKind::ManifestEntry(Ecosystem::Rust) => write!(f, "cargo"),
            DependencyKind::Unsupported(raw) => write!(f, "{}", raw),
        }
    }
}

/// One item of a processing batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyInput {
    pub data_type: DependencyKind,
    pub data: String,
}

impl DependencyInput {
    pub fn new(data_type: DependencyKind, data: impl Into<String>) -> Self {
        Self {
            data_type,
            data: data.into(),
        }
    }
}

/// Request body accepted by the batch processor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessRequest {
    pub dependencies: Vec<DependencyInput>,
}

/// Response envelope written by the batch processor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResponse {
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_datas: Option<Vec<LicenseReport>>,
}

impl ProcessResponse {
    pub fn success(reports: Vec<LicenseReport>) -> Self {
        Self {
            status: "success".to_string(),
            message: String::new(),
            license_datas: Some(reports),
        }
    }
}

/// A single search hit, in engine rank order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeEntryKind {
    Blob,
    Tree,
    /// Submodules and anything else the host reports.
    #[serde(other)]
    Other,
}

/// One path of a repository's recursive file listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: TreeEntryKind,
}

/// License type label plus the raw license text it was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseClassification {
    #[serde(rename = "type")]
    pub license_type: String,
    pub text: String,
}

impl LicenseClassification {
    pub fn new(license_type: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            license_type: license_type.into(),
            text: text.into(),
        }
    }

    /// The sentinel returned whenever resolution gives up.
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_LICENSE, "")
    }
}

/// How an item's classification was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Outcome {
    Resolved,
    /// The dependency, its repository or its license file does not exist.
    NotFound,
    /// An external lookup or the oracle failed.
    #[default]
    Failed,
    Unsupported,
    TimedOut,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Resolved => write!(f, "resolved"),
            Outcome::NotFound => write!(f, "not found"),
            Outcome::Failed => write!(f, "lookup failed"),
            Outcome::Unsupported => write!(f, "unsupported"),
            Outcome::TimedOut => write!(f, "timed out"),
        }
    }
}

/// Coarse risk family of a resolved license, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LicenseRisk {
    Permissive,
    WeakCopyleft,
    StrongCopyleft,
    Proprietary,
    Unknown,
}

impl std::fmt::Display for LicenseRisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LicenseRisk::Permissive => write!(f, "Permissive"),
            LicenseRisk::WeakCopyleft => write!(f, "Weak Copyleft"),
            LicenseRisk::StrongCopyleft => write!(f, "Strong Copyleft"),
            LicenseRisk::Proprietary => write!(f, "Proprietary"),
            LicenseRisk::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Per-item output of the pipeline: `{depName, type, text}` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseReport {
    pub dep_name: String,
    #[serde(rename = "type")]
    pub license_type: String,
    pub text: String,
    #[serde(skip)]
    pub input: String,
    #[serde(skip)]
    pub outcome: Outcome,
}

impl LicenseReport {
    pub fn new(
        dep_name: String,
        input: String,
        classification: LicenseClassification,
        outcome: Outcome,
    ) -> Self {
        Self {
            dep_name,
            license_type: classification.license_type,
            text: classification.text,
            input,
            outcome,
        }
    }
}
