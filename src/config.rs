use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::oracle::DEFAULT_MAX_ATTEMPTS;

/// Root configuration structure, deserialized from `.license-lookup/config.toml`.
///
/// Every section is optional; API credentials are usually supplied through the
/// environment (see [`Config::apply_env`]).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub oracle: OracleConfig,
    pub search: SearchConfig,
    pub github: GithubConfig,
    pub registry: RegistryConfig,
    pub http: HttpConfig,
}

/// Text-completion service settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    /// Generation attempts per question before giving up.
    pub max_attempts: usize,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gemini-2.5-pro".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub google: GoogleSearchConfig,
    pub brave: BraveSearchConfig,
}

/// General search backend (Google Programmable Search).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GoogleSearchConfig {
    pub api_key: String,
    pub engine_id: String,
    pub base_url: String,
}

impl Default for GoogleSearchConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            engine_id: String::new(),
            base_url: "https://www.googleapis.com".to_string(),
        }
    }
}

/// Secondary web search backend (Brave Search).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BraveSearchConfig {
    pub api_key: String,
    pub base_url: String,
    pub count: u32,
}

impl Default for BraveSearchConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.search.brave.com".to_string(),
            count: 20,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    pub api_url: String,
    pub token: Option<String>,
    /// Deepest path level shown to the oracle when locating a license file.
    pub tree_depth: usize,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            token: None,
            tree_depth: 2,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub pypi_url: String,
    pub npm_url: String,
    pub crates_io_url: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            pypi_url: "https://pypi.org".to_string(),
            npm_url: "https://registry.npmjs.org".to_string(),
            crates_io_url: "https://crates.io".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Timeout applied to every external call.
    pub timeout_secs: u64,
    /// Overall budget for resolving a single dependency.
    pub item_budget_secs: u64,
    /// Dependencies resolved at once. Output order never depends on it.
    pub concurrency: usize,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 20,
            item_budget_secs: 180,
            concurrency: 4,
            user_agent: format!(
                "license-lookup/{} (dependency license resolver)",
                env!("CARGO_PKG_VERSION")
            ),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn item_budget(&self) -> Duration {
        Duration::from_secs(self.item_budget_secs)
    }

    /// Build the HTTP client shared by every adapter.
    pub fn client(&self) -> Result<reqwest::Client> {
        Ok(reqwest::Client::builder()
            .timeout(self.timeout())
            .user_agent(&self.user_agent)
            .build()?)
    }
}

impl Config {
    /// Overlay credentials from environment variables.
    ///
    /// `lookup` is usually `|k| std::env::var(k).ok()`; empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("GEMINI_API_KEY").or_else(|| get("GOOGLE_GEMINI_API_KEY")) {
            self.oracle.api_key = v;
        }
        if let Some(v) = get("GOOGLE_SEARCH_ENGINE_API_KEY") {
            self.search.google.api_key = v;
        }
        if let Some(v) = get("GOOGLE_SEARCH_ENGINE_ID") {
            self.search.google.engine_id = v;
        }
        if let Some(v) = get("BRAVE_SEARCH_API_KEY") {
            self.search.brave.api_key = v;
        }
        if let Some(v) = get("GITHUB_TOKEN") {
            self.github.token = Some(v);
        }
    }

    /// Names of credentials that are still unset. Resolution still runs without
    /// them but the affected stages will fall back to the unknown sentinel.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.oracle.api_key.is_empty() {
            missing.push("GEMINI_API_KEY");
        }
        if self.search.google.api_key.is_empty() || self.search.google.engine_id.is_empty() {
            missing.push("GOOGLE_SEARCH_ENGINE_API_KEY / GOOGLE_SEARCH_ENGINE_ID");
        }
        if self.search.brave.api_key.is_empty() {
            missing.push("BRAVE_SEARCH_API_KEY");
        }
        missing
    }
}

/// Load configuration, searching in order:
///
/// 1. `config_override`: path passed via `--config`
/// 2. `<working_dir>/.license-lookup/config.toml`
/// 3. `~/.config/license-lookup/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(working_dir: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let local = working_dir.join(".license-lookup").join("config.toml");
    if local.exists() {
        return read_config(&local);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("license-lookup")
            .join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
}
