//! Web search backends returning ranked `{title, url}` lists.
//!
//! - [`google`]: general search, results passed through unfiltered.
//! - [`brave`]: secondary web search, filtered to repository-root shaped URLs.

pub mod brave;
pub mod google;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::SearchResponse;

#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<SearchResponse>;
}

/// `true` when the URL has exactly four `/` once a trailing slash is trimmed,
/// i.e. `scheme://host/owner/repo`.
pub fn is_repository_root(url: &str) -> bool {
    let normalized = url.strip_suffix('/').unwrap_or(url);
    normalized.matches('/').count() == 4
}
