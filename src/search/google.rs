use anyhow::{bail, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::warn;

use super::WebSearch;
use crate::config::GoogleSearchConfig;
use crate::models::{SearchResponse, SearchResult};

/// General search backend over the Custom Search JSON API.
pub struct GoogleSearch {
    client: Client,
    config: GoogleSearchConfig,
}

impl GoogleSearch {
    pub fn new(client: Client, config: GoogleSearchConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl WebSearch for GoogleSearch {
    async fn search(&self, query: &str) -> Result<SearchResponse> {
        if self.config.api_key.is_empty() || self.config.engine_id.is_empty() {
            bail!("Google search is not configured");
        }

        let url = format!(
            "{}/customsearch/v1",
            self.config.base_url.trim_end_matches('/')
        );
        let response = self
            .client
            .get(&url)
            .query(&[
                ("key", self.config.api_key.as_str()),
                ("cx", self.config.engine_id.as_str()),
                ("q", query),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(status = response.status().as_u16(), query, "Google search returned an error");
        }

        let data: serde_json::Value = response.json().await?;
        let results = data
            .get("items")
            .and_then(|i| i.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| {
                        let url = item.get("link").and_then(|l| l.as_str())?;
                        let title = item.get("title").and_then(|t| t.as_str()).unwrap_or("");
                        Some(SearchResult {
                            title: title.to_string(),
                            url: url.to_string(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(SearchResponse {
            query: query.to_string(),
            results,
        })
    }
}
