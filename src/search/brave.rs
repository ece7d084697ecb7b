use anyhow::{bail, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::warn;

use super::{is_repository_root, WebSearch};
use crate::config::BraveSearchConfig;
use crate::models::{SearchResponse, SearchResult};

/// Secondary web search backend. Keeps only repository-root shaped URLs.
pub struct BraveSearch {
    client: Client,
    config: BraveSearchConfig,
}

impl BraveSearch {
    pub fn new(client: Client, config: BraveSearchConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl WebSearch for BraveSearch {
    async fn search(&self, query: &str) -> Result<SearchResponse> {
        if self.config.api_key.is_empty() {
            bail!("Brave search is not configured");
        }

        let url = format!(
            "{}/res/v1/web/search",
            self.config.base_url.trim_end_matches('/')
        );
        let count = self.config.count.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("count", count.as_str())])
            .header("Accept", "application/json")
            .header("X-Subscription-Token", &self.config.api_key)
            .send()
            .await?;

        // Error bodies are still parsed; callers get whatever results exist.
        if !response.status().is_success() {
            warn!(status = response.status().as_u16(), query, "Brave search returned an error");
        }

        let data: serde_json::Value = response.json().await?;
        let results = data
            .get("web")
            .and_then(|w| w.get("results"))
            .and_then(|r| r.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| {
                        let url = item.get("url").and_then(|u| u.as_str())?;
                        if !is_repository_root(url) {
                            return None;
                        }
                        let title = item.get("title").and_then(|t| t.as_str()).unwrap_or("");
                        Some(SearchResult {
                            title: title.to_string(),
                            url: url.to_string(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        let echoed = data
            .get("query")
            .and_then(|q| q.get("original"))
            .and_then(|q| q.as_str())
            .unwrap_or(query);

        Ok(SearchResponse {
            query: echoed.to_string(),
            results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn backend(base_url: String) -> BraveSearch {
        BraveSearch::new(
            Client::new(),
            BraveSearchConfig {
                api_key: "token".to_string(),
                base_url,
                count: 20,
            },
        )
    }

    #[tokio::test]
    async fn test_filters_to_repository_roots() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/res/v1/web/search")
            .match_header("x-subscription-token", "token")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "tokio github".into()),
                Matcher::UrlEncoded("count".into(), "20".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"query":{"original":"tokio github"},"web":{"results":[
                    {"title":"tokio-rs","url":"https://github.com/tokio-rs"},
                    {"title":"tokio-rs/tokio","url":"https://github.com/tokio-rs/tokio"},
                    {"title":"LICENSE","url":"https://github.com/tokio-rs/tokio/blob/master/LICENSE"},
                    {"title":"tokio.rs","url":"https://tokio.rs/"},
                    {"title":"mio","url":"https://github.com/tokio-rs/mio/"}
                ]}}"#,
            )
            .create_async()
            .await;

        let response = backend(server.url()).search("tokio github").await.unwrap();
        mock.assert_async().await;

        let urls: Vec<_> = response.results.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(
            urls,
            vec!["https://github.com/tokio-rs/tokio", "https://github.com/tokio-rs/mio/"]
        );
        assert_eq!(response.query, "tokio github");
    }

    #[tokio::test]
    async fn test_error_status_still_parses() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/res/v1/web/search")
            .match_query(Matcher::Any)
            .with_status(429)
            .with_body(r#"{"type":"ErrorResponse","error":{"code":"RATE_LIMITED"}}"#)
            .create_async()
            .await;

        let response = backend(server.url()).search("serde").await.unwrap();
        assert!(response.results.is_empty());
        assert_eq!(response.query, "serde");
    }

    #[tokio::test]
    async fn test_unparsable_body_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/res/v1/web/search")
            .match_query(Matcher::Any)
            .with_status(502)
            .with_body("<html>bad gateway</html>")
            .create_async()
            .await;

        assert!(backend(server.url()).search("serde").await.is_err());
    }
}
