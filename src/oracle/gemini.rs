use anyhow::{bail, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use super::TextGenerator;
use crate::config::OracleConfig;

/// [`TextGenerator`] backed by the Gemini `generateContent` endpoint.
pub struct GeminiGenerator {
    client: Client,
    config: OracleConfig,
}

impl GeminiGenerator {
    pub fn new(client: Client, config: OracleConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self) -> String {
        let model = self
            .config
            .model
            .strip_prefix("models/")
            .unwrap_or(&self.config.model);
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        if self.config.api_key.is_empty() {
            bail!("no Gemini API key configured");
        }

        let payload = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }]
        });

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Gemini returned HTTP {}: {}", status.as_u16(), body.trim());
        }

        let data: serde_json::Value = response.json().await?;
        let text = data
            .get("candidates")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("content"))
            .and_then(|c| c.get("parts"))
            .and_then(|p| p.get(0))
            .and_then(|p| p.get("text"))
            .and_then(|t| t.as_str())
            .unwrap_or_default()
            .to_string();

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn generator(base_url: String, api_key: &str) -> GeminiGenerator {
        let config = OracleConfig {
            api_key: api_key.to_string(),
            model: "models/gemini-2.5-pro".to_string(),
            base_url,
            max_attempts: 2,
        };
        GeminiGenerator::new(Client::new(), config)
    }

    #[tokio::test]
    async fn test_generate_extracts_first_part() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-2.5-pro:generateContent")
            .match_header("x-goog-api-key", "k")
            .match_body(Matcher::Regex(r#""text":"hello""#.to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"{\"data\":\"MIT\"}"}]}}]}"#)
            .create_async()
            .await;

        let text = generator(server.url(), "k").generate("hello").await.unwrap();
        assert_eq!(text, r#"{"data":"MIT"}"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_no_candidates_is_empty_text() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1beta/models/gemini-2.5-pro:generateContent")
            .with_status(200)
            .with_body(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#)
            .create_async()
            .await;

        let text = generator(server.url(), "k").generate("hello").await.unwrap();
        assert_eq!(text, "");
    }

    #[tokio::test]
    async fn test_http_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1beta/models/gemini-2.5-pro:generateContent")
            .with_status(429)
            .with_body("quota")
            .create_async()
            .await;

        let err = generator(server.url(), "k").generate("hello").await.unwrap_err();
        assert!(err.to_string().contains("429"));
    }

    #[tokio::test]
    async fn test_missing_key() {
        let err = generator("http://127.0.0.1:9".to_string(), "")
            .generate("hello")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("API key"));
    }
}
