//! Text-completion oracle used for every judgment call in the pipeline.
//!
//! - [`TextGenerator`] is the raw completion service (see [`gemini`]).
//! - [`TextOracle`] is the narrow interface resolvers depend on: a prompt in,
//!   the `data` field of a `{"data": "..."}` answer out.
//! - [`JsonOracle`] adapts the former to the latter with bounded retries.

pub mod gemini;
pub mod json;
pub mod prompts;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

use json::{data_field, extract_structured};

/// Default number of generation attempts per question.
pub const DEFAULT_MAX_ATTEMPTS: usize = 2;

/// A free-text completion service.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Structured-answer oracle.
#[async_trait]
pub trait TextOracle: Send + Sync {
    /// Ask for a non-empty answer. `None` means no usable answer was produced.
    async fn ask(&self, prompt: &str) -> Option<String>;

    /// Ask where an empty answer is meaningful (e.g. "there is no such file").
    ///
    /// `Some("")` is an explicit empty reply, `None` still means no usable
    /// answer was produced.
    async fn ask_allowing_empty(&self, prompt: &str) -> Option<String> {
        self.ask(prompt).await
    }
}

/// [`TextOracle`] over a [`TextGenerator`], retrying up to `max_attempts` times.
pub struct JsonOracle {
    generator: Arc<dyn TextGenerator>,
    max_attempts: usize,
}

impl JsonOracle {
    pub fn new(generator: Arc<dyn TextGenerator>, max_attempts: usize) -> Self {
        Self {
            generator,
            max_attempts: max_attempts.max(1),
        }
    }

    async fn consult(&self, prompt: &str, accept_empty: bool) -> Option<String> {
        for attempt in 1..=self.max_attempts {
            let response = match self.generator.generate(prompt).await {
                Ok(text) => text,
                Err(e) => {
                    warn!(attempt, error = %e, "text generation failed");
                    String::new()
                }
            };

            let answer = extract_structured(&response).and_then(|v| data_field(&v));
            match answer {
                Some(data) if accept_empty || !data.is_empty() => {
                    debug!(attempt, prompt = %preview(prompt), answer = %data, "oracle answered");
                    return Some(data);
                }
                _ => debug!(attempt, response = %preview(&response), "unusable oracle answer"),
            }
        }

        warn!(
            attempts = self.max_attempts,
            prompt = %preview(prompt),
            "oracle gave no usable answer"
        );
        None
    }
}

#[async_trait]
impl TextOracle for JsonOracle {
    async fn ask(&self, prompt: &str) -> Option<String> {
        self.consult(prompt, false).await
    }

    async fn ask_allowing_empty(&self, prompt: &str) -> Option<String> {
        self.consult(prompt, true).await
    }
}

/// First line of a prompt or response, shortened for log output.
fn preview(text: &str) -> String {
    let line = text.trim().lines().next().unwrap_or("");
    let mut short: String = line.chars().take(60).collect();
    if line.chars().count() > 60 {
        short.push('…');
    }
    short
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Replays canned responses and counts calls.
    struct Scripted {
        responses: Mutex<Vec<Result<String>>>,
        calls: Mutex<usize>,
    }

    impl Scripted {
        fn new(responses: Vec<Result<String>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses),
                calls: Mutex::new(0),
            })
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl TextGenerator for Scripted {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            *self.calls.lock().unwrap() += 1;
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                Ok("I am not sure.".to_string())
            } else {
                responses.remove(0)
            }
        }
    }

    #[tokio::test]
    async fn test_retry_bound_on_garbage() {
        let gen = Scripted::new(vec![]);
        let oracle = JsonOracle::new(gen.clone(), 3);

        assert_eq!(oracle.ask("q").await, None);
        assert_eq!(gen.calls(), 3);
    }

    #[tokio::test]
    async fn test_default_attempts() {
        let gen = Scripted::new(vec![]);
        let oracle = JsonOracle::new(gen.clone(), DEFAULT_MAX_ATTEMPTS);

        assert_eq!(oracle.ask("q").await, None);
        assert_eq!(gen.calls(), 2);
    }

    #[tokio::test]
    async fn test_first_valid_answer_wins() {
        let gen = Scripted::new(vec![
            Ok("nope".to_string()),
            Ok("Here you go: {\"data\": \"  serde-rs serde github \"}".to_string()),
            Ok("{\"data\": \"never reached\"}".to_string()),
        ]);
        let oracle = JsonOracle::new(gen.clone(), 3);

        assert_eq!(
            oracle.ask("q").await,
            Some("serde-rs serde github".to_string())
        );
        assert_eq!(gen.calls(), 2);
    }

    #[tokio::test]
    async fn test_service_error_consumes_attempt() {
        let gen = Scripted::new(vec![
            Err(anyhow::anyhow!("quota exceeded")),
            Ok("{\"data\": \"MIT\"}".to_string()),
        ]);
        let oracle = JsonOracle::new(gen.clone(), 2);

        assert_eq!(oracle.ask("q").await, Some("MIT".to_string()));
        assert_eq!(gen.calls(), 2);
    }

    #[tokio::test]
    async fn test_empty_data_is_not_an_answer() {
        let gen = Scripted::new(vec![
            Ok("{\"data\": \"\"}".to_string()),
            Ok("{\"data\": 7}".to_string()),
        ]);
        let oracle = JsonOracle::new(gen.clone(), 2);

        assert_eq!(oracle.ask("q").await, None);
        assert_eq!(gen.calls(), 2);
    }

    #[tokio::test]
    async fn test_empty_data_allowed_when_meaningful() {
        let gen = Scripted::new(vec![Ok("{\"data\": \"\"}".to_string())]);
        let oracle = JsonOracle::new(gen.clone(), 2);

        assert_eq!(oracle.ask_allowing_empty("q").await, Some(String::new()));
        assert_eq!(gen.calls(), 1);
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("short\nsecond line"), "short");
        assert_eq!(preview(&"x".repeat(100)).chars().count(), 61);
    }
}
