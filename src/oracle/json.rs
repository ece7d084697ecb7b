use regex::Regex;
use serde_json::Value;
use tracing::debug;

/// Parse free-form model output into JSON.
///
/// Tries the whole text first, then the first `{...}` or `[...]` span (greedy
/// to the last closing delimiter). Returns `None` if neither parses.
pub fn extract_structured(text: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return Some(value);
    }

    let re = Regex::new(r"(?s)\{.*\}|\[.*\]").ok()?;
    let Some(span) = re.find(text) else {
        debug!("no JSON-like span in model output");
        return None;
    };

    match serde_json::from_str::<Value>(span.as_str()) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(error = %e, "found JSON-like span but failed to parse it");
            None
        }
    }
}

/// Pull the `data` string out of an extracted answer, trimmed.
pub fn data_field(value: &Value) -> Option<String> {
    value
        .get("data")
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
}
