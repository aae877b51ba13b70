//! Response extraction - Recovering structural values from model replies
//!
//! Models wrap JSON in markdown code fences, tag the fence with a format
//! hint, or both. Extraction strips that dressing and parses what is left;
//! it never attempts partial recovery. A reply that does not parse is fatal
//! to the stage, and the offending text travels with the error verbatim so
//! the failure can be diagnosed.

use serde_json::{Map, Value};

/// A model reply could not be recovered as a structural value.
#[derive(Debug, thiserror::Error)]
pub enum ResponseParseError {
    #[error("model reply is not valid JSON ({message}):\n{raw}")]
    Json { message: String, raw: String },
    #[error("model reply parsed but is not {expected}:\n{raw}")]
    WrongShape { expected: &'static str, raw: String },
}

impl ResponseParseError {
    /// The raw reply text, verbatim
    pub fn raw(&self) -> &str {
        match self {
            ResponseParseError::Json { raw, .. } => raw,
            ResponseParseError::WrongShape { raw, .. } => raw,
        }
    }
}

/// Recover a structural value of any shape from a raw reply.
pub fn extract_value(reply: &str) -> Result<Value, ResponseParseError> {
    let payload = strip_code_fence(reply);
    serde_json::from_str(payload).map_err(|e| {
        tracing::error!("Failed to parse structured reply: {}", e);
        ResponseParseError::Json {
            message: e.to_string(),
            raw: reply.to_string(),
        }
    })
}

/// Recover a single object from a raw reply.
pub fn extract_object(reply: &str) -> Result<Map<String, Value>, ResponseParseError> {
    match extract_value(reply)? {
        Value::Object(map) => Ok(map),
        _ => Err(ResponseParseError::WrongShape {
            expected: "an object",
            raw: reply.to_string(),
        }),
    }
}

/// Recover a list of values from a raw reply.
pub fn extract_array(reply: &str) -> Result<Vec<Value>, ResponseParseError> {
    match extract_value(reply)? {
        Value::Array(items) => Ok(items),
        _ => Err(ResponseParseError::WrongShape {
            expected: "a list",
            raw: reply.to_string(),
        }),
    }
}

/// Strip a leading code-fence marker (optionally tagged with a format hint)
/// and a trailing fence marker, leaving the inner payload.
fn strip_code_fence(reply: &str) -> &str {
    let mut payload = reply.trim();
    if let Some(rest) = payload.strip_prefix("```") {
        // Drop the format hint, if any ("json", "yaml", ...)
        payload = match rest.find('\n') {
            Some(newline) => &rest[newline + 1..],
            None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
        };
    }
    if let Some(rest) = payload.strip_suffix("```") {
        payload = rest;
    }
    payload.trim()
}
