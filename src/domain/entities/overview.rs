//! Overview entity - The campaign's framing paragraph

use serde::{Deserialize, Serialize};

use super::SchemaViolation;

/// The root of a campaign: the region's name and the catastrophe-and-hope
/// hook that sets the stage. Created once, never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Overview {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Overview {
    /// Fields re-embedded as prompt context for every later stage
    pub const CONTEXT_KEYS: &'static [&'static str] = &["name", "description"];

    pub fn from_response(value: serde_json::Value) -> Result<Self, SchemaViolation> {
        super::hydrate("overview", value)
    }
}
