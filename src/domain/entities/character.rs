//! Character entity - The heroes of the campaign

use serde::{Deserialize, Serialize};

use super::SchemaViolation;
use crate::domain::value_objects::Attribute;

/// A hero, generated in one batch and immutable afterwards.
///
/// `strength` and `weakness` are drawn from the three attributes in roughly
/// equal proportion across the batch; either may be absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    /// A single word describing the hero
    pub title: String,
    /// One sentence of appearance and skills
    pub description: String,
    /// An unresolved event or belief from the hero's past
    pub backstory: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<Attribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weakness: Option<Attribute>,
}

impl Character {
    /// Fields re-embedded as prompt context for the level-up stage
    pub const CONTEXT_KEYS: &'static [&'static str] = &[
        "name",
        "title",
        "description",
        "backstory",
        "strength",
        "weakness",
    ];

    pub fn from_response(value: serde_json::Value) -> Result<Self, SchemaViolation> {
        super::hydrate("character", value)
    }

    pub fn from_response_list(
        values: Vec<serde_json::Value>,
    ) -> Result<Vec<Self>, SchemaViolation> {
        super::hydrate_all("character", values)
    }
}
