//! Level-up event entity - Backstory-driven character development

use serde::{Deserialize, Serialize};

use super::SchemaViolation;
use crate::domain::value_objects::Attribute;

/// An event that confronts a hero with their unresolved backstory and
/// presents an important choice.
///
/// Level-up events are returned to the caller rather than merged into the
/// campaign graph; how (and whether) a choice resolves is the caller's
/// business.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelUpEvent {
    /// A two word name for the event
    pub name: String,
    /// Three sentences, second person, describing how the event arises
    pub description: String,
    /// The choices the hero can make in response
    pub choices: Vec<LevelUpChoice>,
}

impl LevelUpEvent {
    pub fn from_response(value: serde_json::Value) -> Result<Self, SchemaViolation> {
        super::hydrate("level-up event", value)
    }
}

/// One way a hero can respond to a level-up event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelUpChoice {
    /// One imperative sentence describing the choice, not its resolution
    pub description: String,
    /// The attribute the choice channels
    pub attribute: Attribute,
    /// Two sentences on how the choice plays out and reshapes the backstory
    pub outcome: String,
}
