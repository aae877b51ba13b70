//! Encounter, Action and Outcome entities

use serde::{Deserialize, Serialize};

use super::SchemaViolation;
use crate::domain::value_objects::{Attribute, Difficulty};

/// A problem the heroes face at a location.
///
/// `actions` is a one-shot field: it starts absent and is populated exactly
/// once by the actions stage, scoped to this single encounter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Encounter {
    pub name: String,
    /// Two sentences, second person, describing the problem (not the solution)
    pub description: String,
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<Action>>,
}

impl Encounter {
    /// Fields re-embedded as prompt context for the actions stage
    pub const CONTEXT_KEYS: &'static [&'static str] = &["name", "description", "difficulty"];

    pub fn from_response(value: serde_json::Value) -> Result<Self, SchemaViolation> {
        super::hydrate("encounter", value)
    }

    pub fn has_actions(&self) -> bool {
        self.actions.is_some()
    }

    /// One-shot transition from absent to populated. The caller guards the
    /// precondition; re-population indicates a caller bug.
    pub(crate) fn attach_actions(&mut self, actions: Vec<Action>) {
        debug_assert!(self.actions.is_none(), "actions already populated");
        self.actions = Some(actions);
    }
}

/// A candidate move the heroes can attempt against an encounter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    /// One imperative sentence describing the attempt
    pub description: String,
    pub attribute: Attribute,
    pub difficulty: Difficulty,
    pub success: Outcome,
    pub failure: Outcome,
}

impl Action {
    pub fn from_response(value: serde_json::Value) -> Result<Self, SchemaViolation> {
        super::hydrate("action", value)
    }

    pub fn from_response_list(
        values: Vec<serde_json::Value>,
    ) -> Result<Vec<Self>, SchemaViolation> {
        super::hydrate_all("action", values)
    }
}

/// How an action resolves, one way or the other.
///
/// The model usually returns outcomes as bare sentences, but may return an
/// object carrying a follow-up encounter name for branching continuations.
/// The follow-up is a weak reference by name, never an owned edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "OutcomeRepr")]
pub struct Outcome {
    pub description: String,
    /// Name of an encounter this outcome leads into, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_encounter: Option<String>,
}

/// Wire shape for an outcome: plain text or an object form.
#[derive(Deserialize)]
#[serde(untagged)]
enum OutcomeRepr {
    Text(String),
    Full {
        description: String,
        #[serde(default)]
        next_encounter: Option<String>,
    },
}

impl From<OutcomeRepr> for Outcome {
    fn from(repr: OutcomeRepr) -> Self {
        match repr {
            OutcomeRepr::Text(description) => Outcome {
                description,
                next_encounter: None,
            },
            OutcomeRepr::Full {
                description,
                next_encounter,
            } => Outcome {
                description,
                next_encounter,
            },
        }
    }
}
