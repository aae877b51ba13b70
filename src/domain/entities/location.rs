//! Location entity - Places the heroes visit

use serde::{Deserialize, Serialize};

use super::{Encounter, SchemaViolation};

/// An important place in the campaign world.
///
/// `encounters` is a one-shot field: the encounters stage populates it
/// exactly once, for every location in a single batched response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encounters: Option<Vec<Encounter>>,
}

impl Location {
    /// Fields re-embedded as prompt context for later stages. Encounters are
    /// deliberately excluded so the model is never shown content it has not
    /// produced yet.
    pub const CONTEXT_KEYS: &'static [&'static str] = &["name", "description"];

    pub fn from_response(value: serde_json::Value) -> Result<Self, SchemaViolation> {
        super::hydrate("location", value)
    }

    pub fn from_response_list(
        values: Vec<serde_json::Value>,
    ) -> Result<Vec<Self>, SchemaViolation> {
        super::hydrate_all("location", values)
    }

    pub fn has_encounters(&self) -> bool {
        self.encounters.is_some()
    }

    /// One-shot transition from absent to populated. The caller guards the
    /// precondition; re-population indicates a caller bug.
    pub(crate) fn attach_encounters(&mut self, encounters: Vec<Encounter>) {
        debug_assert!(self.encounters.is_none(), "encounters already populated");
        self.encounters = Some(encounters);
    }
}
