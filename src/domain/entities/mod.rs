//! Domain entities - The campaign content graph
//!
//! Every entity is hydrated from an untyped structural value recovered from
//! a model reply. Hydration is a validating decode: a missing required field
//! or an out-of-enumeration value is a [`SchemaViolation`], never a silent
//! default.

mod character;
mod encounter;
mod level_up;
mod location;
mod overview;

pub use character::Character;
pub use encounter::{Action, Encounter, Outcome};
pub use level_up::{LevelUpChoice, LevelUpEvent};
pub use location::Location;
pub use overview::Overview;

use serde::de::DeserializeOwned;

/// A recovered structural value did not conform to an entity's shape.
#[derive(Debug, thiserror::Error)]
#[error("invalid {entity} in model response: {message}")]
pub struct SchemaViolation {
    /// Which entity type was being hydrated
    pub entity: &'static str,
    /// What was wrong with the value
    pub message: String,
}

/// Decode one entity from a structural value.
pub(crate) fn hydrate<T: DeserializeOwned>(
    entity: &'static str,
    value: serde_json::Value,
) -> Result<T, SchemaViolation> {
    serde_json::from_value(value).map_err(|e| SchemaViolation {
        entity,
        message: e.to_string(),
    })
}

/// Decode a whole batch of entities, preserving response order.
pub(crate) fn hydrate_all<T: DeserializeOwned>(
    entity: &'static str,
    values: Vec<serde_json::Value>,
) -> Result<Vec<T>, SchemaViolation> {
    values
        .into_iter()
        .map(|value| hydrate(entity, value))
        .collect()
}
