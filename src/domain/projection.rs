//! Projection - Restricting an entity to a named subset of its fields
//!
//! Prior-stage results are re-embedded into later prompts as assistant
//! context. Before that happens they are projected down to the fields the
//! model has actually produced, so it is never asked to reason about fields
//! it has not yet filled in (an unpopulated `encounters` list, say).

use serde::Serialize;
use serde_json::Value;

/// Serialize an entity and keep only the requested keys.
///
/// Empty and absent values are dropped even when their key is requested,
/// keeping the context encoding compact.
pub fn project<T: Serialize>(entity: &T, keys: &[&str]) -> Result<Value, serde_json::Error> {
    let value = serde_json::to_value(entity)?;
    Ok(filter_value(value, keys))
}

/// Project a batch of entities with a shared key subset.
pub fn project_all<T: Serialize>(
    entities: &[T],
    keys: &[&str],
) -> Result<Value, serde_json::Error> {
    let projected = entities
        .iter()
        .map(|entity| project(entity, keys))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::Array(projected))
}

fn filter_value(value: Value, keys: &[&str]) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(key, value)| keys.contains(&key.as_str()) && !is_empty(value))
                .collect(),
        ),
        other => other,
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Encounter, Location};

    #[test]
    fn test_projection_is_subset_of_source_value() {
        let source = serde_json::json!({
            "name": "The Drowned Chapel",
            "description": "A chapel below the waterline.",
            "encounters": [{"name": "Bell Toll", "description": "...", "difficulty": "easy"}]
        });
        let location = Location::from_response(source.clone()).unwrap();

        let projected = project(&location, Location::CONTEXT_KEYS).unwrap();
        let map = projected.as_object().unwrap();
        for (key, value) in map {
            assert!(Location::CONTEXT_KEYS.contains(&key.as_str()));
            assert_eq!(value, &source[key]);
        }
        assert!(map.get("encounters").is_none());
    }

    #[test]
    fn test_projection_drops_absent_fields() {
        let location = Location::from_response(serde_json::json!({"name": "Mire"})).unwrap();
        let projected = project(&location, Location::CONTEXT_KEYS).unwrap();
        assert_eq!(projected, serde_json::json!({"name": "Mire"}));
    }

    #[test]
    fn test_projection_is_idempotent_on_included_keys() {
        let location = Location::from_response(serde_json::json!({
            "name": "Mire",
            "description": "Black water."
        }))
        .unwrap();
        let once = project(&location, Location::CONTEXT_KEYS).unwrap();
        let again = filter_value(once.clone(), Location::CONTEXT_KEYS);
        assert_eq!(once, again);
    }

    #[test]
    fn test_encounter_projection_keeps_difficulty() {
        let encounter = Encounter::from_response(serde_json::json!({
            "name": "Bell Toll",
            "description": "The bell rings under the water. Something answers it.",
            "difficulty": "medium"
        }))
        .unwrap();
        let projected = project(&encounter, Encounter::CONTEXT_KEYS).unwrap();
        assert_eq!(projected["difficulty"], serde_json::json!("medium"));
        assert!(projected.get("actions").is_none());
    }
}
