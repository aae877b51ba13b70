//! Domain layer - Core campaign content with no external dependencies
//!
//! This layer contains:
//! - Entities: Overview, Character, Location, Encounter, Action, Outcome
//! - Value Objects: Attribute, Difficulty, generation tunables
//! - Projection: field-filtering of entities for prompt context

pub mod entities;
pub mod projection;
pub mod value_objects;
