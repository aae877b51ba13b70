//! Value objects - Immutable objects defined by their attributes

mod attribute;
mod difficulty;
mod generation;

pub use attribute::Attribute;
pub use difficulty::Difficulty;
pub use generation::GeneratorConfig;
