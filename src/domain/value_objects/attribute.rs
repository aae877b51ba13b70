//! Attribute - The three axes a hero can act along

use serde::{Deserialize, Serialize};

/// The attribute channelled by an action, or backing a character's
/// strength or weakness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Physical,
    Mental,
    Emotional,
}

impl Attribute {
    pub fn as_str(&self) -> &'static str {
        match self {
            Attribute::Physical => "physical",
            Attribute::Mental => "mental",
            Attribute::Emotional => "emotional",
        }
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
