//! Generation tunables passed into the campaign generator

/// How much content each batch stage asks the model for.
#[derive(Debug, Clone, Copy)]
pub struct GeneratorConfig {
    /// Number of locations requested by the locations stage
    pub location_count: usize,
    /// Number of heroes requested by the characters stage
    pub character_count: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            location_count: 5,
            character_count: 10,
        }
    }
}
