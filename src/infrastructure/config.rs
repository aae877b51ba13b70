//! Application configuration

use std::env;

use anyhow::{Context, Result};

use crate::domain::value_objects::GeneratorConfig;

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Ollama API base URL (OpenAI-compatible)
    pub ollama_base_url: String,
    /// Model used for generation requests
    pub ollama_model: String,
    /// Batch sizes for the location and character stages
    pub generator: GeneratorConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = GeneratorConfig::default();

        Ok(Self {
            ollama_base_url: env::var("OLLAMA_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:11434".to_string()),
            ollama_model: env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3.2".to_string()),
            generator: GeneratorConfig {
                location_count: parse_count("LOCATION_COUNT", defaults.location_count)?,
                character_count: parse_count("CHARACTER_COUNT", defaults.character_count)?,
            },
        })
    }
}

fn parse_count(var: &str, default: usize) -> Result<usize> {
    match env::var(var) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("{var} must be a positive number")),
        Err(_) => Ok(default),
    }
}
