//! Infrastructure layer - Adapters to the outside world

pub mod config;
pub mod ollama;
