//! Application services - Use case implementations
//!
//! The generator service drives the staged pipeline; the llm module holds
//! the pure prompt-composition and reply-extraction helpers it is built on.

pub mod generator_service;
pub mod llm;

pub use generator_service::{
    CampaignGenerator, CorrelationAnomaly, GenerationError, PreconditionViolation,
};
