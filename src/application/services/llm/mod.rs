//! LLM helpers - prompt composition and reply extraction

pub mod extraction;
pub mod prompt_builder;

pub use extraction::{extract_array, extract_object, extract_value, ResponseParseError};
