//! Chat port - Interface to the LLM chat endpoint

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Role of a conversational turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// One role-tagged turn in the conversation sent to the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Errors surfaced by a chat transport
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("chat request failed: {0}")]
    RequestFailed(String),
    #[error("invalid chat response: {0}")]
    InvalidResponse(String),
}

/// Outbound port for the chat endpoint.
///
/// The pipeline issues exactly one call per stage and blocks on the reply;
/// retry, timeout and auth policy all live behind this trait.
#[async_trait]
pub trait ChatPort: Send + Sync {
    /// Send an ordered message sequence and return the model's textual reply.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ChatError>;
}
