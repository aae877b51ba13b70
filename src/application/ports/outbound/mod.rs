//! Outbound ports - Interfaces that the application requires from external systems

mod chat_port;

pub use chat_port::{ChatError, ChatMessage, ChatPort, MessageRole};
