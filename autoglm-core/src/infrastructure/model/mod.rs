//! Remote model access

mod client;
mod types;

pub use client::{ModelClient, OpenAiClient};
pub use types::{ChatMessage, ContentPart, ImageUrl, MessageContent, MessageRole, ModelError};
