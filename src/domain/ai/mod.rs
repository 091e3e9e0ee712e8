//! Text-generation provider access: client abstraction and retry policy.

pub mod client;
pub mod retry;

pub use client::{AiClient, AiClientTrait, CompletionRequest, OpenAiClient};
pub use retry::with_retry;
