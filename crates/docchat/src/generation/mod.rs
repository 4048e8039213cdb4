//! Answer generation and summarization via Ollama

pub mod ollama;
pub mod prompt;

pub use ollama::OllamaClient;
pub use prompt::{summary_prompt, PromptKind};
