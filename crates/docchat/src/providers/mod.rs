//! Provider abstractions for embeddings and LLM generation
//!
//! Trait seams that keep the pipeline testable without a running
//! Ollama instance.

pub mod embedding;
pub mod llm;
pub mod ollama;

pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;
pub use ollama::{OllamaEmbedder, OllamaLlm, OllamaProvider};
