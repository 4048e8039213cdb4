//! LLM provider trait for answer generation and summarization

use async_trait::async_trait;

use crate::error::Result;
use crate::generation::PromptKind;

/// Trait for LLM-backed text generation
///
/// Implementations:
/// - `OllamaLlm`: Local Ollama server (phi3, llama3, etc.)
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Answer a question from retrieved context, phrased with the given
    /// template family
    async fn generate_answer(
        &self,
        kind: PromptKind,
        context: &str,
        question: &str,
    ) -> Result<String>;

    /// Summarize an uploaded document's extracted text
    async fn summarize(&self, text: &str) -> Result<String>;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
