//! Ollama-based providers for embeddings and LLM
//!
//! Wraps a shared [`OllamaClient`] behind the provider traits.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::LlmConfig;
use crate::error::Result;
use crate::generation::{OllamaClient, PromptKind};

use super::embedding::EmbeddingProvider;
use super::llm::LlmProvider;

/// Ollama embedding provider using nomic-embed-text or similar models
pub struct OllamaEmbedder {
    client: Arc<OllamaClient>,
    dimensions: usize,
}

impl OllamaEmbedder {
    /// Create from an existing client
    pub fn from_client(client: Arc<OllamaClient>, dimensions: usize) -> Self {
        Self { client, dimensions }
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.client.embed(text).await
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        // Ollama has no native batch endpoint; call sequentially
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.client.embed(text).await?);
        }
        Ok(embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn health_check(&self) -> Result<bool> {
        self.client.health_check().await
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

/// Ollama LLM provider for answer generation and summarization
pub struct OllamaLlm {
    client: Arc<OllamaClient>,
    model: String,
}

impl OllamaLlm {
    /// Create from an existing client
    pub fn from_client(client: Arc<OllamaClient>, model: String) -> Self {
        Self { client, model }
    }
}

#[async_trait]
impl LlmProvider for OllamaLlm {
    async fn generate_answer(
        &self,
        kind: PromptKind,
        context: &str,
        question: &str,
    ) -> Result<String> {
        self.client.generate_answer(kind, context, question).await
    }

    async fn summarize(&self, text: &str) -> Result<String> {
        self.client.summarize(text).await
    }

    async fn health_check(&self) -> Result<bool> {
        self.client.health_check().await
    }

    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Combined Ollama provider that shares a single client for both sides
pub struct OllamaProvider {
    embedder: OllamaEmbedder,
    llm: OllamaLlm,
}

impl OllamaProvider {
    /// Create a combined provider from the LLM config
    pub fn new(config: &LlmConfig) -> Self {
        let client = Arc::new(OllamaClient::new(config));
        Self {
            embedder: OllamaEmbedder::from_client(Arc::clone(&client), config.embed_dimensions),
            llm: OllamaLlm::from_client(client, config.generate_model.clone()),
        }
    }

    /// Split into separate providers
    pub fn split(self) -> (OllamaEmbedder, OllamaLlm) {
        (self.embedder, self.llm)
    }
}
