//! Application state for the document Q&A server

use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::Result;
use crate::index::SharedIndex;
use crate::ingestion::TextChunker;
use crate::providers::{EmbeddingProvider, LlmProvider, OllamaProvider};
use crate::retrieval::Retriever;
use crate::storage::ConversationStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// Session-wide vector index, grows with each upload
    index: SharedIndex,
    /// Embedding provider
    embedding_provider: Arc<dyn EmbeddingProvider>,
    /// LLM provider for answers and summaries
    llm_provider: Arc<dyn LlmProvider>,
    /// Query-time retrieval over the shared index
    retriever: Retriever,
    /// Text chunker
    chunker: TextChunker,
    /// Conversation history
    conversations: ConversationStore,
}

impl AppState {
    /// Create application state backed by Ollama providers
    pub fn new(config: RagConfig) -> Result<Self> {
        tracing::info!(
            embed_model = %config.llm.embed_model,
            generate_model = %config.llm.generate_model,
            "Initializing application state"
        );

        let (embedder, llm) = OllamaProvider::new(&config.llm).split();
        let conversations = ConversationStore::new(&config.storage.database_path)?;

        Self::from_parts(config, Arc::new(embedder), Arc::new(llm), conversations)
    }

    /// Assemble state from explicit providers and store. Used by `new`
    /// and by tests that swap in local providers.
    pub fn from_parts(
        config: RagConfig,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        llm_provider: Arc<dyn LlmProvider>,
        conversations: ConversationStore,
    ) -> Result<Self> {
        std::fs::create_dir_all(&config.storage.upload_dir)?;

        let index = SharedIndex::new();
        let retriever = Retriever::new(
            index.clone(),
            Arc::clone(&embedding_provider),
            config.retrieval.clone(),
        );
        let chunker = TextChunker::new(config.chunking.chunk_size, config.chunking.chunk_overlap);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                index,
                embedding_provider,
                llm_provider,
                retriever,
                chunker,
                conversations,
            }),
        })
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Get the shared vector index
    pub fn index(&self) -> &SharedIndex {
        &self.inner.index
    }

    /// Get the embedding provider
    pub fn embedder(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.inner.embedding_provider
    }

    /// Get the LLM provider
    pub fn llm(&self) -> &Arc<dyn LlmProvider> {
        &self.inner.llm_provider
    }

    /// Get the retriever
    pub fn retriever(&self) -> &Retriever {
        &self.inner.retriever
    }

    /// Get the text chunker
    pub fn chunker(&self) -> &TextChunker {
        &self.inner.chunker
    }

    /// Get the conversation store
    pub fn conversations(&self) -> &ConversationStore {
        &self.inner.conversations
    }
}
