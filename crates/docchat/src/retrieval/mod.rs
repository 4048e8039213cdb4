//! Query-time retrieval over the shared index

pub mod router;

use std::sync::Arc;

use crate::config::RetrievalConfig;
use crate::error::{Error, Result};
use crate::generation::PromptKind;
use crate::index::{SearchHit, SharedIndex};
use crate::providers::EmbeddingProvider;

/// Everything the synthesizer needs for one question: the ranked
/// chunks, their concatenated text, and the template family to phrase
/// the answer with.
#[derive(Debug)]
pub struct Retrieval {
    pub hits: Vec<SearchHit>,
    pub context: String,
    pub prompt_kind: PromptKind,
}

/// Orchestrates embed, search, and route for a single question.
pub struct Retriever {
    index: SharedIndex,
    embedder: Arc<dyn EmbeddingProvider>,
    config: RetrievalConfig,
}

impl Retriever {
    pub fn new(
        index: SharedIndex,
        embedder: Arc<dyn EmbeddingProvider>,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            index,
            embedder,
            config,
        }
    }

    /// Retrieve context for a question.
    ///
    /// Validation order is fixed: a blank question is rejected before
    /// the index is consulted, so callers see `QuestionRequired` even
    /// when no document has been uploaded yet.
    pub async fn retrieve(&self, question: &str) -> Result<Retrieval> {
        if question.trim().is_empty() {
            return Err(Error::QuestionRequired);
        }
        if !self.index.is_ready() {
            return Err(Error::IndexNotReady);
        }

        let query_embedding = self.embedder.embed(question).await?;
        let hits = self
            .index
            .search(&query_embedding, self.config.top_k, self.config.fetch_pool)?;

        tracing::debug!(
            hits = hits.len(),
            top_score = hits.first().map(|h| h.score),
            "Retrieved context"
        );

        let context = hits
            .iter()
            .map(|h| h.chunk.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        let prompt_kind = router::route(self.config.route_by, &self.index, &hits);

        Ok(Retrieval {
            hits,
            context,
            prompt_kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::VectorIndex;
    use crate::types::Chunk;
    use async_trait::async_trait;

    /// Embeds each text as a unit vector keyed by its first byte, so
    /// similarity is 1.0 between texts starting with the same letter.
    struct ByteEmbedder;

    #[async_trait]
    impl EmbeddingProvider for ByteEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let mut v = vec![0.0f32; 4];
            let byte = text.bytes().next().unwrap_or(0) as usize;
            v[byte % 4] = 1.0;
            Ok(v)
        }

        fn dimensions(&self) -> usize {
            4
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "byte"
        }
    }

    async fn embedded_index(texts: &[(&str, &str)]) -> SharedIndex {
        let embedder = ByteEmbedder;
        let mut chunks = Vec::new();
        let mut embeddings = Vec::new();
        for (i, (text, source)) in texts.iter().enumerate() {
            chunks.push(Chunk::new(text.to_string(), source.to_string(), i as u32));
            embeddings.push(embedder.embed(text).await.unwrap());
        }
        let index = SharedIndex::new();
        index.merge(VectorIndex::from_embedded(chunks, embeddings).unwrap());
        index
    }

    fn retriever(index: SharedIndex) -> Retriever {
        Retriever::new(index, Arc::new(ByteEmbedder), RetrievalConfig::default())
    }

    #[tokio::test]
    async fn blank_question_rejected_before_index_check() {
        let r = retriever(SharedIndex::new());
        assert!(matches!(r.retrieve("   ").await, Err(Error::QuestionRequired)));
    }

    #[tokio::test]
    async fn question_before_upload_is_index_not_ready() {
        let r = retriever(SharedIndex::new());
        assert!(matches!(
            r.retrieve("what is this about?").await,
            Err(Error::IndexNotReady)
        ));
    }

    #[tokio::test]
    async fn retrieves_matching_chunks_with_context() {
        let index = embedded_index(&[
            ("alpha facts", "notes.txt"),
            ("delta facts", "notes.txt"),
        ])
        .await;
        let r = retriever(index);

        let retrieval = r.retrieve("alpha question").await.unwrap();
        assert_eq!(retrieval.hits[0].chunk.text, "alpha facts");
        assert!(retrieval.context.contains("alpha facts"));
        assert_eq!(retrieval.prompt_kind, PromptKind::Document);
    }

    #[tokio::test]
    async fn routes_by_first_uploaded_source() {
        let index = embedded_index(&[("a,b,c", "table.csv"), ("prose", "notes.txt")]).await;
        let r = retriever(index);

        let retrieval = r.retrieve("prose question").await.unwrap();
        assert_eq!(retrieval.prompt_kind, PromptKind::Csv);
    }
}
