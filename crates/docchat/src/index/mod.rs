//! In-memory vector index with merge semantics
//!
//! A flat index scanned with cosine similarity. At the scale of a chat
//! session's uploads an exhaustive scan beats approximate structures and
//! keeps ranking exactly reproducible: entries are stored in insertion
//! order, scoring ties resolve to the earlier entry, and merging appends
//! the newer index's entries after the existing ones.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::types::{Chunk, IndexedVector};

/// A retrieval hit: the chunk plus its similarity to the query.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub chunk: Chunk,
    pub score: f32,
}

/// Flat vector index over embedded chunks.
///
/// Entries are append-only and keep their insertion order for the
/// lifetime of the index; both tie-breaking and `first_source` depend
/// on that order.
#[derive(Debug, Default)]
pub struct VectorIndex {
    entries: Vec<IndexedVector>,
}

impl VectorIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from parallel chunk and embedding sequences.
    pub fn from_embedded(chunks: Vec<Chunk>, embeddings: Vec<Vec<f32>>) -> Result<Self> {
        if chunks.len() != embeddings.len() {
            return Err(Error::internal(format!(
                "chunk/embedding count mismatch: {} vs {}",
                chunks.len(),
                embeddings.len()
            )));
        }
        let entries = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| IndexedVector { chunk, embedding })
            .collect();
        Ok(Self { entries })
    }

    /// Number of indexed vectors
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no vectors
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Source identifier of the earliest entry still in the index.
    pub fn first_source(&self) -> Option<&str> {
        self.entries.first().map(|e| e.chunk.source.as_str())
    }

    /// Absorb `other`, appending its entries after the existing ones.
    /// The merged-in index is consumed; entry count is the sum of both.
    pub fn merge_from(&mut self, other: VectorIndex) {
        self.entries.extend(other.entries);
    }

    /// Rank all entries against `query` and return the best `k`, drawn
    /// from a candidate pool of the best `fetch_pool`.
    ///
    /// Ranking is by cosine similarity, descending; equal scores keep
    /// insertion order (the sort is stable). Searching an empty index is
    /// an error, not an empty result.
    pub fn top_k(&self, query: &[f32], k: usize, fetch_pool: usize) -> Result<Vec<SearchHit>> {
        if self.entries.is_empty() {
            return Err(Error::EmptyIndex);
        }

        let mut scored: Vec<SearchHit> = self
            .entries
            .iter()
            .map(|entry| SearchHit {
                chunk: entry.chunk.clone(),
                score: cosine_similarity(query, &entry.embedding),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(fetch_pool);
        scored.truncate(k);
        Ok(scored)
    }
}

/// Cosine similarity; 0.0 when either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Shared handle to the session-wide index.
///
/// Starts unpopulated; the first merge installs an index, later merges
/// append to it. Readers either see the state before a merge or after
/// it, never a partially merged index. All lock holds are short and
/// never span an await point.
#[derive(Clone, Default)]
pub struct SharedIndex {
    inner: Arc<RwLock<Option<VectorIndex>>>,
}

impl SharedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any document has been ingested yet
    pub fn is_ready(&self) -> bool {
        self.inner.read().is_some()
    }

    /// Total indexed vectors, 0 before the first upload
    pub fn len(&self) -> usize {
        self.inner.read().as_ref().map_or(0, |idx| idx.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Merge a freshly built per-document index into the shared one.
    /// Installs it wholesale when no index exists yet.
    pub fn merge(&self, fresh: VectorIndex) {
        let mut guard = self.inner.write();
        match guard.as_mut() {
            Some(existing) => existing.merge_from(fresh),
            None => *guard = Some(fresh),
        }
    }

    /// Source of the earliest indexed entry, if any document is indexed.
    pub fn first_source(&self) -> Option<String> {
        self.inner
            .read()
            .as_ref()
            .and_then(|idx| idx.first_source().map(String::from))
    }

    /// Search the shared index. `IndexNotReady` before the first upload.
    pub fn search(&self, query: &[f32], k: usize, fetch_pool: usize) -> Result<Vec<SearchHit>> {
        let guard = self.inner.read();
        let index = guard.as_ref().ok_or(Error::IndexNotReady)?;
        index.top_k(query, k, fetch_pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(text: &str, source: &str, ordinal: u32) -> Chunk {
        Chunk::new(text.to_string(), source.to_string(), ordinal)
    }

    fn index_of(entries: Vec<(Chunk, Vec<f32>)>) -> VectorIndex {
        let (chunks, embeddings) = entries.into_iter().unzip();
        VectorIndex::from_embedded(chunks, embeddings).unwrap()
    }

    #[test]
    fn top_k_ranks_by_similarity() {
        let index = index_of(vec![
            (chunk("far", "a.txt", 0), vec![0.0, 1.0]),
            (chunk("near", "a.txt", 1), vec![1.0, 0.1]),
            (chunk("exact", "a.txt", 2), vec![1.0, 0.0]),
        ]);

        let hits = index.top_k(&[1.0, 0.0], 2, 10).unwrap();
        assert_eq!(hits[0].chunk.text, "exact");
        assert_eq!(hits[1].chunk.text, "near");
    }

    #[test]
    fn equal_scores_keep_insertion_order() {
        let index = index_of(vec![
            (chunk("first", "a.txt", 0), vec![1.0, 0.0]),
            (chunk("second", "a.txt", 1), vec![1.0, 0.0]),
            (chunk("third", "a.txt", 2), vec![1.0, 0.0]),
        ]);

        let hits = index.top_k(&[1.0, 0.0], 3, 10).unwrap();
        let texts: Vec<_> = hits.iter().map(|h| h.chunk.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[test]
    fn empty_index_search_is_an_error() {
        let index = VectorIndex::new();
        assert!(matches!(index.top_k(&[1.0], 5, 10), Err(Error::EmptyIndex)));
    }

    #[test]
    fn merge_appends_after_existing_entries() {
        let mut base = index_of(vec![(chunk("old", "first.pdf", 0), vec![1.0, 0.0])]);
        let fresh = index_of(vec![(chunk("new", "second.csv", 0), vec![1.0, 0.0])]);

        base.merge_from(fresh);

        assert_eq!(base.len(), 2);
        assert_eq!(base.first_source(), Some("first.pdf"));
        // Equal scores: the pre-merge entry still wins the tie.
        let hits = base.top_k(&[1.0, 0.0], 2, 10).unwrap();
        assert_eq!(hits[0].chunk.source, "first.pdf");
    }

    #[test]
    fn shared_index_starts_unready() {
        let shared = SharedIndex::new();
        assert!(!shared.is_ready());
        assert!(matches!(
            shared.search(&[1.0], 5, 10),
            Err(Error::IndexNotReady)
        ));
    }

    #[test]
    fn first_merge_installs_later_merges_append() {
        let shared = SharedIndex::new();

        shared.merge(index_of(vec![(chunk("a", "one.pdf", 0), vec![1.0])]));
        assert!(shared.is_ready());
        assert_eq!(shared.first_source().as_deref(), Some("one.pdf"));

        shared.merge(index_of(vec![(chunk("b", "two.csv", 0), vec![1.0])]));
        assert_eq!(shared.len(), 2);
        assert_eq!(shared.first_source().as_deref(), Some("one.pdf"));
    }

    #[test]
    fn k_larger_than_index_returns_all() {
        let index = index_of(vec![(chunk("only", "a.txt", 0), vec![1.0])]);
        let hits = index.top_k(&[1.0], 5, 10).unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn zero_magnitude_vectors_score_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }
}
