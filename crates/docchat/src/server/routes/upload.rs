//! Document upload endpoint

use axum::{
    extract::{Multipart, State},
    Json,
};
use std::io::Write;
use std::path::Path;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::index::VectorIndex;
use crate::ingestion::extract_text;
use crate::server::state::AppState;
use crate::types::{Chunk, FileFormat, NewMessage, UploadResponse};

/// POST /upload - ingest one document and summarize it
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut conversation_id: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Internal(format!("Failed to read multipart field: {}", e)))?
    {
        match field.name().unwrap_or("") {
            "file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| Error::Internal(format!("Failed to read file: {}", e)))?;
                file = Some((filename, data.to_vec()));
            }
            "conversation_id" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| Error::Internal(format!("Failed to read field: {}", e)))?;
                if !value.trim().is_empty() {
                    conversation_id = Some(value);
                }
            }
            _ => {}
        }
    }

    let (filename, data) = file.ok_or(Error::FileRequired)?;
    if filename.is_empty() {
        return Err(Error::FileRequired);
    }

    let response =
        ingest_document(&state, &filename, &data, conversation_id.as_deref()).await?;
    Ok(Json(response))
}

/// Run the full ingestion pipeline for one document: stage, extract,
/// chunk, embed, merge, summarize, record.
///
/// The staged copy lives only for the duration of this call; the
/// `NamedTempFile` guard removes it on every exit path, error or not.
pub async fn ingest_document(
    state: &AppState,
    filename: &str,
    data: &[u8],
    conversation_id: Option<&str>,
) -> Result<UploadResponse> {
    let filename = sanitize_filename(filename)?;
    let format = FileFormat::from_filename(&filename)?;

    let mut staged = tempfile::Builder::new()
        .prefix(&format!("{}-", Uuid::new_v4()))
        .suffix(&format!("-{}", filename))
        .tempfile_in(&state.config().storage.upload_dir)?;
    staged.write_all(data)?;

    tracing::info!(
        file = %filename,
        format = format.display_name(),
        bytes = data.len(),
        "Ingesting document"
    );

    let text = extract_text(format, &filename, data)?;

    let passages = state.chunker().chunk(&text);
    if passages.is_empty() {
        return Err(Error::EmptyDocument(filename));
    }
    let chunks: Vec<Chunk> = passages
        .into_iter()
        .enumerate()
        .map(|(i, passage)| Chunk::new(passage, filename.clone(), i as u32))
        .collect();

    let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
    let embeddings = state.embedder().embed_batch(&texts).await?;

    let fresh = VectorIndex::from_embedded(chunks, embeddings)?;
    let chunk_count = fresh.len();
    state.index().merge(fresh);

    // From here on the chunks stay searchable even if summarization or
    // the history write fails; the caller just retries the upload.
    let summary = state.llm().summarize(&text).await?;

    let conversation_id = state.conversations().append(
        conversation_id,
        NewMessage::FileUpload {
            file_name: filename.clone(),
            summary: summary.clone(),
        },
    )?;

    tracing::info!(
        file = %filename,
        chunks = chunk_count,
        conversation = %conversation_id,
        "Document ingested"
    );

    Ok(UploadResponse {
        summary,
        conversation_id,
        message: format!("File '{}' processed successfully", filename),
    })
}

/// Reduce a client-supplied filename to its final path component so it
/// cannot traverse out of the staging directory.
fn sanitize_filename(raw: &str) -> Result<String> {
    Path::new(raw)
        .file_name()
        .and_then(|name| name.to_str())
        .map(String::from)
        .ok_or(Error::FileRequired)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RagConfig;
    use crate::providers::{EmbeddingProvider, LlmProvider};
    use crate::storage::ConversationStore;
    use crate::generation::PromptKind;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct FixedEmbedder;

    #[async_trait]
    impl EmbeddingProvider for FixedEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            Ok(vec![text.len() as f32, 1.0])
        }
        fn dimensions(&self) -> usize {
            2
        }
        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }
        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct CannedLlm;

    #[async_trait]
    impl LlmProvider for CannedLlm {
        async fn generate_answer(
            &self,
            _kind: PromptKind,
            _context: &str,
            _question: &str,
        ) -> Result<String> {
            Ok("canned answer".to_string())
        }
        async fn summarize(&self, _text: &str) -> Result<String> {
            Ok("canned summary".to_string())
        }
        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }
        fn name(&self) -> &str {
            "canned"
        }
        fn model(&self) -> &str {
            "canned"
        }
    }

    fn test_state() -> (AppState, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let mut config = RagConfig::default();
        config.storage.upload_dir = dir.path().join("uploads");
        let state = AppState::from_parts(
            config,
            Arc::new(FixedEmbedder),
            Arc::new(CannedLlm),
            ConversationStore::in_memory().unwrap(),
        )
        .unwrap();
        (state, dir)
    }

    #[test]
    fn sanitize_strips_directory_components() {
        assert_eq!(sanitize_filename("../../etc/passwd.txt").unwrap(), "passwd.txt");
        assert_eq!(sanitize_filename("notes.txt").unwrap(), "notes.txt");
    }

    #[tokio::test]
    async fn ingest_indexes_and_records_the_upload() {
        let (state, _dir) = test_state();

        let response = ingest_document(&state, "notes.txt", b"some document text", None)
            .await
            .unwrap();

        assert_eq!(response.summary, "canned summary");
        assert!(state.index().is_ready());
        assert_eq!(state.index().first_source().as_deref(), Some("notes.txt"));

        let conversation = state.conversations().get(&response.conversation_id).unwrap();
        assert_eq!(conversation.files, vec!["notes.txt".to_string()]);
        assert_eq!(conversation.messages.len(), 1);
    }

    #[tokio::test]
    async fn empty_document_is_rejected_and_not_indexed() {
        let (state, _dir) = test_state();

        let result = ingest_document(&state, "blank.txt", b"   \n  ", None).await;
        assert!(matches!(result, Err(Error::EmptyDocument(_))));
        assert!(!state.index().is_ready());
    }

    #[tokio::test]
    async fn unsupported_format_is_rejected_before_staging() {
        let (state, _dir) = test_state();

        let result = ingest_document(&state, "image.png", b"bytes", None).await;
        assert!(matches!(result, Err(Error::UnsupportedFormat(_))));
    }

    #[tokio::test]
    async fn staging_directory_is_empty_after_ingest() {
        let (state, _dir) = test_state();

        ingest_document(&state, "notes.txt", b"text to stage", None)
            .await
            .unwrap();

        let leftovers: Vec<_> = std::fs::read_dir(&state.config().storage.upload_dir)
            .unwrap()
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn second_upload_appends_to_the_same_conversation() {
        let (state, _dir) = test_state();

        let first = ingest_document(&state, "a.txt", b"first document", None)
            .await
            .unwrap();
        let second = ingest_document(
            &state,
            "b.txt",
            b"second document",
            Some(&first.conversation_id),
        )
        .await
        .unwrap();

        assert_eq!(first.conversation_id, second.conversation_id);
        assert_eq!(state.index().first_source().as_deref(), Some("a.txt"));

        let conversation = state.conversations().get(&first.conversation_id).unwrap();
        assert_eq!(conversation.messages.len(), 2);
        // Only the founding upload is recorded in the files list.
        assert_eq!(conversation.files, vec!["a.txt".to_string()]);
    }
}
