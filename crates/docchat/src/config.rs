//! Configuration for the document Q&A system

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Main system configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RagConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// Ollama/LLM configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
}

impl RagConfig {
    /// Load configuration from the file named by `DOCCHAT_CONFIG`,
    /// falling back to defaults when the variable is unset.
    pub fn load() -> Result<Self> {
        match std::env::var("DOCCHAT_CONFIG") {
            Ok(path) => {
                let content = std::fs::read_to_string(&path)
                    .map_err(|e| Error::Config(format!("Failed to read '{}': {}", path, e)))?;
                toml::from_str(&content)
                    .map_err(|e| Error::Config(format!("Failed to parse '{}': {}", path, e)))
            }
            Err(_) => Ok(Self::default()),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Maximum upload size in bytes
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            max_upload_size: 50 * 1024 * 1024, // 50MB
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// LLM (Ollama) configuration, shared by embedding and generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Embedding model name
    pub embed_model: String,
    /// Embedding dimensions (768 for nomic-embed-text)
    pub embed_dimensions: usize,
    /// Generation model name
    pub generate_model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
    /// Character budget for document summarization input
    pub summary_input_limit: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            embed_model: "nomic-embed-text".to_string(),
            embed_dimensions: 768,
            generate_model: "phi3".to_string(),
            temperature: 0.3,
            timeout_secs: 120,
            max_retries: 2,
            summary_input_limit: 6000,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of chunks handed to the synthesizer
    pub top_k: usize,
    /// Candidate pool size ranked before truncating to `top_k`
    pub fetch_pool: usize,
    /// Which document decides the prompt template
    #[serde(default)]
    pub route_by: RoutePolicy,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            fetch_pool: 10,
            route_by: RoutePolicy::default(),
        }
    }
}

/// Prompt-template routing policy.
///
/// `FirstUpload` reproduces the historical behavior: the first document
/// ever merged into the index decides the template for every question,
/// even after later uploads. `TopHit` routes by the source of the best
/// retrieved chunk instead.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RoutePolicy {
    /// Route by the earliest-inserted entry's source (default)
    #[default]
    FirstUpload,
    /// Route by the source of the highest-ranked retrieved chunk
    TopHit,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite database path for conversation history
    pub database_path: PathBuf,
    /// Directory where uploads are staged during processing
    pub upload_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("docchat");

        Self {
            database_path: data_dir.join("conversations.db"),
            upload_dir: data_dir.join("uploads"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_retrieval_contract() {
        let config = RagConfig::default();
        assert_eq!(config.retrieval.top_k, 5);
        assert_eq!(config.retrieval.fetch_pool, 10);
        assert!(config.retrieval.fetch_pool >= config.retrieval.top_k);
        assert_eq!(config.retrieval.route_by, RoutePolicy::FirstUpload);
    }

    #[test]
    fn chunk_overlap_smaller_than_chunk_size() {
        let config = ChunkingConfig::default();
        assert!(config.chunk_overlap < config.chunk_size);
    }
}
