//! Document Q&A server binary
//!
//! Run with: cargo run -p docchat --bin docchat-server

use docchat::{config::RagConfig, server::DocChatServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docchat=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = RagConfig::load()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding model: {}", config.llm.embed_model);
    tracing::info!("  - Generation model: {}", config.llm.generate_model);
    tracing::info!("  - Chunk size: {}", config.chunking.chunk_size);
    tracing::info!("  - Database: {}", config.storage.database_path.display());

    // Check Ollama
    tracing::info!("Checking Ollama at {}...", config.llm.base_url);
    let client = reqwest::Client::new();
    match client
        .get(format!("{}/api/tags", config.llm.base_url))
        .send()
        .await
    {
        Ok(resp) if resp.status().is_success() => {
            tracing::info!("Ollama is running");
        }
        _ => {
            tracing::warn!("Ollama not available at {}", config.llm.base_url);
            tracing::warn!("Please start Ollama:");
            tracing::warn!("  1. Start: ollama serve");
            tracing::warn!(
                "  2. Pull models: ollama pull {} && ollama pull {}",
                config.llm.embed_model,
                config.llm.generate_model
            );
        }
    }

    // Create and start server
    let server = DocChatServer::new(config)?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST /upload            - Upload a document");
    println!("  POST /query             - Ask a question");
    println!("  GET  /conversation/:id  - Fetch conversation history");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
