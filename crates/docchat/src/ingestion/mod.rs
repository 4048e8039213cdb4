//! Document ingestion: format detection, text extraction, chunking

pub mod chunker;
pub mod parser;

pub use chunker::TextChunker;
pub use parser::extract_text;
