//! Document formats, chunks, and indexed vectors

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Closed allow-list of ingestable file formats.
///
/// Adding a format means adding a variant here plus a dispatch arm in
/// `ingestion::parser`; nothing branches on raw extension strings
/// outside this type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Pdf,
    Csv,
    Doc,
    Docx,
    Xls,
    Xlsx,
    Ppt,
    Pptx,
    Txt,
}

impl FileFormat {
    /// Validate a filename against the allow-list.
    pub fn from_filename(filename: &str) -> Result<Self> {
        let extension = filename.rsplit('.').next().unwrap_or("").to_lowercase();
        match extension.as_str() {
            "pdf" => Ok(Self::Pdf),
            "csv" => Ok(Self::Csv),
            "doc" => Ok(Self::Doc),
            "docx" => Ok(Self::Docx),
            "xls" => Ok(Self::Xls),
            "xlsx" => Ok(Self::Xlsx),
            "ppt" => Ok(Self::Ppt),
            "pptx" => Ok(Self::Pptx),
            "txt" => Ok(Self::Txt),
            _ => Err(Error::UnsupportedFormat(extension)),
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Csv => "CSV",
            Self::Doc => "Word Document (.doc)",
            Self::Docx => "Word Document (.docx)",
            Self::Xls => "Excel Spreadsheet (.xls)",
            Self::Xlsx => "Excel Spreadsheet (.xlsx)",
            Self::Ppt => "PowerPoint (.ppt)",
            Self::Pptx => "PowerPoint (.pptx)",
            Self::Txt => "Text File",
        }
    }
}

/// A bounded passage of a document's text, the unit of embedding and
/// retrieval. Immutable once created; `ordinal` is unique per source,
/// not globally.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Passage text
    pub text: String,
    /// Source document identifier (the uploaded filename)
    pub source: String,
    /// Position within the source's chunk sequence
    pub ordinal: u32,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(text: String, source: String, ordinal: u32) -> Self {
        Self {
            text,
            source,
            ordinal,
        }
    }
}

/// A chunk paired with its embedding. Created at ingestion time, never
/// mutated, owned exclusively by the index that stores it.
#[derive(Debug, Clone)]
pub struct IndexedVector {
    /// Provenance and text
    pub chunk: Chunk,
    /// Fixed-length embedding vector
    pub embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_list_accepts_known_formats() {
        assert_eq!(FileFormat::from_filename("report.csv").unwrap(), FileFormat::Csv);
        assert_eq!(FileFormat::from_filename("deck.PPTX").unwrap(), FileFormat::Pptx);
        assert_eq!(FileFormat::from_filename("notes.pdf").unwrap(), FileFormat::Pdf);
        assert_eq!(FileFormat::from_filename("a.b.txt").unwrap(), FileFormat::Txt);
    }

    #[test]
    fn allow_list_rejects_unknown_formats() {
        assert!(matches!(
            FileFormat::from_filename("image.png"),
            Err(Error::UnsupportedFormat(ext)) if ext == "png"
        ));
        assert!(matches!(
            FileFormat::from_filename("noextension"),
            Err(Error::UnsupportedFormat(_))
        ));
    }
}
