//! Prompt templates, one per document family
//!
//! The retrieval router picks a [`PromptKind`]; this module owns the
//! actual wording. Templates differ in how they tell the model to read
//! the context, not in output format.

use crate::types::FileFormat;

/// Which prompt template a query should be answered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Prose documents (pdf, docx, txt); the fallback for everything else
    Document,
    /// Comma-separated tabular data
    Csv,
    /// Excel workbooks
    Spreadsheet,
    /// Presentation slides
    Slides,
}

impl PromptKind {
    /// Template family for a document format.
    pub fn for_format(format: FileFormat) -> Self {
        match format {
            FileFormat::Csv => Self::Csv,
            FileFormat::Xls | FileFormat::Xlsx => Self::Spreadsheet,
            FileFormat::Ppt | FileFormat::Pptx => Self::Slides,
            _ => Self::Document,
        }
    }

    /// Render the full generation prompt for this template family.
    pub fn render(&self, context: &str, question: &str) -> String {
        let instructions = match self {
            Self::Document => {
                "You are a helpful assistant answering questions about an uploaded document. \
                 Use only the context below to answer. If the context does not contain the \
                 answer, say you don't know rather than guessing."
            }
            Self::Csv => {
                "You are a data analyst answering questions about CSV data. The context below \
                 contains rows with '|'-separated columns; the first line holds the column \
                 headers. Answer using only these rows, and be precise with numbers. If the \
                 rows shown do not contain the answer, say so."
            }
            Self::Spreadsheet => {
                "You are a data analyst answering questions about an Excel workbook. The \
                 context below contains '|'-separated rows grouped under 'Sheet:' headings. \
                 Answer using only this data, naming the sheet when it matters, and be \
                 precise with numbers. If the data shown does not contain the answer, say so."
            }
            Self::Slides => {
                "You are a helpful assistant answering questions about a slide presentation. \
                 The context below contains slide text grouped under 'Slide N:' headings. \
                 Answer using only these slides, referring to slide numbers when useful. If \
                 the slides do not contain the answer, say so."
            }
        };

        format!(
            "{instructions}\n\nContext:\n{context}\n\nQuestion: {question}\n\nAnswer:"
        )
    }
}

/// Render the document summarization prompt used right after upload.
pub fn summary_prompt(text: &str) -> String {
    format!(
        "Summarize the following document in a few concise sentences, \
         covering its main topic and key points.\n\nDocument:\n{text}\n\nSummary:"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_maps_to_template_family() {
        assert_eq!(PromptKind::for_format(FileFormat::Csv), PromptKind::Csv);
        assert_eq!(PromptKind::for_format(FileFormat::Xlsx), PromptKind::Spreadsheet);
        assert_eq!(PromptKind::for_format(FileFormat::Xls), PromptKind::Spreadsheet);
        assert_eq!(PromptKind::for_format(FileFormat::Pptx), PromptKind::Slides);
        assert_eq!(PromptKind::for_format(FileFormat::Pdf), PromptKind::Document);
        assert_eq!(PromptKind::for_format(FileFormat::Txt), PromptKind::Document);
    }

    #[test]
    fn rendered_prompt_embeds_context_and_question() {
        let prompt = PromptKind::Document.render("the sky is blue", "what color is the sky?");
        assert!(prompt.contains("Context:\nthe sky is blue"));
        assert!(prompt.contains("Question: what color is the sky?"));
        assert!(prompt.ends_with("Answer:"));
    }

    #[test]
    fn each_family_renders_distinct_instructions() {
        let kinds = [
            PromptKind::Document,
            PromptKind::Csv,
            PromptKind::Spreadsheet,
            PromptKind::Slides,
        ];
        let rendered: Vec<String> = kinds.iter().map(|k| k.render("c", "q")).collect();
        for (i, a) in rendered.iter().enumerate() {
            for b in rendered.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
