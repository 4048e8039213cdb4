//! Per-format text extraction
//!
//! Dispatch is keyed by the validated [`FileFormat`] enum; nothing in
//! here branches on raw extension strings.

use calamine::Reader;
use std::io::Read;

use crate::error::{Error, Result};
use crate::types::FileFormat;

/// Extract plain text from an uploaded file.
pub fn extract_text(format: FileFormat, filename: &str, data: &[u8]) -> Result<String> {
    match format {
        FileFormat::Pdf => extract_pdf(filename, data),
        FileFormat::Csv => extract_csv(data),
        FileFormat::Doc | FileFormat::Docx => extract_ooxml(filename, data, "word/document.xml"),
        FileFormat::Xls | FileFormat::Xlsx => extract_spreadsheet(filename, data),
        FileFormat::Ppt | FileFormat::Pptx => extract_slides(filename, data),
        FileFormat::Txt => Ok(String::from_utf8_lossy(data).into_owned()),
    }
}

/// Extract PDF text and normalize whitespace
fn extract_pdf(filename: &str, data: &[u8]) -> Result<String> {
    let raw = pdf_extract::extract_text_from_mem(data)
        .map_err(|e| Error::extraction(filename, e.to_string()))?;

    let content = raw
        .replace('\0', "")
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    Ok(content)
}

/// Flatten CSV rows into pipe-delimited lines
fn extract_csv(data: &[u8]) -> Result<String> {
    let mut reader = csv::Reader::from_reader(data);
    let mut content = String::new();

    if let Ok(headers) = reader.headers() {
        content.push_str(&headers.iter().collect::<Vec<_>>().join(" | "));
        content.push('\n');
    }

    for record in reader.records().flatten() {
        content.push_str(&record.iter().collect::<Vec<_>>().join(" | "));
        content.push('\n');
    }

    Ok(content)
}

/// Flatten every sheet of a workbook into pipe-delimited lines
fn extract_spreadsheet(filename: &str, data: &[u8]) -> Result<String> {
    let cursor = std::io::Cursor::new(data);
    let mut workbook = calamine::open_workbook_auto_from_rs(cursor)
        .map_err(|e| Error::extraction(filename, e.to_string()))?;

    let mut content = String::new();

    for sheet_name in workbook.sheet_names().to_vec() {
        if let Ok(range) = workbook.worksheet_range(&sheet_name) {
            content.push_str(&format!("Sheet: {}\n", sheet_name));

            for row in range.rows() {
                let row_text: Vec<String> = row
                    .iter()
                    .map(|cell| match cell {
                        calamine::Data::Empty => String::new(),
                        calamine::Data::String(s) => s.clone(),
                        calamine::Data::Float(f) => f.to_string(),
                        calamine::Data::Int(i) => i.to_string(),
                        calamine::Data::Bool(b) => b.to_string(),
                        calamine::Data::DateTime(dt) => dt.to_string(),
                        _ => String::new(),
                    })
                    .collect();

                if !row_text.iter().all(|s| s.is_empty()) {
                    content.push_str(&row_text.join(" | "));
                    content.push('\n');
                }
            }
            content.push('\n');
        }
    }

    Ok(content)
}

/// Extract text from the main document part of an OOXML archive (.docx)
fn extract_ooxml(filename: &str, data: &[u8], part: &str) -> Result<String> {
    let cursor = std::io::Cursor::new(data);
    let mut archive = zip::ZipArchive::new(cursor).map_err(|e| {
        Error::extraction(
            filename,
            format!("not a readable Office archive ({}); legacy binary formats need conversion to .docx/.pptx first", e),
        )
    })?;

    let mut xml = String::new();
    archive
        .by_name(part)
        .map_err(|e| Error::extraction(filename, format!("missing '{}': {}", part, e)))?
        .read_to_string(&mut xml)
        .map_err(|e| Error::extraction(filename, e.to_string()))?;

    Ok(text_runs_from_xml(&xml))
}

/// Extract slide text from a .pptx archive, one section per slide
fn extract_slides(filename: &str, data: &[u8]) -> Result<String> {
    let cursor = std::io::Cursor::new(data);
    let mut archive = zip::ZipArchive::new(cursor).map_err(|e| {
        Error::extraction(
            filename,
            format!("not a readable Office archive ({}); legacy binary formats need conversion to .docx/.pptx first", e),
        )
    })?;

    // Slides live at ppt/slides/slideN.xml; sort numerically so slide 10
    // follows slide 9, not slide 1.
    let mut slide_names: Vec<String> = archive
        .file_names()
        .filter(|name| name.starts_with("ppt/slides/slide") && name.ends_with(".xml"))
        .map(|s| s.to_string())
        .collect();
    slide_names.sort_by_key(|name| {
        name.trim_start_matches("ppt/slides/slide")
            .trim_end_matches(".xml")
            .parse::<u32>()
            .unwrap_or(0)
    });

    let mut content = String::new();
    for (i, slide_name) in slide_names.iter().enumerate() {
        let mut xml = String::new();
        if let Ok(mut file) = archive.by_name(slide_name) {
            if file.read_to_string(&mut xml).is_ok() {
                let slide_text = text_runs_from_xml(&xml);
                if !slide_text.trim().is_empty() {
                    content.push_str(&format!("Slide {}:\n{}\n\n", i + 1, slide_text));
                }
            }
        }
    }

    if content.trim().is_empty() {
        return Err(Error::extraction(filename, "no slide text found"));
    }

    Ok(content)
}

/// Collect the text runs (`<w:t>` / `<a:t>` elements) from OOXML content,
/// inserting a line break at each paragraph end.
fn text_runs_from_xml(xml: &str) -> String {
    use quick_xml::events::Event;
    use quick_xml::Reader;

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut content = String::new();
    let mut in_text_element = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if e.local_name().as_ref() == b"t" {
                    in_text_element = true;
                }
            }
            Ok(Event::Text(e)) => {
                if in_text_element {
                    if let Ok(text) = e.unescape() {
                        content.push_str(&text);
                    }
                }
            }
            Ok(Event::End(e)) => {
                match e.local_name().as_ref() {
                    b"t" => in_text_element = false,
                    b"p" => content.push('\n'),
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
    }

    content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_rows_become_pipe_delimited_lines() {
        let data = b"name,age\nalice,30\nbob,25\n";
        let text = extract_csv(data).unwrap();
        assert_eq!(text, "name | age\nalice | 30\nbob | 25\n");
    }

    #[test]
    fn txt_passes_through() {
        let text = extract_text(FileFormat::Txt, "notes.txt", "plain notes".as_bytes()).unwrap();
        assert_eq!(text, "plain notes");
    }

    #[test]
    fn docx_text_runs_are_collected() {
        let xml = r#"<?xml version="1.0"?>
            <w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
              <w:body>
                <w:p><w:r><w:t>First paragraph.</w:t></w:r></w:p>
                <w:p><w:r><w:t>Second</w:t></w:r><w:r><w:t> paragraph.</w:t></w:r></w:p>
              </w:body>
            </w:document>"#;
        let text = text_runs_from_xml(xml);
        assert_eq!(text, "First paragraph.\nSecond paragraph.");
    }

    #[test]
    fn non_archive_docx_is_an_extraction_error() {
        let result = extract_text(FileFormat::Docx, "broken.docx", b"not a zip");
        assert!(matches!(result, Err(Error::Extraction { .. })));
    }
}
