//! Text extraction from uploaded documents.
//!
//! Every file contributes a section of the form `"\n--- {name} ---\n{text}\n"`
//! to one combined string, in upload order. PDFs are read page by page with
//! `lopdf`; anything else is treated as UTF-8 text.

use askdocs_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// An in-memory document as handed to the extractor.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Display name, used for type detection and the section header
    pub name: String,

    /// Raw file contents
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Create a file from a name and its contents.
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, naming it after its final path component.
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self { name, bytes })
    }
}

/// How a file's contents are decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Pdf,
    Text,
}

impl FileKind {
    /// Detect the kind from a file name. Only a `.pdf` suffix (any case) means PDF.
    pub fn from_name(name: &str) -> Self {
        let is_pdf = name.len() >= 4
            && name
                .get(name.len() - 4..)
                .is_some_and(|ext| ext.eq_ignore_ascii_case(".pdf"));

        if is_pdf {
            FileKind::Pdf
        } else {
            FileKind::Text
        }
    }
}

/// A file left out of a best-effort extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedFile {
    pub name: String,
    pub reason: String,
}

/// Result of a best-effort extraction.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Combined text of every file that could be read
    pub text: String,

    /// Files that failed, in upload order
    pub skipped: Vec<SkippedFile>,
}

/// Extract and concatenate the text of all files.
///
/// Any unreadable file aborts the whole extraction.
pub fn extract_texts(files: &[UploadedFile]) -> AppResult<String> {
    tracing::info!("Extracting text from {} file(s)", files.len());

    let mut combined = String::new();
    for file in files {
        let text = extract_file(file)?;
        push_section(&mut combined, &file.name, &text);
    }

    tracing::debug!("Extracted {} characters", combined.chars().count());

    Ok(combined)
}

/// Extract and concatenate the text of all readable files.
///
/// Unreadable files are reported in [`Extraction::skipped`] instead of
/// failing the batch.
pub fn extract_texts_best_effort(files: &[UploadedFile]) -> Extraction {
    tracing::info!(
        "Extracting text from {} file(s), skipping unreadable ones",
        files.len()
    );

    let mut extraction = Extraction::default();
    for file in files {
        match extract_file(file) {
            Ok(text) => push_section(&mut extraction.text, &file.name, &text),
            Err(e) => {
                tracing::warn!("Skipping {}: {}", file.name, e);
                extraction.skipped.push(SkippedFile {
                    name: file.name.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    extraction
}

/// Extract the text of a single file according to its kind.
pub fn extract_file(file: &UploadedFile) -> AppResult<String> {
    match FileKind::from_name(&file.name) {
        FileKind::Pdf => extract_pdf_pages(&file.bytes)
            .map(|pages| pages.join("\n"))
            .map_err(|e| AppError::Extraction(format!("{}: {}", file.name, e))),
        FileKind::Text => String::from_utf8(file.bytes.clone()).map_err(|e| {
            AppError::Extraction(format!("{}: not valid UTF-8 text ({})", file.name, e))
        }),
    }
}

/// Extract the text of every page of a PDF, in page order.
///
/// A page whose text cannot be extracted yields an empty string so the
/// remaining pages are still used.
pub fn extract_pdf_pages(bytes: &[u8]) -> AppResult<Vec<String>> {
    let document = lopdf::Document::load_mem(bytes)
        .map_err(|e| AppError::Extraction(format!("Failed to parse PDF: {}", e)))?;

    let pages = document
        .get_pages()
        .into_keys()
        .map(|page_number| {
            document.extract_text(&[page_number]).unwrap_or_else(|e| {
                tracing::debug!("No text on page {}: {}", page_number, e);
                String::new()
            })
        })
        .collect::<Vec<_>>();

    tracing::debug!("Extracted {} PDF page(s)", pages.len());

    Ok(pages)
}

fn push_section(combined: &mut String, name: &str, text: &str) {
    combined.push_str(&format!("\n--- {} ---\n{}\n", name, text));
}

/// Maps character offsets in a combined extraction back to file names.
#[derive(Debug, Clone, Default)]
pub struct SourceMap {
    /// (first character of the section, file name), ascending
    sections: Vec<(usize, String)>,
}

impl SourceMap {
    /// Locate the section headers in text produced by [`extract_texts`].
    ///
    /// A header is a `--- name ---` line preceded by an empty line; the
    /// section starts at the newline that opens it.
    pub fn from_combined(text: &str) -> Self {
        let mut sections = Vec::new();
        let mut offset = 0usize;
        let mut previous_blank = false;

        for (index, line) in text.split('\n').enumerate() {
            if index > 0 && previous_blank {
                if let Some(name) = parse_header(line) {
                    sections.push((offset - 1, name.to_string()));
                }
            }
            previous_blank = line.is_empty();
            offset += line.chars().count() + 1;
        }

        Self { sections }
    }

    /// File name of the section containing `char_offset`, if any.
    pub fn source_at(&self, char_offset: usize) -> Option<&str> {
        let idx = self
            .sections
            .partition_point(|(start, _)| *start <= char_offset);
        idx.checked_sub(1)
            .map(|i| self.sections[i].1.as_str())
    }

    /// File name for a character range, judged by its midpoint.
    ///
    /// A window that starts at the tail of one file and runs into the next
    /// is attributed to whichever file holds most of it.
    pub fn source_for(&self, char_range: (usize, usize)) -> Option<&str> {
        let (start, end) = char_range;
        self.source_at(start + end.saturating_sub(start) / 2)
    }

    /// Number of sections found.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

fn parse_header(line: &str) -> Option<&str> {
    line.strip_prefix("--- ")?
        .strip_suffix(" ---")
        .filter(|name| !name.is_empty())
}
