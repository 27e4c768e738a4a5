//! Per-session state for the interactive surface.
//!
//! A session owns the question/answer history and the list of loaded
//! documents. It lives as long as one `chat` run and is never persisted.

use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// One answered (or failed) question.
#[derive(Debug, Clone)]
pub struct QaRecord {
    pub question: String,
    pub answer: String,
    pub asked_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct Session {
    history: Vec<QaRecord>,
    documents: Vec<PathBuf>,
}

impl Session {
    pub fn new(documents: Vec<PathBuf>) -> Self {
        Self {
            history: Vec::new(),
            documents,
        }
    }

    /// Append a question and the text shown for it.
    pub fn record(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.history.push(QaRecord {
            question: question.into(),
            answer: answer.into(),
            asked_at: Utc::now(),
        });
    }

    /// History, most recent first.
    pub fn history_recent_first(&self) -> impl Iterator<Item = &QaRecord> {
        self.history.iter().rev()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Add documents, ignoring ones already loaded.
    pub fn add_documents(&mut self, documents: impl IntoIterator<Item = PathBuf>) -> usize {
        let mut added = 0;
        for document in documents {
            if !self.documents.contains(&document) {
                self.documents.push(document);
                added += 1;
            }
        }
        added
    }

    pub fn documents(&self) -> &[PathBuf] {
        &self.documents
    }
}
