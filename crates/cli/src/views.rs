//! Plain-text renderings of the ask, history and about views.

use crate::session::Session;
use askdocs_core::AppConfig;
use askdocs_knowledge::{RagAnswer, SkippedFile};

/// Timestamp format used in the history view.
const ASKED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Shown in the history view before any question has been asked.
pub const EMPTY_HISTORY: &str = "No history yet.";

/// Shown when a question is asked without any documents.
pub const NO_DOCUMENTS: &str = "Upload one or more .pdf or .txt files to ask about.";

/// Shown when no question text was given.
pub const NO_QUESTION: &str = "Ask a question about the document(s).";

/// History view: every question and answer, most recent first.
pub fn render_history(session: &Session) -> String {
    let mut out = String::from("Previous Questions & Answers\n\n");

    if session.history_len() == 0 {
        out.push_str(EMPTY_HISTORY);
        out.push('\n');
        return out;
    }

    for record in session.history_recent_first() {
        out.push_str(&format!("Q: {}\n", record.question));
        out.push_str(&format!("A: {}\n", record.answer));
        out.push_str(&format!(
            "Asked: {}\n",
            record.asked_at.format(ASKED_AT_FORMAT)
        ));
        out.push_str("---\n");
    }

    out
}

/// Informational view describing how answers are produced.
pub fn render_about(config: &AppConfig) -> String {
    format!(
        "Ask the Docs - Mini RAG App\n\
         \n\
         Load .pdf or .txt files and ask questions about them.\n\
         The app uses:\n\
         - {} chunking ({} characters, {} overlap)\n\
         - {} embeddings with an in-memory flat vector index (top {})\n\
         - {} ({}) for response generation\n",
        config.rag.strategy,
        config.rag.chunk_size,
        config.rag.chunk_overlap,
        config.rag.embedding.provider,
        config.rag.top_k,
        config.provider,
        config.model,
    )
}

/// Ask view: the answer, followed by its sources when requested.
pub fn render_answer(answer: &RagAnswer, show_sources: bool) -> String {
    let mut out = format!("{}\n", answer.answer);

    if show_sources && !answer.sources.is_empty() {
        out.push_str("\nSources:\n");
        for (i, source) in answer.sources.iter().enumerate() {
            out.push_str(&format!(
                "  [{}] {} ({})\n      {}\n",
                i + 1,
                source.source,
                source.location,
                source.snippet.replace('\n', " ")
            ));
        }
    }

    out
}

/// Notice listing files left out of a best-effort extraction.
pub fn render_skipped(skipped: &[SkippedFile]) -> Option<String> {
    if skipped.is_empty() {
        return None;
    }

    let mut out = format!("Skipped {} unreadable file(s):\n", skipped.len());
    for file in skipped {
        out.push_str(&format!("  - {}: {}\n", file.name, file.reason));
    }
    Some(out)
}
