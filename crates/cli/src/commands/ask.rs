//! Ask command handler.
//!
//! Answers one question about a set of documents and exits.

use crate::views;
use askdocs_core::{config::AppConfig, AppError, AppResult};
use askdocs_knowledge::{
    extract_texts, extract_texts_best_effort, AnswerError, RagAnswer, RagPipeline, SkippedFile,
    UploadedFile,
};
use askdocs_prompt::resolve_prompt;
use clap::Args;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File extensions picked up when walking a directory.
const DOCUMENT_EXTENSIONS: [&str; 2] = ["pdf", "txt"];

/// Ask a question about one or more documents
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: Option<String>,

    /// Document to read (.pdf or .txt); directories are searched recursively
    #[arg(short, long = "file", value_name = "PATH")]
    pub files: Vec<PathBuf>,

    /// Number of chunks placed in the prompt context
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Skip files that cannot be read instead of failing
    #[arg(long)]
    pub skip_unreadable: bool,

    /// Show the chunks the answer was based on
    #[arg(long)]
    pub sources: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// What happened to a question.
#[derive(Debug)]
pub enum AskOutcome {
    /// No documents were given; the pipeline did not run
    NoDocuments,

    /// The question was blank; the pipeline did not run
    NoQuestion,

    Answered {
        answer: RagAnswer,
        skipped: Vec<SkippedFile>,
    },

    /// The pipeline ran but could not produce an answer
    Unanswered {
        error: AnswerError,
        skipped: Vec<SkippedFile>,
    },
}

impl AskOutcome {
    /// Text shown to the user for this outcome.
    pub fn message(&self) -> String {
        match self {
            AskOutcome::NoDocuments => views::NO_DOCUMENTS.to_string(),
            AskOutcome::NoQuestion => views::NO_QUESTION.to_string(),
            AskOutcome::Answered { answer, .. } => answer.answer.clone(),
            AskOutcome::Unanswered { error, .. } => error.to_string(),
        }
    }

    /// Whether the pipeline ran, which is when the question enters history.
    pub fn was_attempted(&self) -> bool {
        matches!(
            self,
            AskOutcome::Answered { .. } | AskOutcome::Unanswered { .. }
        )
    }

    fn skipped(&self) -> &[SkippedFile] {
        match self {
            AskOutcome::Answered { skipped, .. } | AskOutcome::Unanswered { skipped, .. } => {
                skipped
            }
            _ => &[],
        }
    }
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let documents = collect_documents(&self.files)?;
        let mut rag = build_pipeline(config)?;
        if let Some(top_k) = self.top_k {
            rag = rag.with_top_k(top_k);
        }

        let question = self.question.clone().unwrap_or_default();
        let outcome = ask_documents(&rag, &documents, &question, self.skip_unreadable).await?;

        if self.json {
            let output = serde_json::json!({
                "question": question,
                "answered": matches!(outcome, AskOutcome::Answered { .. }),
                "answer": outcome.message(),
                "sources": match &outcome {
                    AskOutcome::Answered { answer, .. } => serde_json::to_value(&answer.sources)?,
                    _ => serde_json::json!([]),
                },
                "skipped": outcome.skipped(),
                "provider": config.provider,
                "model": config.model,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        if let Some(notice) = views::render_skipped(outcome.skipped()) {
            eprint!("{}", notice);
        }

        match &outcome {
            AskOutcome::Answered { answer, .. } => {
                print!("{}", views::render_answer(answer, self.sources))
            }
            other => println!("{}", other.message()),
        }

        Ok(())
    }
}

/// Create the answering pipeline for a workspace configuration.
pub fn build_pipeline(config: &AppConfig) -> AppResult<RagPipeline> {
    let prompt = resolve_prompt(&config.workspace)?;
    tracing::debug!("Using prompt: {}", prompt.id);
    RagPipeline::from_config(config, prompt)
}

/// Extract the documents and answer the question.
///
/// Nothing is read when there are no documents or the question is blank.
/// Extraction failures abort the request unless `skip_unreadable` is set.
pub async fn ask_documents(
    rag: &RagPipeline,
    documents: &[PathBuf],
    question: &str,
    skip_unreadable: bool,
) -> AppResult<AskOutcome> {
    if documents.is_empty() {
        tracing::info!("No documents given, skipping question");
        return Ok(AskOutcome::NoDocuments);
    }

    let question = question.trim();
    if question.is_empty() {
        tracing::info!("Blank question, skipping");
        return Ok(AskOutcome::NoQuestion);
    }

    let files = documents
        .iter()
        .map(|path| UploadedFile::from_path(path))
        .collect::<AppResult<Vec<_>>>()?;

    let (text, skipped) = if skip_unreadable {
        let extraction = extract_texts_best_effort(&files);
        (extraction.text, extraction.skipped)
    } else {
        (extract_texts(&files)?, Vec::new())
    };

    let outcome = match rag.answer(&text, question).await {
        Ok(answer) => AskOutcome::Answered { answer, skipped },
        Err(error) => {
            tracing::warn!("Question not answered: {}", error);
            AskOutcome::Unanswered { error, skipped }
        }
    };

    Ok(outcome)
}

/// Resolve command-line paths to document files.
///
/// Files are taken as given; directories contribute their `.pdf` and `.txt`
/// files in name order.
pub fn collect_documents(paths: &[PathBuf]) -> AppResult<Vec<PathBuf>> {
    let mut documents = Vec::new();

    for path in paths {
        if path.is_file() {
            documents.push(path.clone());
        } else if path.is_dir() {
            for entry in WalkDir::new(path)
                .follow_links(false)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let entry_path = entry.path();
                if entry_path.is_file() && is_document(entry_path) {
                    documents.push(entry_path.to_path_buf());
                }
            }
        } else {
            return Err(AppError::Extraction(format!(
                "Document not found: {}",
                path.display()
            )));
        }
    }

    tracing::debug!("Collected {} document(s)", documents.len());

    Ok(documents)
}

fn is_document(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            DOCUMENT_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}
