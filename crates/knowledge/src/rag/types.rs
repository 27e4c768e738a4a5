//! RAG response and error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message shown when the language model cannot be reached or configured.
pub const QA_CHAIN_UNAVAILABLE: &str = "Could not initialize the QA chain. Ensure you have a valid Gemini API key and internet connection.";

/// Why a question could not be answered.
///
/// The display strings are what the user sees; underlying causes are kept
/// in the variants for logging only.
#[derive(Error, Debug)]
pub enum AnswerError {
    /// The documents produced no chunks to index
    #[error("Could not create vector store.")]
    IndexEmpty,

    /// Embedding or indexing failed
    #[error("Failed to build vector index: {0}")]
    IndexBuild(String),

    /// The provider needs an API key that is not configured
    #[error("{}", QA_CHAIN_UNAVAILABLE)]
    MissingCredential { variable: String },

    /// The LLM client could not be created
    #[error("{}", QA_CHAIN_UNAVAILABLE)]
    LlmUnavailable { reason: String },

    /// Retrieval, prompting or the completion call failed
    #[error("An error occurred while trying to answer the question.")]
    InvocationFailed { reason: String },
}

impl AnswerError {
    /// Underlying cause, when there is one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            AnswerError::IndexEmpty => None,
            AnswerError::IndexBuild(reason) => Some(reason.as_str()),
            AnswerError::MissingCredential { variable } => Some(variable.as_str()),
            AnswerError::LlmUnavailable { reason } | AnswerError::InvocationFailed { reason } => {
                Some(reason.as_str())
            }
        }
    }
}

/// A single source reference used to answer a question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagSourceRef {
    /// File the chunk came from, or "document" when unknown
    pub source: String,

    /// Human-readable location within the combined text
    /// Example: "chunk 2, characters 900-1400"
    pub location: String,

    /// Short snippet of the chunk (truncated if needed)
    pub snippet: String,
}

/// Answer to a question over the uploaded documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagAnswer {
    /// Text returned by the language model, unmodified
    pub answer: String,

    /// Chunks placed in the prompt, in retrieval order
    pub sources: Vec<RagSourceRef>,

    /// Highest similarity score from vector search
    #[serde(rename = "maxScore")]
    pub max_score: f32,
}

impl RagAnswer {
    pub fn new(answer: String, sources: Vec<RagSourceRef>, max_score: f32) -> Self {
        Self {
            answer,
            sources,
            max_score,
        }
    }
}
