//! RAG (Retrieval-Augmented Generation) answering.
//!
//! Turns extracted document text and a question into a single LLM answer.

pub mod ask;
pub mod types;

pub use ask::{ModelSettings, RagPipeline};
pub use types::{AnswerError, RagAnswer, RagSourceRef, QA_CHAIN_UNAVAILABLE};
