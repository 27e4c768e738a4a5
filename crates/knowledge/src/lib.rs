//! Document question answering for askdocs.
//!
//! Stages, in order:
//! - [`extract`]: PDF and text files to one combined string
//! - [`chunk`]: combined text to overlapping chunks
//! - [`embeddings`] and [`vector_index`]: chunks to an in-memory flat index
//! - [`rag`]: retrieval, prompt filling and the LLM call
//!
//! Nothing is persisted; the index is rebuilt for every question.

pub mod chunk;
pub mod embeddings;
pub mod extract;
pub mod rag;
pub mod vector_index;

// Re-export commonly used types
pub use chunk::{Chunk, ChunkConfig, ChunkPipeline, ChunkStrategy};
pub use embeddings::{create_provider, EmbeddingProvider};
pub use extract::{
    extract_texts, extract_texts_best_effort, Extraction, FileKind, SkippedFile, SourceMap,
    UploadedFile,
};
pub use rag::{AnswerError, RagAnswer, RagPipeline, RagSourceRef};
pub use vector_index::{build_index, DistanceMetric, FlatIndex, VectorIndex};
