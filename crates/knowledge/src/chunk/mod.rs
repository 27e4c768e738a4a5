//! Chunking of extracted document text.
//!
//! Two strategies are available:
//! - `window`: fixed-size character windows with a fixed overlap
//! - `recursive`: boundary-aware splitting via `text-splitter`
//!
//! Chunks carry their character range, a content hash and, once attributed,
//! the file they came from.

mod metadata;
mod pipeline;
pub mod splitters;

pub use pipeline::{ChunkConfig, ChunkPipeline, ChunkStrategy};

use serde::{Deserialize, Serialize};

/// A contiguous piece of the combined document text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Chunk position in the text (0-indexed)
    pub position: u32,

    /// Chunk text content
    pub text: String,

    /// Metadata about the chunk
    pub metadata: ChunkMetadata,
}

/// Metadata about a chunk's origin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Character range `[start, end)` in the combined text
    pub char_range: (usize, usize),

    /// Character count
    pub char_count: usize,

    /// SHA-256 hash of chunk text
    pub hash: String,

    /// Splitter used ("window" | "text-splitter")
    pub splitter_used: String,

    /// File the middle of the chunk falls in, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Chunk {
    /// Create a new chunk.
    pub fn new(
        position: u32,
        text: String,
        char_range: (usize, usize),
        splitter_used: impl Into<String>,
    ) -> Self {
        let char_count = text.chars().count();
        let hash = metadata::calculate_hash(&text);

        Self {
            position,
            text,
            metadata: ChunkMetadata {
                char_range,
                char_count,
                hash,
                splitter_used: splitter_used.into(),
                source: None,
            },
        }
    }

    /// Attach the originating file name.
    pub fn with_source(mut self, source: Option<String>) -> Self {
        self.metadata.source = source;
        self
    }
}
