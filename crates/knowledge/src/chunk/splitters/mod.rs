//! Splitter implementations wrapper module.

mod text;
mod window;

pub use text::TextSplitter;
pub use window::WindowSplitter;

use crate::chunk::{Chunk, ChunkConfig};
use askdocs_core::AppResult;

/// Trait for chunk splitters.
pub trait ChunkSplitter {
    /// Split text into chunks.
    fn split(&self, text: &str, config: &ChunkConfig) -> AppResult<Vec<Chunk>>;
}
