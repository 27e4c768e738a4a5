//! Boundary-aware splitter using the text-splitter crate.

use super::ChunkSplitter;
use crate::chunk::{Chunk, ChunkConfig};
use askdocs_core::{AppError, AppResult};
use text_splitter::{ChunkConfig as SplitterConfig, TextSplitter as ExternalTextSplitter};

/// Prefers paragraph, sentence and word boundaries over hard character cuts.
pub struct TextSplitter;

impl ChunkSplitter for TextSplitter {
    fn split(&self, text: &str, config: &ChunkConfig) -> AppResult<Vec<Chunk>> {
        config.validate()?;

        let splitter_config = SplitterConfig::new(config.chunk_size)
            .with_overlap(config.chunk_overlap)
            .map_err(|e| AppError::Knowledge(format!("Invalid splitter configuration: {}", e)))?;
        let splitter = ExternalTextSplitter::new(splitter_config);

        let mut chunks = Vec::new();

        // chunk_indices yields ascending byte offsets; track the matching char offset
        let mut byte_cursor = 0usize;
        let mut char_cursor = 0usize;

        for (byte_offset, chunk_text) in splitter.chunk_indices(text) {
            if chunk_text.trim().is_empty() {
                continue;
            }

            char_cursor += text[byte_cursor..byte_offset].chars().count();
            byte_cursor = byte_offset;

            let char_count = chunk_text.chars().count();
            chunks.push(Chunk::new(
                chunks.len() as u32,
                chunk_text.to_string(),
                (char_cursor, char_cursor + char_count),
                "text-splitter",
            ));
        }

        tracing::debug!(
            "Text splitter created {} chunks from {} bytes",
            chunks.len(),
            text.len()
        );

        Ok(chunks)
    }
}
