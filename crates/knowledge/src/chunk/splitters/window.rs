//! Fixed-size character window splitter.

use super::ChunkSplitter;
use crate::chunk::{Chunk, ChunkConfig};
use askdocs_core::AppResult;

/// Splits text into windows of `chunk_size` characters, each starting
/// `chunk_size - chunk_overlap` characters after the previous one.
///
/// The final window ends exactly at the end of the text, so for a text of
/// `L > 0` characters there are `max(1, ceil((L - O) / (C - O)))` chunks.
pub struct WindowSplitter;

impl ChunkSplitter for WindowSplitter {
    fn split(&self, text: &str, config: &ChunkConfig) -> AppResult<Vec<Chunk>> {
        config.validate()?;

        // Byte offset of every character, plus the end of the text
        let boundaries: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        let total = boundaries.len() - 1;

        let mut chunks = Vec::new();
        if total == 0 {
            return Ok(chunks);
        }

        let mut start = 0usize;
        loop {
            let end = (start + config.chunk_size).min(total);
            let slice = &text[boundaries[start]..boundaries[end]];
            chunks.push(Chunk::new(
                chunks.len() as u32,
                slice.to_string(),
                (start, end),
                "window",
            ));

            if end == total {
                break;
            }
            start = end - config.chunk_overlap;
        }

        tracing::debug!(
            "Window splitter created {} chunks from {} characters",
            chunks.len(),
            total
        );

        Ok(chunks)
    }
}
