//! Chunking pipeline orchestrator.

use super::{
    splitters::{ChunkSplitter, TextSplitter, WindowSplitter},
    Chunk,
};
use askdocs_core::{AppError, AppResult, RagSettings};
use serde::{Deserialize, Serialize};

/// How text is cut into chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkStrategy {
    /// Fixed character windows
    #[default]
    Window,

    /// Boundary-aware splitting
    Recursive,
}

impl ChunkStrategy {
    /// Parse a strategy name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "window" => Some(ChunkStrategy::Window),
            "recursive" => Some(ChunkStrategy::Recursive),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkStrategy::Window => "window",
            ChunkStrategy::Recursive => "recursive",
        }
    }
}

/// Configuration for chunking pipeline.
#[derive(Debug, Clone)]
pub struct ChunkConfig {
    /// Maximum chunk size in characters
    pub chunk_size: usize,

    /// Characters shared by consecutive chunks
    pub chunk_overlap: usize,

    /// Splitting strategy
    pub strategy: ChunkStrategy,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 50,
            strategy: ChunkStrategy::Window,
        }
    }
}

impl ChunkConfig {
    /// Create a validated window configuration.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> AppResult<Self> {
        let config = Self {
            chunk_size,
            chunk_overlap,
            strategy: ChunkStrategy::Window,
        };
        config.validate()?;
        Ok(config)
    }

    /// Use a different strategy.
    pub fn with_strategy(mut self, strategy: ChunkStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Build a configuration from the `rag` settings section.
    pub fn from_settings(settings: &RagSettings) -> AppResult<Self> {
        let strategy = ChunkStrategy::parse(&settings.strategy).ok_or_else(|| {
            AppError::Config(format!(
                "Unknown chunking strategy: '{}'. Supported: window, recursive",
                settings.strategy
            ))
        })?;

        Ok(Self::new(settings.chunk_size, settings.chunk_overlap)?.with_strategy(strategy))
    }

    /// Check that the window advances.
    pub fn validate(&self) -> AppResult<()> {
        if self.chunk_size == 0 {
            return Err(AppError::Config(
                "Chunk size must be greater than zero".to_string(),
            ));
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err(AppError::Config(format!(
                "Chunk overlap ({}) must be smaller than chunk size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }

        Ok(())
    }
}

/// Chunking pipeline.
pub struct ChunkPipeline {
    config: ChunkConfig,
}

impl ChunkPipeline {
    /// Create a new pipeline with configuration.
    pub fn new(config: ChunkConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }

    /// Split text into chunks with the configured strategy.
    pub fn process(&self, text: &str) -> AppResult<Vec<Chunk>> {
        let splitter = self.dispatch_splitter();
        let chunks = splitter.split(text, &self.config)?;

        tracing::info!(
            "Chunking complete: {} chunks created from {} bytes ({})",
            chunks.len(),
            text.len(),
            self.config.strategy.as_str()
        );

        Ok(chunks)
    }

    fn dispatch_splitter(&self) -> Box<dyn ChunkSplitter> {
        match self.config.strategy {
            ChunkStrategy::Window => Box::new(WindowSplitter),
            ChunkStrategy::Recursive => Box::new(TextSplitter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        assert!(ChunkConfig::new(500, 50).is_ok());
        assert!(ChunkConfig::new(0, 0).is_err());
        assert!(ChunkConfig::new(50, 50).is_err());
        assert!(ChunkConfig::new(50, 80).is_err());
    }

    #[test]
    fn test_config_from_settings() {
        let mut settings = RagSettings::default();
        let config = ChunkConfig::from_settings(&settings).unwrap();
        assert_eq!(config.chunk_size, 500);
        assert_eq!(config.chunk_overlap, 50);
        assert_eq!(config.strategy, ChunkStrategy::Window);

        settings.strategy = "Recursive".to_string();
        let config = ChunkConfig::from_settings(&settings).unwrap();
        assert_eq!(config.strategy, ChunkStrategy::Recursive);

        settings.strategy = "semantic".to_string();
        assert!(ChunkConfig::from_settings(&settings).is_err());
    }

    #[test]
    fn test_pipeline_window() {
        let pipeline = ChunkPipeline::new(ChunkConfig::default());
        let text = "This is a test document. ".repeat(100);

        let chunks = pipeline.process(&text).unwrap();
        assert_eq!(chunks.len(), 6);
        assert!(chunks.iter().all(|c| c.metadata.splitter_used == "window"));
    }

    #[test]
    fn test_pipeline_recursive() {
        let config = ChunkConfig::default().with_strategy(ChunkStrategy::Recursive);
        let pipeline = ChunkPipeline::new(config);
        let text = "This is a test document. ".repeat(100);

        let chunks = pipeline.process(&text).unwrap();
        assert!(chunks.len() > 1);
        assert!(chunks
            .iter()
            .all(|c| c.metadata.splitter_used == "text-splitter"));
    }

    #[test]
    fn test_pipeline_utf8_safety() {
        let pipeline = ChunkPipeline::new(ChunkConfig::new(37, 5).unwrap());
        let text = "Acentuação: ã, õ, ç. Emoji: 🚀 🎯 💡. ".repeat(20);

        let chunks = pipeline.process(&text).unwrap();
        assert!(!chunks.is_empty());
        for chunk in &chunks {
            assert!(chunk.metadata.char_count <= 37);
        }
    }
}
