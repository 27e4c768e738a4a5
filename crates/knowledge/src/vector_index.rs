//! Vector index abstraction for document chunks.
//!
//! The index is in-memory and lives for a single question: it is built from
//! the chunks of the current documents, searched once and dropped.

use crate::chunk::Chunk;
use crate::embeddings::EmbeddingProvider;
use askdocs_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// How vectors are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// Cosine similarity
    #[default]
    Cosine,

    /// Euclidean distance, reported as `1 / (1 + d)`
    L2,
}

impl DistanceMetric {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cosine" => Some(DistanceMetric::Cosine),
            "l2" | "euclidean" => Some(DistanceMetric::L2),
            _ => None,
        }
    }

    /// Similarity score; higher is closer.
    pub fn score(&self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            DistanceMetric::Cosine => {
                let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
                let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
                let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
                if norm_a == 0.0 || norm_b == 0.0 {
                    0.0
                } else {
                    dot / (norm_a * norm_b)
                }
            }
            DistanceMetric::L2 => {
                let distance: f32 = a
                    .iter()
                    .zip(b)
                    .map(|(x, y)| (x - y) * (x - y))
                    .sum::<f32>()
                    .sqrt();
                1.0 / (1.0 + distance)
            }
        }
    }
}

/// Trait for vector index backends.
pub trait VectorIndex: Send + Sync {
    /// Insert a chunk with its embedding.
    fn insert(&mut self, chunk: Chunk, embedding: Vec<f32>) -> AppResult<()>;

    /// Search for the top-k most similar chunks to the query embedding.
    ///
    /// Returns chunks ordered by descending similarity score.
    fn search(&self, query_embedding: &[f32], top_k: usize) -> AppResult<Vec<(Chunk, f32)>>;

    /// Number of indexed chunks.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Exact nearest-neighbour search over every stored vector.
#[derive(Debug)]
pub struct FlatIndex {
    dimensions: usize,
    metric: DistanceMetric,
    entries: Vec<(Chunk, Vec<f32>)>,
}

impl FlatIndex {
    pub fn new(dimensions: usize, metric: DistanceMetric) -> Self {
        Self {
            dimensions,
            metric,
            entries: Vec::new(),
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    fn check_dimensions(&self, vector: &[f32]) -> AppResult<()> {
        if vector.len() != self.dimensions {
            return Err(AppError::Knowledge(format!(
                "Embedding has {} dimensions, index expects {}",
                vector.len(),
                self.dimensions
            )));
        }
        Ok(())
    }
}

impl VectorIndex for FlatIndex {
    fn insert(&mut self, chunk: Chunk, embedding: Vec<f32>) -> AppResult<()> {
        self.check_dimensions(&embedding)?;
        self.entries.push((chunk, embedding));
        Ok(())
    }

    fn search(&self, query_embedding: &[f32], top_k: usize) -> AppResult<Vec<(Chunk, f32)>> {
        self.check_dimensions(query_embedding)?;

        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, (_, embedding))| (i, self.metric.score(query_embedding, embedding)))
            .collect();

        // Stable sort keeps insertion order among equal scores
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        Ok(scored
            .into_iter()
            .take(top_k)
            .map(|(i, score)| (self.entries[i].0.clone(), score))
            .collect())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Embed every chunk and load it into a fresh [`FlatIndex`].
///
/// Returns `None` when there is nothing to index.
pub async fn build_index(
    chunks: Vec<Chunk>,
    provider: &dyn EmbeddingProvider,
    metric: DistanceMetric,
) -> AppResult<Option<FlatIndex>> {
    if chunks.is_empty() {
        tracing::info!("No chunks to index");
        return Ok(None);
    }

    tracing::info!(
        "Indexing {} chunks with {} ({})",
        chunks.len(),
        provider.provider_name(),
        provider.model_name()
    );

    let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
    let embeddings = provider.embed_batch(&texts).await?;

    if embeddings.len() != chunks.len() {
        return Err(AppError::Knowledge(format!(
            "Embedding provider returned {} vectors for {} chunks",
            embeddings.len(),
            chunks.len()
        )));
    }

    let mut index = FlatIndex::new(provider.dimensions(), metric);
    for (chunk, embedding) in chunks.into_iter().zip(embeddings) {
        index.insert(chunk, embedding)?;
    }

    tracing::debug!("Index holds {} vectors", index.len());

    Ok(Some(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::TrigramProvider;

    fn chunk(position: u32, text: &str) -> Chunk {
        Chunk::new(position, text.to_string(), (0, text.chars().count()), "window")
    }

    #[test]
    fn test_cosine_score() {
        let metric = DistanceMetric::Cosine;
        assert!((metric.score(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(metric.score(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert!((metric.score(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-6);
        assert_eq!(metric.score(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_l2_score() {
        let metric = DistanceMetric::L2;
        assert_eq!(metric.score(&[1.0, 2.0], &[1.0, 2.0]), 1.0);
        assert!((metric.score(&[0.0, 0.0], &[3.0, 4.0]) - 1.0 / 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_metric_parse() {
        assert_eq!(DistanceMetric::parse("Cosine"), Some(DistanceMetric::Cosine));
        assert_eq!(DistanceMetric::parse("l2"), Some(DistanceMetric::L2));
        assert_eq!(DistanceMetric::parse("dot"), None);
    }

    #[test]
    fn test_search_orders_by_score() {
        let mut index = FlatIndex::new(2, DistanceMetric::Cosine);
        index.insert(chunk(0, "east"), vec![1.0, 0.0]).unwrap();
        index.insert(chunk(1, "north"), vec![0.0, 1.0]).unwrap();
        index.insert(chunk(2, "north-east"), vec![1.0, 1.0]).unwrap();

        let results = index.search(&[0.0, 1.0], 2).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0.text, "north");
        assert_eq!(results[1].0.text, "north-east");
        assert!(results[0].1 >= results[1].1);
    }

    #[test]
    fn test_search_ties_keep_insertion_order() {
        let mut index = FlatIndex::new(2, DistanceMetric::Cosine);
        for i in 0..4 {
            index.insert(chunk(i, "same"), vec![1.0, 0.0]).unwrap();
        }

        let positions: Vec<u32> = index
            .search(&[1.0, 0.0], 3)
            .unwrap()
            .iter()
            .map(|(c, _)| c.position)
            .collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn test_top_k_larger_than_index() {
        let mut index = FlatIndex::new(2, DistanceMetric::L2);
        index.insert(chunk(0, "only"), vec![1.0, 0.0]).unwrap();

        assert_eq!(index.search(&[1.0, 0.0], 3).unwrap().len(), 1);
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut index = FlatIndex::new(3, DistanceMetric::Cosine);
        assert!(index.insert(chunk(0, "short"), vec![1.0, 0.0]).is_err());
        assert!(index.search(&[1.0, 0.0], 1).is_err());
    }

    #[tokio::test]
    async fn test_build_index_empty() {
        let provider = TrigramProvider::new(384);
        let index = build_index(Vec::new(), &provider, DistanceMetric::Cosine)
            .await
            .unwrap();
        assert!(index.is_none());
    }

    #[tokio::test]
    async fn test_build_index_size_matches_chunks() {
        let provider = TrigramProvider::new(384);
        let chunks = vec![
            chunk(0, "The quick brown fox jumps over the lazy dog."),
            chunk(1, "Rust compiles to native code."),
            chunk(2, "Bread needs flour, water and yeast."),
        ];

        let index = build_index(chunks, &provider, DistanceMetric::Cosine)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(index.dimensions(), 384);

        let query = provider.embed("What does the fox do?").await.unwrap();
        let results = index.search(&query, 1).unwrap();
        assert_eq!(results[0].0.position, 0);
    }
}
