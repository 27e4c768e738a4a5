//! Embedding providers for chunks and questions.
//!
//! The provider is chosen by the `rag.embedding` settings: `trigram` runs
//! offline and is deterministic, `ollama` calls a local embedding model.

pub mod provider;
pub mod providers;

pub use provider::{create_provider, EmbeddingProvider};
pub use providers::{OllamaProvider, TrigramProvider};
