//! askdocs core library
//!
//! This crate provides the foundational utilities shared by the askdocs crates:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration management

pub mod config;
pub mod error;
pub mod logging;
pub mod provider;

// Re-export commonly used types
pub use config::{AppConfig, EmbeddingSettings, RagSettings};
pub use error::{AppError, AppResult};
pub use provider::ProviderType;
