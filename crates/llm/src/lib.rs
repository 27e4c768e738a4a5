//! LLM integration crate for askdocs.
//!
//! This crate provides a provider-agnostic abstraction for sending a fully
//! formed prompt to a Large Language Model and reading back its text.
//!
//! # Providers
//! - **Gemini**: hosted Google Generative Language API (default)
//! - **Ollama**: local LLM runtime
//!
//! # Example
//! ```no_run
//! use askdocs_llm::{LlmClient, LlmRequest, providers::GeminiClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GeminiClient::new("api-key")?;
//! let request = LlmRequest::new("Hello, world!", "models/gemini-1.5-pro-latest")
//!     .with_temperature(0.7);
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;

// Re-export main types
pub use askdocs_core::ProviderType;
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use providers::{GeminiClient, OllamaClient};
