//! Command handlers for the askdocs CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod about;
pub mod ask;
pub mod chat;

// Re-export command types for convenience
pub use about::AboutCommand;
pub use ask::AskCommand;
pub use chat::ChatCommand;

#[cfg(test)]
pub(crate) mod test_support {
    use askdocs_core::{AppConfig, AppResult};
    use askdocs_knowledge::RagPipeline;
    use askdocs_llm::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
    use askdocs_prompt::PromptDefinition;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// LLM client returning a fixed reply and counting calls.
    pub struct StubClient {
        reply: String,
        calls: AtomicUsize,
    }

    impl StubClient {
        pub fn answering(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.to_string(),
                calls: AtomicUsize::new(0),
            })
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl LlmClient for StubClient {
        fn provider_name(&self) -> &str {
            "stub"
        }

        async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(LlmResponse {
                content: self.reply.clone(),
                model: request.model.clone(),
                usage: LlmUsage::new(10, 5),
            })
        }
    }

    /// Default pipeline wired to the stub client.
    pub fn stub_pipeline(client: Arc<StubClient>) -> RagPipeline {
        RagPipeline::from_config(&AppConfig::default(), PromptDefinition::builtin())
            .unwrap()
            .with_llm_client(client)
    }
}
