//! RAG answering orchestration.
//!
//! Each question rebuilds the index from the given text, retrieves the top-k
//! chunks, fills the prompt and makes one completion call.

use crate::chunk::{Chunk, ChunkConfig, ChunkPipeline};
use crate::embeddings::{create_provider, EmbeddingProvider};
use crate::extract::SourceMap;
use crate::rag::types::{AnswerError, RagAnswer, RagSourceRef};
use crate::vector_index::{build_index, DistanceMetric, FlatIndex, VectorIndex};
use askdocs_core::{AppConfig, AppError, AppResult};
use askdocs_llm::{create_client, LlmClient, LlmRequest};
use askdocs_prompt::{build_prompt, PromptDefinition};
use std::collections::HashMap;
use std::sync::Arc;

/// Maximum snippet length for source references, in characters.
const MAX_SNIPPET_LENGTH: usize = 150;

/// Separator between retrieved chunks in the prompt context.
const CONTEXT_SEPARATOR: &str = "\n\n";

/// Language model settings used for the completion call.
#[derive(Debug, Clone)]
pub struct ModelSettings {
    pub provider: String,
    pub model: String,
    pub endpoint: Option<String>,
    pub temperature: f32,
    pub api_key: Option<String>,
    pub api_key_env: String,
}

impl ModelSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            provider: config.provider.clone(),
            model: config.model.clone(),
            endpoint: config.endpoint.clone(),
            temperature: config.temperature,
            api_key: config.api_key.clone(),
            api_key_env: config.api_key_env.clone(),
        }
    }
}

/// Question answering over a block of document text.
pub struct RagPipeline {
    chunker: ChunkPipeline,
    embedder: Arc<dyn EmbeddingProvider>,
    metric: DistanceMetric,
    top_k: usize,
    prompt: PromptDefinition,
    model: ModelSettings,
    client: Option<Arc<dyn LlmClient>>,
}

impl RagPipeline {
    /// Create a pipeline from application configuration.
    ///
    /// The LLM client is not created here; that happens per question, after
    /// the index is built.
    pub fn from_config(config: &AppConfig, prompt: PromptDefinition) -> AppResult<Self> {
        let chunk_config = ChunkConfig::from_settings(&config.rag)?;
        let metric = DistanceMetric::parse(&config.rag.metric).ok_or_else(|| {
            AppError::Config(format!(
                "Unknown similarity metric: '{}'. Supported: cosine, l2",
                config.rag.metric
            ))
        })?;
        if config.rag.top_k == 0 {
            return Err(AppError::Config(
                "topK must be greater than zero".to_string(),
            ));
        }
        let embedder = create_provider(&config.rag.embedding)?;

        Ok(Self {
            chunker: ChunkPipeline::new(chunk_config),
            embedder,
            metric,
            top_k: config.rag.top_k,
            prompt,
            model: ModelSettings::from_config(config),
            client: None,
        })
    }

    /// Use a ready-made LLM client instead of creating one per question.
    pub fn with_llm_client(mut self, client: Arc<dyn LlmClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Use a different embedding provider.
    pub fn with_embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = embedder;
        self
    }

    /// Override how many chunks are placed in the context.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Answer `question` using only `text` as the knowledge source.
    pub async fn answer(&self, text: &str, question: &str) -> Result<RagAnswer, AnswerError> {
        tracing::info!(
            "Answering question over {} characters of text",
            text.chars().count()
        );

        let index = self.index_text(text).await?;
        let client = self.llm_client()?;

        tracing::info!("Querying top {} chunks", self.top_k);

        let hits = self
            .retrieve(&index, question)
            .await
            .map_err(invocation_failed)?;

        let max_score = hits.first().map(|(_, score)| *score).unwrap_or(0.0);
        tracing::debug!(
            "Retrieved {} chunks, scores: {:?}",
            hits.len(),
            hits.iter().map(|(_, s)| *s).collect::<Vec<_>>()
        );

        let context = build_context(&hits);

        let mut variables = HashMap::new();
        variables.insert("context".to_string(), context);
        variables.insert("question".to_string(), question.to_string());
        let prompt = build_prompt(&self.prompt, variables).map_err(invocation_failed)?;

        let mut request =
            LlmRequest::new(prompt.user, &self.model.model).with_temperature(self.model.temperature);
        if let Some(system) = prompt.system {
            request = request.with_system(system);
        }

        let response = client
            .complete(&request)
            .await
            .map_err(completion_failed)?;

        tracing::info!(
            "Answer received ({} prompt tokens, {} completion tokens)",
            response.usage.prompt_tokens,
            response.usage.completion_tokens
        );

        let sources = hits.iter().map(|(chunk, _)| source_ref(chunk)).collect();

        Ok(RagAnswer::new(response.content, sources, max_score))
    }

    /// Chunk, attribute and embed the text into a fresh index.
    async fn index_text(&self, text: &str) -> Result<FlatIndex, AnswerError> {
        let source_map = SourceMap::from_combined(text);

        let chunks: Vec<Chunk> = self
            .chunker
            .process(text)
            .map_err(index_build_failed)?
            .into_iter()
            .map(|chunk| {
                let source = source_map
                    .source_for(chunk.metadata.char_range)
                    .map(str::to_string);
                chunk.with_source(source)
            })
            .collect();

        match build_index(chunks, self.embedder.as_ref(), self.metric).await {
            Ok(Some(index)) => Ok(index),
            Ok(None) => {
                tracing::warn!("Extracted text is empty, no vector index created");
                Err(AnswerError::IndexEmpty)
            }
            Err(e) => Err(index_build_failed(e)),
        }
    }

    fn llm_client(&self) -> Result<Arc<dyn LlmClient>, AnswerError> {
        if let Some(client) = &self.client {
            return Ok(Arc::clone(client));
        }

        create_client(
            &self.model.provider,
            self.model.endpoint.as_deref(),
            self.model.api_key.as_deref(),
            &self.model.api_key_env,
        )
        .map_err(|e| match e {
            AppError::MissingCredential(variable) => {
                tracing::error!("Cannot create LLM client: {} is not set", variable);
                AnswerError::MissingCredential { variable }
            }
            other => {
                tracing::error!("Cannot create LLM client: {}", other);
                AnswerError::LlmUnavailable {
                    reason: other.to_string(),
                }
            }
        })
    }

    async fn retrieve(&self, index: &FlatIndex, question: &str) -> AppResult<Vec<(Chunk, f32)>> {
        let query = self.embedder.embed(question).await?;
        index.search(&query, self.top_k)
    }
}

fn index_build_failed(e: AppError) -> AnswerError {
    tracing::error!("Failed to build vector index: {}", e);
    AnswerError::IndexBuild(e.to_string())
}

fn invocation_failed(e: AppError) -> AnswerError {
    tracing::error!("Question answering failed: {}", e);
    AnswerError::InvocationFailed {
        reason: e.to_string(),
    }
}

/// An unreachable model or a rejected key counts as an unavailable chain.
fn completion_failed(e: AppError) -> AnswerError {
    match e {
        AppError::LlmUnavailable(reason) => {
            tracing::error!("LLM unavailable: {}", reason);
            AnswerError::LlmUnavailable { reason }
        }
        other => invocation_failed(other),
    }
}

/// Join retrieved chunk texts into the prompt context.
fn build_context(hits: &[(Chunk, f32)]) -> String {
    hits.iter()
        .map(|(chunk, _)| chunk.text.as_str())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}

fn source_ref(chunk: &Chunk) -> RagSourceRef {
    let (start, end) = chunk.metadata.char_range;
    RagSourceRef {
        source: chunk
            .metadata
            .source
            .clone()
            .unwrap_or_else(|| "document".to_string()),
        location: format!("chunk {}, characters {}-{}", chunk.position, start, end),
        snippet: truncate_snippet(chunk.text.trim(), MAX_SNIPPET_LENGTH),
    }
}

/// Truncate to at most `max_chars` characters, preferring a word boundary.
fn truncate_snippet(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((cut, _)) => {
            let truncated = &text[..cut];
            match truncated.rfind(char::is_whitespace) {
                Some(last_space) if last_space > 0 => format!("{}...", &truncated[..last_space]),
                _ => format!("{}...", truncated),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{extract_texts, UploadedFile};
    use crate::rag::types::QA_CHAIN_UNAVAILABLE;
    use askdocs_llm::{LlmResponse, LlmUsage};
    use std::sync::Mutex;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Returns a fixed answer and remembers the last request.
    struct StubClient {
        reply: Result<String, String>,
        last_request: Mutex<Option<LlmRequest>>,
    }

    impl StubClient {
        fn answering(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                last_request: Mutex::new(None),
            })
        }

        fn failing(reason: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(reason.to_string()),
                last_request: Mutex::new(None),
            })
        }

        fn last_request(&self) -> LlmRequest {
            self.last_request.lock().unwrap().clone().unwrap()
        }
    }

    #[async_trait::async_trait]
    impl LlmClient for StubClient {
        fn provider_name(&self) -> &str {
            "stub"
        }

        async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
            *self.last_request.lock().unwrap() = Some(request.clone());
            match &self.reply {
                Ok(text) => Ok(LlmResponse {
                    content: text.clone(),
                    model: request.model.clone(),
                    usage: LlmUsage::new(10, 5),
                }),
                Err(reason) => Err(AppError::Llm(reason.clone())),
            }
        }
    }

    fn pipeline(config: &AppConfig) -> RagPipeline {
        RagPipeline::from_config(config, PromptDefinition::builtin()).unwrap()
    }

    #[tokio::test]
    async fn test_fox_round_trip() {
        let client = StubClient::answering("The fox jumps over the lazy dog.");
        let rag = pipeline(&AppConfig::default()).with_llm_client(client.clone());

        let text = extract_texts(&[UploadedFile::new(
            "fox.txt",
            "The quick brown fox jumps over the lazy dog.",
        )])
        .unwrap();

        let answer = rag.answer(&text, "What does the fox do?").await.unwrap();
        assert_eq!(answer.answer, "The fox jumps over the lazy dog.");
        assert_eq!(answer.sources.len(), 1);
        assert_eq!(answer.sources[0].source, "fox.txt");

        let request = client.last_request();
        assert!(request
            .prompt
            .contains("The quick brown fox jumps over the lazy dog."));
        assert!(request.prompt.contains("Question: What does the fox do?"));
        assert!(request.prompt.starts_with("You are an AI assistant"));
        assert_eq!(request.model, "models/gemini-1.5-pro-latest");
        assert_eq!(request.temperature, Some(0.7));
    }

    #[tokio::test]
    async fn test_most_relevant_chunk_first() {
        let mut config = AppConfig::default();
        config.rag.chunk_size = 80;
        config.rag.chunk_overlap = 10;

        let client = StubClient::answering("It jumps.");
        let rag = pipeline(&config).with_llm_client(client.clone());

        let text = extract_texts(&[
            UploadedFile::new(
                "rust.txt",
                "Rust compiles to native code. Cargo builds crates quickly.",
            ),
            UploadedFile::new(
                "bread.txt",
                "Bread needs flour, water and yeast. Ovens bake loaves.",
            ),
            UploadedFile::new("fox.txt", "The quick brown fox jumps over the lazy dog."),
        ])
        .unwrap();

        let answer = rag.answer(&text, "What does the fox do?").await.unwrap();
        assert_eq!(answer.sources.len(), 3);
        assert_eq!(answer.sources[0].source, "fox.txt");
        assert!(answer.sources[0].snippet.contains("quick brown fox"));
        assert!(answer.max_score > 0.0);

        // The best chunk opens the context block
        let prompt = client.last_request().prompt;
        let context_start = prompt.find("Context:\n").unwrap();
        let fox = prompt.find("The quick brown fox").unwrap();
        let rust = prompt.find("Rust compiles").unwrap();
        assert!(context_start < fox && fox < rust);
    }

    #[tokio::test]
    async fn test_top_k_limits_context() {
        let mut config = AppConfig::default();
        config.rag.chunk_size = 80;
        config.rag.chunk_overlap = 10;

        let client = StubClient::answering("ok");
        let rag = pipeline(&config)
            .with_llm_client(client.clone())
            .with_top_k(1);

        let text = "word ".repeat(100);
        let answer = rag.answer(&text, "word?").await.unwrap();
        assert_eq!(answer.sources.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_text_has_no_index() {
        let client = StubClient::answering("unused");
        let rag = pipeline(&AppConfig::default()).with_llm_client(client.clone());

        let err = rag.answer("", "Anything?").await.unwrap_err();
        assert!(matches!(err, AnswerError::IndexEmpty));
        assert_eq!(err.to_string(), "Could not create vector store.");
        assert!(client.last_request.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_credential_message() {
        let config = AppConfig {
            api_key: None,
            ..AppConfig::default()
        };
        let rag = pipeline(&config);

        let err = rag.answer("Some text.", "Question?").await.unwrap_err();
        assert!(matches!(err, AnswerError::MissingCredential { .. }));
        assert_eq!(
            err.to_string(),
            "Could not initialize the QA chain. Ensure you have a valid Gemini API key and internet connection."
        );
    }

    #[tokio::test]
    async fn test_unknown_provider_is_unavailable() {
        let config = AppConfig {
            provider: "nonexistent".to_string(),
            ..AppConfig::default()
        };
        let rag = pipeline(&config);

        let err = rag.answer("Some text.", "Question?").await.unwrap_err();
        assert!(matches!(err, AnswerError::LlmUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_missing_credential_names_configured_variable() {
        let config = AppConfig {
            api_key_env: "MY_GEMINI_KEY".to_string(),
            ..AppConfig::default()
        };
        let rag = pipeline(&config);

        match rag.answer("Some text.", "Question?").await {
            Err(AnswerError::MissingCredential { variable }) => {
                assert_eq!(variable, "MY_GEMINI_KEY")
            }
            other => panic!("Expected missing credential, got {:?}", other.map(|a| a.answer)),
        }
    }

    fn fox_text() -> String {
        extract_texts(&[UploadedFile::new(
            "fox.txt",
            "The quick brown fox jumps over the lazy dog.",
        )])
        .unwrap()
    }

    #[tokio::test]
    async fn test_rejected_key_reports_unavailable_chain() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_string("API key not valid. Please pass a valid API key."),
            )
            .expect(1)
            .mount(&server)
            .await;

        let config = AppConfig {
            endpoint: Some(server.uri()),
            api_key: Some("bad-key".to_string()),
            ..AppConfig::default()
        };
        let rag = pipeline(&config);

        let err = rag
            .answer(&fox_text(), "What does the fox do?")
            .await
            .unwrap_err();
        assert!(matches!(err, AnswerError::LlmUnavailable { .. }));
        assert_eq!(err.to_string(), QA_CHAIN_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_unreachable_host_reports_unavailable_chain() {
        let config = AppConfig {
            endpoint: Some("http://127.0.0.1:1".to_string()),
            api_key: Some("test-key".to_string()),
            ..AppConfig::default()
        };
        let rag = pipeline(&config);

        let err = rag
            .answer(&fox_text(), "What does the fox do?")
            .await
            .unwrap_err();
        assert!(matches!(err, AnswerError::LlmUnavailable { .. }));
        assert_eq!(err.to_string(), QA_CHAIN_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_server_error_is_invocation_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
            .mount(&server)
            .await;

        let config = AppConfig {
            endpoint: Some(server.uri()),
            api_key: Some("test-key".to_string()),
            ..AppConfig::default()
        };
        let rag = pipeline(&config);

        let err = rag
            .answer(&fox_text(), "What does the fox do?")
            .await
            .unwrap_err();
        assert!(matches!(err, AnswerError::InvocationFailed { .. }));
        assert_eq!(
            err.to_string(),
            "An error occurred while trying to answer the question."
        );
    }

    #[tokio::test]
    async fn test_invocation_failure_message() {
        let client = StubClient::failing("HTTP 503 from upstream");
        let rag = pipeline(&AppConfig::default()).with_llm_client(client);

        let err = rag.answer("Some text.", "Question?").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "An error occurred while trying to answer the question."
        );
        assert_eq!(err.detail(), Some("LLM error: HTTP 503 from upstream"));
    }

    #[tokio::test]
    async fn test_answer_is_returned_verbatim() {
        let raw = "  I don't know.\n\n(no context)  ";
        let client = StubClient::answering(raw);
        let rag = pipeline(&AppConfig::default()).with_llm_client(client);

        let answer = rag.answer("Unrelated text.", "Question?").await.unwrap();
        assert_eq!(answer.answer, raw);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let mut config = AppConfig::default();
        config.rag.metric = "dot".to_string();
        assert!(RagPipeline::from_config(&config, PromptDefinition::builtin()).is_err());

        let mut config = AppConfig::default();
        config.rag.chunk_overlap = config.rag.chunk_size;
        assert!(RagPipeline::from_config(&config, PromptDefinition::builtin()).is_err());

        let mut config = AppConfig::default();
        config.rag.top_k = 0;
        assert!(RagPipeline::from_config(&config, PromptDefinition::builtin()).is_err());
    }

    #[test]
    fn test_build_context() {
        let hits = vec![
            (Chunk::new(0, "First chunk".to_string(), (0, 11), "window"), 0.9),
            (Chunk::new(1, "Second chunk".to_string(), (11, 23), "window"), 0.5),
        ];
        assert_eq!(build_context(&hits), "First chunk\n\nSecond chunk");
    }

    #[test]
    fn test_truncate_snippet() {
        assert_eq!(truncate_snippet("Short text", 100), "Short text");

        let long = "This is a very long text that needs to be truncated at some point";
        let result = truncate_snippet(long, 30);
        assert_eq!(result, "This is a very long text that...");

        let accented = "é".repeat(40);
        assert_eq!(truncate_snippet(&accented, 10), format!("{}...", "é".repeat(10)));
    }
}
