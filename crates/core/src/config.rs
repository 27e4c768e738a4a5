//! Configuration management for askdocs.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Built-in defaults
//! - Config file (`.askdocs/config.yaml` or `--config`)
//! - Environment variables
//! - Command-line flags
//!
//! Later sources override earlier ones.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};
use crate::logging::LogFormat;
use crate::provider::ProviderType;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Workspace root (may contain `.askdocs/`)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// LLM provider (see [`ProviderType`])
    pub provider: String,

    /// Model identifier sent to the provider
    pub model: String,

    /// Custom provider endpoint
    pub endpoint: Option<String>,

    /// Sampling temperature for answers
    pub temperature: f32,

    /// Name of the environment variable holding the provider API key
    pub api_key_env: String,

    /// Resolved API key
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Log level override
    pub log_level: Option<String>,

    /// Log output format ("pretty" or "json")
    pub log_format: String,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Retrieval settings
    pub rag: RagSettings,
}

/// Chunking, embedding and retrieval settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RagSettings {
    /// Maximum chunk length in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Characters shared between neighbouring chunks
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Number of chunks placed in the prompt context
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Chunking strategy ("window" or "recursive")
    #[serde(default = "default_strategy")]
    pub strategy: String,

    /// Similarity metric ("cosine" or "l2")
    #[serde(default = "default_metric")]
    pub metric: String,

    /// Embedding provider settings
    #[serde(default)]
    pub embedding: EmbeddingSettings,
}

/// Embedding provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddingSettings {
    /// Provider name ("trigram" or "ollama")
    #[serde(default = "default_embedding_provider")]
    pub provider: String,

    /// Model identifier (provider-specific)
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Embedding vector dimensions
    #[serde(default = "default_embedding_dimensions")]
    pub dimensions: usize,

    /// Custom endpoint for HTTP providers
    #[serde(default)]
    pub endpoint: Option<String>,
}

fn default_chunk_size() -> usize {
    500
}

fn default_chunk_overlap() -> usize {
    50
}

fn default_top_k() -> usize {
    3
}

fn default_strategy() -> String {
    "window".to_string()
}

fn default_metric() -> String {
    "cosine".to_string()
}

fn default_embedding_provider() -> String {
    "trigram".to_string()
}

fn default_embedding_model() -> String {
    "trigram-v1".to_string()
}

fn default_embedding_dimensions() -> usize {
    384
}

impl Default for RagSettings {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            top_k: default_top_k(),
            strategy: default_strategy(),
            metric: default_metric(),
            embedding: EmbeddingSettings::default(),
        }
    }
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            model: default_embedding_model(),
            dimensions: default_embedding_dimensions(),
            endpoint: None,
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmSection>,
    rag: Option<RagSettings>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LlmSection {
    provider: Option<String>,
    model: Option<String>,
    endpoint: Option<String>,
    temperature: Option<f32>,
    api_key_env: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
    format: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            provider: ProviderType::Gemini.as_str().to_string(),
            model: ProviderType::Gemini.default_model().to_string(),
            endpoint: None,
            temperature: 0.7,
            api_key_env: "GEMINI_API_KEY".to_string(),
            api_key: None,
            log_level: None,
            log_format: "pretty".to_string(),
            verbose: false,
            no_color: false,
            rag: RagSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the YAML config file and environment.
    ///
    /// Environment variables:
    /// - `ASKDOCS_WORKSPACE`: Workspace path (when `workspace` is `None`)
    /// - `ASKDOCS_CONFIG`: Config file (when `config_file` is `None`)
    /// - `ASKDOCS_PROVIDER`: LLM provider
    /// - `ASKDOCS_MODEL`: Model identifier
    /// - `ASKDOCS_API_KEY`: API key, checked before the provider variable
    /// - `GEMINI_API_KEY` (or the configured `apiKeyEnv`): API key
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use askdocs_core::config::AppConfig;
    ///
    /// let config = AppConfig::load(None, None).expect("Failed to load config");
    /// println!("Provider: {}", config.provider);
    /// ```
    pub fn load(workspace: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(workspace) =
            workspace.or_else(|| std::env::var("ASKDOCS_WORKSPACE").ok().map(PathBuf::from))
        {
            config.workspace = workspace;
        }

        config.config_file =
            config_file.or_else(|| std::env::var("ASKDOCS_CONFIG").ok().map(PathBuf::from));

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = match config.config_file {
            Some(ref cf) => cf.clone(),
            None => config.askdocs_dir().join("config.yaml"),
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        } else if config.config_file.is_some() {
            return Err(AppError::Config(format!(
                "Config file not found: {:?}",
                config_path
            )));
        }

        if let Ok(provider) = std::env::var("ASKDOCS_PROVIDER") {
            config.set_provider(provider);
        }

        if let Ok(model) = std::env::var("ASKDOCS_MODEL") {
            config.model = model;
        }

        config.api_key = std::env::var("ASKDOCS_API_KEY")
            .ok()
            .or_else(|| std::env::var(&config.api_key_env).ok())
            .filter(|key| !key.trim().is_empty());

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
            if let Some(format) = logging.format {
                result.log_format = format;
            }
        }

        if let Some(llm) = config_file.llm {
            if let Some(provider) = llm.provider {
                result.set_provider(provider);
            }
            if let Some(model) = llm.model {
                result.model = model;
            }
            if llm.endpoint.is_some() {
                result.endpoint = llm.endpoint;
            }
            if let Some(temperature) = llm.temperature {
                result.temperature = temperature;
            }
            if let Some(api_key_env) = llm.api_key_env {
                result.api_key_env = api_key_env;
            }
        }

        if let Some(rag) = config_file.rag {
            result.rag = rag;
        }

        tracing::debug!("Merged config file {:?}", path);

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over environment variables and
    /// the config file.
    pub fn with_overrides(
        mut self,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(provider) = provider {
            self.set_provider(provider);
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Switch to another provider.
    ///
    /// When the provider actually changes, the model resets to that
    /// provider's default; an explicit model applied afterwards wins.
    fn set_provider(&mut self, provider: String) {
        if let Some(next) = ProviderType::parse(&provider) {
            if ProviderType::parse(&self.provider) != Some(next) {
                self.model = next.default_model().to_string();
            }
        }
        self.provider = provider;
    }

    /// Get the path to the `.askdocs` directory.
    pub fn askdocs_dir(&self) -> PathBuf {
        self.workspace.join(".askdocs")
    }

    /// Parsed log output format.
    pub fn log_format(&self) -> LogFormat {
        LogFormat::parse(&self.log_format).unwrap_or_default()
    }

    /// Validate configuration for the active provider.
    ///
    /// A missing credential is reported as [`AppError::MissingCredential`] so
    /// the binary can refuse to start before any request is made.
    pub fn validate(&self) -> AppResult<()> {
        let provider = ProviderType::parse(&self.provider).ok_or_else(|| {
            AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                ProviderType::supported()
            ))
        })?;

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(AppError::Config(format!(
                "Temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }

        if self.rag.chunk_size == 0 {
            return Err(AppError::Config("chunkSize must be greater than 0".to_string()));
        }

        if self.rag.chunk_overlap >= self.rag.chunk_size {
            return Err(AppError::Config(format!(
                "chunkOverlap ({}) must be smaller than chunkSize ({})",
                self.rag.chunk_overlap, self.rag.chunk_size
            )));
        }

        if self.rag.top_k == 0 {
            return Err(AppError::Config("topK must be greater than 0".to_string()));
        }

        if provider.requires_api_key() && self.api_key.is_none() {
            return Err(AppError::MissingCredential(self.api_key_env.clone()));
        }

        Ok(())
    }
}
