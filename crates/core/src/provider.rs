//! Provider identification.
//!
//! Shared by configuration validation and the LLM client factory so both
//! accept the same names and agree on which providers need a key.

/// Provider type enum for matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderType {
    Gemini,
    Ollama,
}

impl ProviderType {
    /// Every supported provider, in the order shown to users.
    pub const ALL: [ProviderType; 2] = [ProviderType::Gemini, ProviderType::Ollama];

    /// Parse provider type from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "gemini" | "google" => Some(Self::Gemini),
            "ollama" => Some(Self::Ollama),
            _ => None,
        }
    }

    /// Get the canonical provider name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Ollama => "ollama",
        }
    }

    /// Whether the provider needs an API key.
    pub fn requires_api_key(&self) -> bool {
        matches!(self, Self::Gemini)
    }

    /// Model used when the configuration names the provider but no model.
    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Gemini => "models/gemini-1.5-pro-latest",
            Self::Ollama => "llama3.2",
        }
    }

    /// Comma-separated canonical names, for error messages.
    pub fn supported() -> String {
        Self::ALL
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
