//! Prompt types for askdocs.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identifier of the built-in question-answering prompt.
pub const DEFAULT_PROMPT_ID: &str = "rag.qa.default";

/// Template of the built-in question-answering prompt.
pub const DEFAULT_TEMPLATE: &str = "You are an AI assistant for answering questions about the provided document.
Use only the following pieces of retrieved context to answer the question.
If you don't know the answer, just say that you don't know. Don't try to make up an answer.
Be concise and informative.

Context:
{{context}}

Question: {{question}}

Answer:";

/// A prompt definition, either built in or loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Unique prompt identifier
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// API version for schema evolution
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Creator identifier
    #[serde(rename = "createdBy", default)]
    pub created_by: String,

    /// Variables the template expects
    #[serde(rename = "inputVariables", default = "default_input_variables")]
    pub input_variables: Vec<String>,

    /// Optional system instruction sent alongside the rendered template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Template string with Handlebars syntax
    pub template: String,
}

fn default_input_variables() -> Vec<String> {
    vec!["context".to_string(), "question".to_string()]
}

impl PromptDefinition {
    /// The fixed "answer only from context" prompt.
    pub fn builtin() -> Self {
        Self {
            id: DEFAULT_PROMPT_ID.to_string(),
            title: "Answer from retrieved context".to_string(),
            api_version: "1.0".to_string(),
            created_by: "askdocs".to_string(),
            input_variables: default_input_variables(),
            system: None,
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

/// A fully built prompt ready for LLM execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// System message (optional)
    pub system: Option<String>,

    /// User message (required)
    pub user: String,

    /// Metadata about the built prompt
    pub metadata: BuiltPromptMetadata,
}

/// Metadata about a built prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPromptMetadata {
    /// Source prompt ID
    #[serde(rename = "sourcePromptId")]
    pub source_prompt_id: String,

    /// Template variables that were resolved
    #[serde(rename = "resolvedVariables")]
    pub resolved_variables: HashMap<String, String>,
}

impl BuiltPrompt {
    /// Create a new built prompt.
    pub fn new(
        system: Option<String>,
        user: String,
        source_prompt_id: String,
        resolved_variables: HashMap<String, String>,
    ) -> Self {
        Self {
            system,
            user,
            metadata: BuiltPromptMetadata {
                source_prompt_id,
                resolved_variables,
            },
        }
    }
}
