//! Prompt loader for YAML prompt overrides.

use crate::types::{PromptDefinition, DEFAULT_PROMPT_ID};
use askdocs_core::{AppError, AppResult};
use std::path::Path;

/// Load a prompt definition by ID from the workspace.
///
/// Looks for `<id>.yml` in the `.askdocs/prompts/` directory.
///
/// # Example
/// ```no_run
/// use askdocs_prompt::load_prompt;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompt = load_prompt(Path::new("."), "rag.qa.default")?;
/// println!("Loaded prompt: {}", prompt.title);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt(workspace_path: &Path, prompt_id: &str) -> AppResult<PromptDefinition> {
    let prompt_file = workspace_path
        .join(".askdocs/prompts")
        .join(format!("{}.yml", prompt_id));

    tracing::debug!("Loading prompt from: {:?}", prompt_file);

    if !prompt_file.exists() {
        return Err(AppError::Prompt(format!(
            "Prompt file not found: {:?}",
            prompt_file
        )));
    }

    let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to read prompt file {:?}: {}",
            prompt_file, e
        ))
    })?;

    let definition: PromptDefinition = serde_yaml::from_str(&contents).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to parse prompt YAML {:?}: {}",
            prompt_file, e
        ))
    })?;

    validate_prompt(&definition)?;

    tracing::info!("Loaded prompt: {} ({})", definition.id, definition.title);

    Ok(definition)
}

/// Resolve the question-answering prompt for a workspace.
///
/// A workspace override at `.askdocs/prompts/rag.qa.default.yml` wins;
/// otherwise the built-in prompt is used. A present but invalid override
/// is an error rather than a silent fallback.
pub fn resolve_prompt(workspace_path: &Path) -> AppResult<PromptDefinition> {
    let override_file = workspace_path
        .join(".askdocs/prompts")
        .join(format!("{}.yml", DEFAULT_PROMPT_ID));

    if override_file.exists() {
        load_prompt(workspace_path, DEFAULT_PROMPT_ID)
    } else {
        tracing::debug!("Using built-in prompt: {}", DEFAULT_PROMPT_ID);
        Ok(PromptDefinition::builtin())
    }
}

/// Validate a prompt definition.
fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.template.trim().is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    for variable in &def.input_variables {
        if !def.template.contains(&format!("{{{{{}}}}}", variable)) {
            return Err(AppError::Prompt(format!(
                "Prompt '{}' declares variable '{}' but the template never uses it",
                def.id, variable
            )));
        }
    }

    Ok(())
}
