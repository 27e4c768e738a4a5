//! About command handler.

use crate::views;
use askdocs_core::{config::AppConfig, AppResult};
use clap::Args;

/// Describe how answers are produced
#[derive(Args, Debug)]
pub struct AboutCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AboutCommand {
    /// Execute the about command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing about command");

        if self.json {
            let output = serde_json::json!({
                "name": "Ask the Docs - Mini RAG App",
                "version": env!("CARGO_PKG_VERSION"),
                "provider": config.provider,
                "model": config.model,
                "temperature": config.temperature,
                "rag": config.rag,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print!("{}", views::render_about(config));
        }

        Ok(())
    }
}
