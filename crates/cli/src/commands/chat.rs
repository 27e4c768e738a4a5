//! Chat command handler.
//!
//! Interactive session over a set of documents. Every line is either a
//! question or a slash command; questions are answered one at a time and
//! kept in the session history until the process exits.

use crate::commands::ask::{ask_documents, build_pipeline, collect_documents, AskOutcome};
use crate::session::Session;
use crate::views;
use askdocs_core::{config::AppConfig, AppResult};
use askdocs_knowledge::RagPipeline;
use clap::Args;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

const HELP: &str = "Commands:\n\
                    \x20 /history       previous questions and answers, most recent first\n\
                    \x20 /about         how answers are produced\n\
                    \x20 /load <path>   add a document or directory\n\
                    \x20 /clear         forget the history\n\
                    \x20 /help          this list\n\
                    \x20 /quit          leave\n\
                    Commands may also start with ':'. Anything else is asked as a question.\n";

/// Ask questions about documents interactively
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// Document to read (.pdf or .txt); directories are searched recursively
    #[arg(short, long = "file", value_name = "PATH")]
    pub files: Vec<PathBuf>,

    /// Number of chunks placed in the prompt context
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Skip files that cannot be read instead of failing
    #[arg(long)]
    pub skip_unreadable: bool,

    /// Show the chunks each answer was based on
    #[arg(long)]
    pub sources: bool,
}

/// One line of chat input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatInput {
    Question(String),
    History,
    About,
    Load(String),
    Clear,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl ChatInput {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return ChatInput::Empty;
        }

        let Some(command) = line.strip_prefix('/').or_else(|| line.strip_prefix(':')) else {
            return ChatInput::Question(line.to_string());
        };

        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };

        match name.to_lowercase().as_str() {
            "history" => ChatInput::History,
            "about" => ChatInput::About,
            "load" if !arg.is_empty() => ChatInput::Load(arg.to_string()),
            "clear" => ChatInput::Clear,
            "help" => ChatInput::Help,
            "quit" | "exit" => ChatInput::Quit,
            _ => ChatInput::Unknown(line.to_string()),
        }
    }
}

enum Step {
    Continue,
    Quit,
}

impl ChatCommand {
    /// Execute the chat command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing chat command");
        tracing::debug!("Chat command options: {:?}", self);

        let documents = collect_documents(&self.files)?;
        let mut rag = build_pipeline(config)?;
        if let Some(top_k) = self.top_k {
            rag = rag.with_top_k(top_k);
        }

        let mut session = Session::new(documents);
        let stdin = BufReader::new(tokio::io::stdin());
        let mut stdout = std::io::stdout();

        writeln!(
            stdout,
            "Ask the Docs - {} document(s) loaded. Type /help for commands.",
            session.documents().len()
        )?;

        self.run(&rag, config, &mut session, stdin, &mut stdout).await?;

        tracing::info!("Chat ended after {} question(s)", session.history_len());

        Ok(())
    }

    /// Read lines from `input` until it ends or the user quits.
    async fn run<R, W>(
        &self,
        rag: &RagPipeline,
        config: &AppConfig,
        session: &mut Session,
        input: R,
        out: &mut W,
    ) -> AppResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();

        loop {
            write!(out, "> ")?;
            out.flush()?;

            let Some(line) = lines.next_line().await? else {
                writeln!(out)?;
                break;
            };

            match self
                .handle(ChatInput::parse(&line), rag, config, session, out)
                .await?
            {
                Step::Continue => {}
                Step::Quit => break,
            }
        }

        Ok(())
    }

    async fn handle<W: Write>(
        &self,
        input: ChatInput,
        rag: &RagPipeline,
        config: &AppConfig,
        session: &mut Session,
        out: &mut W,
    ) -> AppResult<Step> {
        match input {
            ChatInput::Question(question) => {
                let outcome =
                    match ask_documents(rag, session.documents(), &question, self.skip_unreadable)
                        .await
                    {
                        Ok(outcome) => outcome,
                        Err(e) => {
                            tracing::error!("Question failed: {}", e);
                            writeln!(out, "Error: {}", e)?;
                            return Ok(Step::Continue);
                        }
                    };

                match &outcome {
                    AskOutcome::Answered { answer, skipped } => {
                        if let Some(notice) = views::render_skipped(skipped) {
                            write!(out, "{}", notice)?;
                        }
                        write!(out, "{}", views::render_answer(answer, self.sources))?;
                    }
                    AskOutcome::Unanswered { skipped, .. } => {
                        if let Some(notice) = views::render_skipped(skipped) {
                            write!(out, "{}", notice)?;
                        }
                        writeln!(out, "{}", outcome.message())?;
                    }
                    _ => writeln!(out, "{}", outcome.message())?,
                }

                if outcome.was_attempted() {
                    session.record(question, outcome.message());
                }
            }
            ChatInput::History => write!(out, "{}", views::render_history(session))?,
            ChatInput::About => write!(out, "{}", views::render_about(config))?,
            ChatInput::Load(path) => match collect_documents(&[PathBuf::from(&path)]) {
                Ok(documents) => {
                    let added = session.add_documents(documents);
                    writeln!(
                        out,
                        "Loaded {} new document(s), {} in total.",
                        added,
                        session.documents().len()
                    )?;
                }
                Err(e) => writeln!(out, "Error: {}", e)?,
            },
            ChatInput::Clear => {
                session.clear_history();
                writeln!(out, "History cleared.")?;
            }
            ChatInput::Help => write!(out, "{}", HELP)?,
            ChatInput::Quit => return Ok(Step::Quit),
            ChatInput::Empty => {}
            ChatInput::Unknown(line) => {
                writeln!(out, "Unknown command: {}. Type /help for commands.", line)?
            }
        }

        Ok(Step::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{stub_pipeline, StubClient};
    use askdocs_knowledge::rag::QA_CHAIN_UNAVAILABLE;
    use askdocs_prompt::PromptDefinition;
    use std::fs;
    use tempfile::TempDir;

    fn command() -> ChatCommand {
        ChatCommand {
            files: Vec::new(),
            top_k: None,
            skip_unreadable: false,
            sources: false,
        }
    }

    async fn run_script(rag: &RagPipeline, session: &mut Session, script: &str) -> String {
        let mut out = Vec::new();
        command()
            .run(
                rag,
                &AppConfig::default(),
                session,
                BufReader::new(script.as_bytes()),
                &mut out,
            )
            .await
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_input() {
        assert_eq!(ChatInput::parse("   "), ChatInput::Empty);
        assert_eq!(
            ChatInput::parse(" What is this? "),
            ChatInput::Question("What is this?".to_string())
        );
        assert_eq!(ChatInput::parse("/history"), ChatInput::History);
        assert_eq!(ChatInput::parse("/ABOUT"), ChatInput::About);
        assert_eq!(
            ChatInput::parse("/load  docs/a.pdf "),
            ChatInput::Load("docs/a.pdf".to_string())
        );
        assert_eq!(ChatInput::parse("/exit"), ChatInput::Quit);
        assert_eq!(ChatInput::parse(":quit"), ChatInput::Quit);
        assert_eq!(ChatInput::parse(":history"), ChatInput::History);
        assert_eq!(
            ChatInput::parse("/load"),
            ChatInput::Unknown("/load".to_string())
        );
        assert_eq!(
            ChatInput::parse("/dance"),
            ChatInput::Unknown("/dance".to_string())
        );
    }

    #[tokio::test]
    async fn test_session_records_history() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("fox.txt");
        fs::write(&path, "The quick brown fox jumps over the lazy dog.").unwrap();

        let client = StubClient::answering("It jumps over the lazy dog.");
        let rag = stub_pipeline(client.clone());
        let mut session = Session::new(vec![path]);

        let output = run_script(
            &rag,
            &mut session,
            "/history\nWhat does the fox do?\n/history\n/quit\nNever asked?\n",
        )
        .await;

        assert!(output.contains("No history yet."));
        assert!(output.contains("Q: What does the fox do?\nA: It jumps over the lazy dog.\n"));
        assert!(!output.contains("Never asked?"));
        assert_eq!(session.history_len(), 1);
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn test_questions_without_documents_are_not_recorded() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("fox.txt");
        fs::write(&path, "The quick brown fox jumps over the lazy dog.").unwrap();

        let client = StubClient::answering("It jumps.");
        let rag = stub_pipeline(client.clone());
        let mut session = Session::default();

        let script = format!(
            "What does the fox do?\n/load {}\nWhat does the fox do?\n",
            path.display()
        );
        let output = run_script(&rag, &mut session, &script).await;

        assert!(output.contains(views::NO_DOCUMENTS));
        assert!(output.contains("Loaded 1 new document(s), 1 in total."));
        assert!(output.contains("It jumps.\n"));
        assert_eq!(session.history_len(), 1);
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn test_failed_answers_are_recorded() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("fox.txt");
        fs::write(&path, "The quick brown fox jumps over the lazy dog.").unwrap();

        let mut config = AppConfig::default();
        config.provider = "carrier-pigeon".to_string();
        let rag = RagPipeline::from_config(&config, PromptDefinition::builtin()).unwrap();
        let mut session = Session::new(vec![path]);

        let output = run_script(&rag, &mut session, "What does the fox do?\n/history\n").await;

        assert!(output.contains(&format!("A: {}", QA_CHAIN_UNAVAILABLE)));
        assert_eq!(session.history_len(), 1);

        let output = run_script(&rag, &mut session, "/clear\n/history\n").await;
        assert!(output.contains("History cleared."));
        assert!(output.contains("No history yet."));
        assert_eq!(session.history_len(), 0);
    }

    #[tokio::test]
    async fn test_unknown_command_and_missing_load() {
        let client = StubClient::answering("unused");
        let rag = stub_pipeline(client.clone());
        let mut session = Session::default();

        let output = run_script(
            &rag,
            &mut session,
            "/dance\n/load /definitely/not/here.txt\n/help\n",
        )
        .await;

        assert!(output.contains("Unknown command: /dance"));
        assert!(output.contains("Error: Extraction error: Document not found"));
        assert!(output.contains("/history"));
        assert_eq!(client.calls(), 0);
    }
}
