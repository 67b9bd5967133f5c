//! Ask command handler.
//!
//! Runs a single turn and prints the answer, as text or JSON.

use clap::Args;
use scout_assistant::{Pipeline, Session, TurnOutcome};
use scout_core::{config::AppConfig, AppError, AppResult};
use std::path::PathBuf;

/// Ask a single question
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    #[arg(required_unless_present = "file")]
    pub question: Vec<String>,

    /// Read the question from a file
    #[arg(short, long, conflicts_with = "question")]
    pub file: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let question = self.get_question()?;
        tracing::debug!("Question: {}", question);

        let pipeline = Pipeline::from_config(config)?;
        let mut session = Session::from_config(config);

        let outcome = session.handle_turn(&pipeline, &question).await;

        if self.json {
            let json = serde_json::to_string_pretty(&outcome_json(&outcome, &session, config))?;
            println!("{}", json);
        } else if !outcome.is_error() {
            println!("{}", outcome.answer);
            tracing::debug!("Answered in {:.2}s", outcome.elapsed.as_secs_f64());
        }

        match outcome.error {
            Some(e) => Err(AppError::Other(e)),
            None => Ok(()),
        }
    }

    /// Get the question from the arguments or the question file.
    fn get_question(&self) -> AppResult<String> {
        let question = match &self.file {
            Some(path) => std::fs::read_to_string(path).map_err(|e| {
                AppError::InvalidInput(format!(
                    "Failed to read question file {}: {}",
                    path.display(),
                    e
                ))
            })?,
            None => self.question.join(" "),
        };

        let question = question.trim();
        if question.is_empty() {
            return Err(AppError::InvalidInput("No question provided".to_string()));
        }

        Ok(question.to_string())
    }
}

fn outcome_json(outcome: &TurnOutcome, session: &Session, config: &AppConfig) -> serde_json::Value {
    serde_json::json!({
        "answer": outcome.answer,
        "elapsedSecs": outcome.elapsed.as_secs_f64(),
        "model": session.settings().model,
        "provider": config.provider,
        "generator": outcome.generator,
        "error": outcome.error,
        "results": outcome.results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        ask: AskCommand,
    }

    #[test]
    fn test_question_words_are_joined() {
        let cli = TestCli::parse_from(["scout", "capital", "of", "France?"]);
        assert_eq!(cli.ask.get_question().unwrap(), "capital of France?");
    }

    #[test]
    fn test_question_required() {
        assert!(TestCli::try_parse_from(["scout"]).is_err());
    }

    #[test]
    fn test_question_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("question.txt");
        std::fs::write(&path, "  What is Rust?\n").unwrap();

        let cli = TestCli::parse_from(["scout", "--file", path.to_str().unwrap()]);
        assert_eq!(cli.ask.get_question().unwrap(), "What is Rust?");
    }

    #[tokio::test]
    async fn test_offline_extractive_answer() {
        let mut config = AppConfig::default();
        config.provider = "extractive".to_string();
        config.offline = true;

        let pipeline = Pipeline::from_config(&config).unwrap();
        let mut session = Session::from_config(&config);
        let outcome = session.handle_turn(&pipeline, "rust").await;

        let json = outcome_json(&outcome, &session, &config);
        assert_eq!(json["provider"], "extractive");
        assert_eq!(json["generator"], "extractive");
        assert_eq!(json["model"], "llama3:8b");
        assert!(json["error"].is_null());
        assert_eq!(
            json["results"][0]["snippet"],
            "(stub) Search result for: rust"
        );
    }
}
