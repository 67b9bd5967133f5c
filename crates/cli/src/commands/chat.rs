//! Chat command handler.
//!
//! A line-oriented REPL over one session. Each line is a question, a
//! `/command` that changes the session, or `exit`/`quit`.

use clap::Args;
use scout_assistant::{Pipeline, Session, TurnOutcome};
use scout_core::{AppConfig, AppResult};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
Commands:
  /clear                 Clear the chat history
  /model <name>          Switch model (e.g. llama3:8b, mistral, llama3.1:8b)
  /temperature <value>   Set creativity (0.0-1.0)
  /sources on|off        Show or hide the sources section
  /settings              Show the current settings
  /history               Print the chat history
  /help                  Show this help
  exit, quit             Leave";

/// Temperature range offered in the REPL.
const REPL_TEMPERATURE: std::ops::RangeInclusive<f32> = 0.0..=1.0;

const RATE_LIMIT_TIP: &str =
    "Tip: If it's a DuckDuckGo 'Ratelimit' error, wait a bit and try again.";

/// Interactive chat
#[derive(Args, Debug, Default)]
pub struct ChatCommand {
    /// Do not print the greeting
    #[arg(short, long)]
    pub quiet: bool,
}

/// One parsed line of REPL input.
#[derive(Debug, PartialEq)]
enum ReplInput<'a> {
    Empty,
    Exit,
    Question(&'a str),
    Command(ReplCommand),
}

/// A `/command` typed at the prompt.
#[derive(Debug, PartialEq)]
enum ReplCommand {
    Clear,
    Model(String),
    Temperature(f32),
    Sources(bool),
    Settings,
    History,
    Help,
    /// Malformed or unknown command, with the message to show
    Invalid(String),
}

impl ChatCommand {
    /// Execute the chat command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing chat command");

        let pipeline = Pipeline::from_config(config)?;
        let mut session = Session::from_config(config);

        if !self.quiet {
            println!("Hello! I'm a real-time web search assistant. Type 'exit' to quit, '/help' for commands.");
            println!(
                "Using {} for search and {} for answers.",
                pipeline.search_name(),
                pipeline.generator_name()
            );
        }

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            print!("You: ");
            std::io::stdout().flush().ok();

            let Some(line) = lines.next_line().await? else {
                // EOF
                println!();
                break;
            };

            match parse_line(&line) {
                ReplInput::Empty => continue,
                ReplInput::Exit => {
                    println!("Goodbye!");
                    break;
                }
                ReplInput::Command(command) => apply_command(command, &mut session),
                ReplInput::Question(question) => {
                    println!("Thinking...");
                    let outcome = session.handle_turn(&pipeline, question).await;
                    print_outcome(&outcome);
                }
            }
        }

        tracing::debug!("Chat ended after {} turns", session.turns());
        Ok(())
    }
}

fn print_outcome(outcome: &TurnOutcome) {
    if outcome.is_error() {
        println!("{}", outcome.answer);
        println!("{}", RATE_LIMIT_TIP);
    } else {
        println!("Scout: {}", outcome.answer);
        println!("({:.2}s)", outcome.elapsed.as_secs_f64());
    }
}

fn apply_command(command: ReplCommand, session: &mut Session) {
    match command {
        ReplCommand::Clear => {
            session.clear();
            println!("Chat cleared.");
        }
        ReplCommand::Model(model) => {
            println!("Model set to {}.", model);
            session.settings_mut().model = model;
        }
        ReplCommand::Temperature(temperature) => {
            session.settings_mut().temperature = temperature;
            println!("Temperature set to {:.1}.", temperature);
        }
        ReplCommand::Sources(show) => {
            session.settings_mut().show_sources = show;
            println!("Sources {}.", if show { "on" } else { "off" });
        }
        ReplCommand::Settings => {
            let settings = session.settings();
            println!("Model:       {}", settings.model);
            println!("Temperature: {:.1}", settings.temperature);
            println!(
                "Sources:     {}",
                if settings.show_sources { "on" } else { "off" }
            );
            println!("Turns:       {}", session.turns());
        }
        ReplCommand::History => {
            if session.messages().is_empty() {
                println!("No messages yet.");
            }
            for message in session.messages() {
                println!("[{}] {}", message.role, message.content);
            }
        }
        ReplCommand::Help => println!("{}", HELP),
        ReplCommand::Invalid(message) => println!("{}", message),
    }
}

fn parse_line(line: &str) -> ReplInput<'_> {
    let line = line.trim();

    if line.is_empty() {
        return ReplInput::Empty;
    }

    if matches!(line.to_lowercase().as_str(), "exit" | "quit") {
        return ReplInput::Exit;
    }

    if line.starts_with('/') {
        return ReplInput::Command(parse_command(line));
    }

    ReplInput::Question(line)
}

fn parse_command(line: &str) -> ReplCommand {
    let mut parts = line.split_whitespace();
    let name = parts.next().unwrap_or_default().to_lowercase();
    let arg = parts.next();

    match (name.as_str(), arg) {
        ("/clear", _) => ReplCommand::Clear,
        ("/model", Some(model)) => ReplCommand::Model(model.to_string()),
        ("/model", None) => ReplCommand::Invalid("Usage: /model <name>".to_string()),
        ("/temperature", Some(value)) => match value.parse::<f32>() {
            Ok(t) if REPL_TEMPERATURE.contains(&t) => ReplCommand::Temperature(t),
            Ok(t) => ReplCommand::Invalid(format!(
                "Temperature must be between 0.0 and 1.0, got {}",
                t
            )),
            Err(_) => ReplCommand::Invalid(format!("Not a number: {}", value)),
        },
        ("/temperature", None) => {
            ReplCommand::Invalid("Usage: /temperature <0.0-1.0>".to_string())
        }
        ("/sources", Some(value)) => match value.to_lowercase().as_str() {
            "on" | "true" | "yes" => ReplCommand::Sources(true),
            "off" | "false" | "no" => ReplCommand::Sources(false),
            _ => ReplCommand::Invalid("Usage: /sources on|off".to_string()),
        },
        ("/sources", None) => ReplCommand::Invalid("Usage: /sources on|off".to_string()),
        ("/settings", _) => ReplCommand::Settings,
        ("/history", _) => ReplCommand::History,
        ("/help", _) => ReplCommand::Help,
        _ => ReplCommand::Invalid(format!(
            "Unknown command: {}. Type /help for commands.",
            name
        )),
    }
}
