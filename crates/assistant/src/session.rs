//! Per-session transcript and the turn handler.

use crate::generator::GenerationSettings;
use crate::pipeline::Pipeline;
use scout_core::AppConfig;
use scout_search::SearchResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::Instrument;

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// What a turn produced, for the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    /// Answer text, or a user-facing error message
    pub answer: String,

    /// Wall-clock time spent in the pipeline
    pub elapsed: Duration,

    /// Results the answer was built from (empty on error)
    pub results: Vec<SearchResult>,

    /// Generator that produced the answer, if one did
    pub generator: Option<String>,

    /// Error message when the turn failed
    pub error: Option<String>,
}

impl TurnOutcome {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// A chat session: the transcript plus its answer settings.
///
/// Lives as long as the REPL (or one `ask` invocation). Nothing is persisted.
#[derive(Debug, Clone, Default)]
pub struct Session {
    messages: Vec<Message>,
    settings: GenerationSettings,
}

impl Session {
    pub fn new(settings: GenerationSettings) -> Self {
        Self {
            messages: Vec::new(),
            settings,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(GenerationSettings::from_config(config))
    }

    /// The transcript, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut GenerationSettings {
        &mut self.settings
    }

    /// Number of completed turns.
    pub fn turns(&self) -> usize {
        self.messages.len() / 2
    }

    /// Forget the transcript. Settings are kept.
    pub fn clear(&mut self) {
        tracing::debug!("Clearing {} messages", self.messages.len());
        self.messages.clear();
    }

    /// Run one turn.
    ///
    /// Records the question, runs the pipeline, and records the answer. A
    /// pipeline failure becomes an `Error: ...` assistant message, so the
    /// transcript keeps alternating user/assistant. A blank question is
    /// refused without touching the transcript.
    pub async fn handle_turn(&mut self, pipeline: &Pipeline, question: &str) -> TurnOutcome {
        let question = question.trim();
        if question.is_empty() {
            return TurnOutcome {
                answer: "Please enter a question.".to_string(),
                elapsed: Duration::ZERO,
                results: Vec::new(),
                generator: None,
                error: Some("empty question".to_string()),
            };
        }

        let span = tracing::info_span!("turn", n = self.turns() + 1);
        self.messages.push(Message::user(question));

        let start = Instant::now();
        let result = pipeline
            .run(question, &self.settings)
            .instrument(span)
            .await;
        let elapsed = start.elapsed();

        let outcome = match result {
            Ok(answer) => {
                tracing::info!(
                    generator = %answer.generator,
                    results = answer.results.len(),
                    "Answered in {:.2}s",
                    elapsed.as_secs_f64()
                );
                TurnOutcome {
                    answer: answer.answer,
                    elapsed,
                    results: answer.results,
                    generator: Some(answer.generator),
                    error: None,
                }
            }
            Err(e) => {
                tracing::error!("Turn failed: {}", e);
                TurnOutcome {
                    answer: format!("Error: {}", e),
                    elapsed,
                    results: Vec::new(),
                    generator: None,
                    error: Some(e.to_string()),
                }
            }
        };

        self.messages.push(Message::assistant(outcome.answer.clone()));
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractive::ExtractiveGenerator;
    use scout_core::{AppError, AppResult};
    use scout_prompt::{PromptComposer, PromptTemplate};
    use scout_search::{SearchProvider, StaticSearchProvider};
    use std::sync::Arc;

    struct BrokenSearch;

    #[async_trait::async_trait]
    impl SearchProvider for BrokenSearch {
        fn name(&self) -> &str {
            "broken"
        }

        async fn search(&self, _query: &str) -> AppResult<Vec<SearchResult>> {
            Err(AppError::Network("connection reset".to_string()))
        }
    }

    fn pipeline_with(search: Arc<dyn SearchProvider>) -> Pipeline {
        Pipeline::new(
            search,
            PromptComposer::new(&PromptTemplate::builtin()).unwrap(),
            Arc::new(ExtractiveGenerator),
        )
    }

    fn paris_pipeline() -> Pipeline {
        pipeline_with(Arc::new(StaticSearchProvider::new(vec![SearchResult::new(
            "Paris is the capital of France.",
            "https://example.com/paris",
        )])))
    }

    #[tokio::test]
    async fn test_turn_records_question_and_answer() {
        let pipeline = paris_pipeline();
        let mut session = Session::default();

        let outcome = session
            .handle_turn(&pipeline, "What is the capital of France?")
            .await;

        assert!(!outcome.is_error());
        assert_eq!(outcome.generator.as_deref(), Some("extractive"));
        assert_eq!(
            session.messages(),
            &[
                Message::user("What is the capital of France?"),
                Message::assistant(
                    "Paris is the capital of France.\n\nSources:\n- https://example.com/paris"
                ),
            ]
        );
    }

    #[tokio::test]
    async fn test_transcript_alternates_over_many_turns() {
        let pipeline = paris_pipeline();
        let mut session = Session::default();

        let n = 5;
        for i in 0..n {
            session.handle_turn(&pipeline, &format!("question {}", i)).await;
        }

        let messages = session.messages();
        assert_eq!(messages.len(), 2 * n);
        assert_eq!(session.turns(), n);
        for (i, message) in messages.iter().enumerate() {
            let expected = if i % 2 == 0 { Role::User } else { Role::Assistant };
            assert_eq!(message.role, expected);
        }
    }

    #[tokio::test]
    async fn test_search_failure_becomes_error_message() {
        let pipeline = pipeline_with(Arc::new(BrokenSearch));
        let mut session = Session::default();

        let outcome = session.handle_turn(&pipeline, "anything").await;

        assert!(outcome.is_error());
        assert_eq!(outcome.answer, "Error: Network error: connection reset");
        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.messages()[1].content, outcome.answer);
    }

    #[tokio::test]
    async fn test_blank_question_leaves_transcript_alone() {
        let pipeline = paris_pipeline();
        let mut session = Session::default();

        let outcome = session.handle_turn(&pipeline, "   ").await;

        assert!(outcome.is_error());
        assert!(session.messages().is_empty());
    }

    #[tokio::test]
    async fn test_clear_keeps_settings() {
        let pipeline = paris_pipeline();
        let mut session = Session::default();
        session.settings_mut().show_sources = false;

        let outcome = session.handle_turn(&pipeline, "capital of France").await;
        assert_eq!(
            outcome.answer,
            "Paris is the capital of France.\n\nSources:\n- https://example.com/paris"
        );

        session.clear();
        assert!(session.messages().is_empty());
        assert!(!session.settings().show_sources);
    }

    #[test]
    fn test_message_serialization() {
        let json = serde_json::to_string(&Message::user("hi")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hi"}"#);
    }
}
