//! The Scout answering pipeline.
//!
//! A turn runs four steps in order: search the web, compose a prompt from
//! the results, generate an answer, and record both sides in the session
//! transcript. When the language model is unavailable the answer comes from
//! the extractive fallback instead.
//!
//! # Example
//! ```no_run
//! use scout_assistant::{Pipeline, Session};
//! use scout_core::AppConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! let pipeline = Pipeline::from_config(&config)?;
//! let mut session = Session::from_config(&config);
//!
//! let outcome = session.handle_turn(&pipeline, "What is the capital of France?").await;
//! println!("{} ({:.2}s)", outcome.answer, outcome.elapsed.as_secs_f64());
//! # Ok(())
//! # }
//! ```

pub mod extractive;
pub mod generator;
pub mod pipeline;
pub mod session;

pub use extractive::{extractive_answer, first_sentence, ExtractiveGenerator};
pub use generator::{
    create_generator, AnswerGenerator, GenerationRequest, GenerationSettings, LlmGenerator,
};
pub use pipeline::{Pipeline, PipelineAnswer};
pub use session::{Message, Role, Session, TurnOutcome};
