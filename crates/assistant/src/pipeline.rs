//! Search → prompt → generate, with the extractive fallback.

use crate::extractive::ExtractiveGenerator;
use crate::generator::{create_generator, AnswerGenerator, GenerationRequest, GenerationSettings};
use scout_core::{AppConfig, AppError, AppResult};
use scout_prompt::{load_template, PromptComposer, PromptContext, PromptTemplate};
use scout_search::{create_provider, dedupe_results, SearchProvider, SearchResult};
use serde::Serialize;
use std::sync::Arc;

/// Result of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineAnswer {
    /// Final answer text
    pub answer: String,

    /// Results the answer was built from
    pub results: Vec<SearchResult>,

    /// Generator that produced the answer
    pub generator: String,

    /// Whether the primary generator failed and the fallback answered
    pub fell_back: bool,
}

/// The answering pipeline.
///
/// Holds the search provider, the compiled prompt template and the primary
/// generator chosen at startup. Stateless between runs.
pub struct Pipeline {
    search: Arc<dyn SearchProvider>,
    composer: PromptComposer,
    generator: Arc<dyn AnswerGenerator>,
    fallback: ExtractiveGenerator,
}

impl Pipeline {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        composer: PromptComposer,
        generator: Arc<dyn AnswerGenerator>,
    ) -> Self {
        Self {
            search,
            composer,
            generator,
            fallback: ExtractiveGenerator,
        }
    }

    /// Build the pipeline described by `config`.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let search = create_provider(&config.search, config.offline)?;

        let template = match &config.prompt_file {
            Some(path) => load_template(path)?,
            None => PromptTemplate::builtin(),
        };
        let composer = PromptComposer::new(&template)?;

        let generator = create_generator(config)?;

        tracing::info!(
            search = search.name(),
            generator = generator.name(),
            template = composer.template_id(),
            "Pipeline ready"
        );

        Ok(Self::new(search, composer, generator))
    }

    /// Name of the search provider.
    pub fn search_name(&self) -> &str {
        self.search.name()
    }

    /// Name of the primary generator.
    pub fn generator_name(&self) -> &str {
        self.generator.name()
    }

    /// Answer `question`.
    ///
    /// Fails on an empty question, a search provider error or a template
    /// render error. A failing primary generator is not an error: the
    /// extractive fallback answers instead.
    pub async fn run(
        &self,
        question: &str,
        settings: &GenerationSettings,
    ) -> AppResult<PipelineAnswer> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AppError::InvalidInput(
                "Question cannot be empty".to_string(),
            ));
        }

        // 1. Search
        let results = self.search.search(question).await?;
        let results = dedupe_results(results);
        tracing::debug!(
            "{} returned {} results",
            self.search.name(),
            results.len()
        );

        // 2. Compose
        let context = PromptContext::new(question, &results, settings.show_sources);
        let prompt = self.composer.render(&context)?;
        tracing::trace!("Prompt:\n{}", prompt);

        // 3. Generate
        let request = GenerationRequest {
            prompt: &prompt,
            results: &results,
            settings,
        };

        let (answer, generator, fell_back) = match self.generator.generate(&request).await {
            Ok(answer) => (answer, self.generator.name().to_string(), false),
            Err(e) => {
                if self.generator.name() == self.fallback.name() {
                    return Err(e);
                }
                tracing::warn!(
                    "{} unavailable, answering from search results: {}",
                    self.generator.name(),
                    e
                );
                let answer = self.fallback.generate(&request).await?;
                (answer, self.fallback.name().to_string(), true)
            }
        };

        Ok(PipelineAnswer {
            answer,
            results,
            generator,
            fell_back,
        })
    }
}
