//! Search command handler.
//!
//! Shows what the search step would hand to the model, without generating
//! an answer.

use clap::Args;
use scout_core::{config::AppConfig, AppError, AppResult};
use scout_search::{create_provider, dedupe_results, SearchResult};

/// Show the search results for a query
#[derive(Args, Debug)]
pub struct SearchCommand {
    /// The search query
    #[arg(required = true)]
    pub query: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl SearchCommand {
    /// Execute the search command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing search command");

        let query = self.query.join(" ");
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::InvalidInput("Query cannot be empty".to_string()));
        }

        let provider = create_provider(&config.search, config.offline)?;
        let results = dedupe_results(provider.search(query).await?);

        tracing::debug!("{} returned {} results", provider.name(), results.len());

        if self.json {
            let output = serde_json::json!({
                "query": query,
                "provider": provider.name(),
                "results": results,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print!("{}", format_results(&results));
        }

        Ok(())
    }
}

fn format_results(results: &[SearchResult]) -> String {
    let mut out = String::new();
    for (i, result) in results.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, result.snippet));
        if !result.url.is_empty() {
            out.push_str(&format!("   {}\n", result.url));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_results() {
        let results = vec![
            SearchResult::new("Paris is the capital of France.", "https://example.com/paris"),
            SearchResult::stub("france"),
        ];

        assert_eq!(
            format_results(&results),
            "1. Paris is the capital of France.\n   https://example.com/paris\n\
             2. (stub) Search result for: france\n"
        );
    }

    #[test]
    fn test_format_no_results() {
        assert_eq!(format_results(&[]), "");
    }
}
