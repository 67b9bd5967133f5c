//! DuckDuckGo search provider.
//!
//! Tries the instant-answer JSON API first and scrapes the HTML results page
//! when that yields nothing. Every failure ends in a stub result; this
//! provider never returns `Err`.

use crate::provider::SearchProvider;
use crate::providers::html;
use crate::types::{dedupe_results, SearchResult, MAX_RESULTS};
use scout_core::config::SearchSettings;
use scout_core::{AppError, AppResult};
use serde::Deserialize;
use std::time::Duration;

/// Grouped related topics contribute at most this many entries each.
const TOPICS_PER_GROUP: usize = 3;

/// Instant-answer API response (only the fields we read).
#[derive(Debug, Default, Deserialize)]
struct InstantAnswer {
    #[serde(rename = "AbstractText", default)]
    abstract_text: Option<String>,
    #[serde(rename = "AbstractURL", default)]
    abstract_url: Option<String>,
    #[serde(rename = "Results", default)]
    results: Vec<Topic>,
    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<Topic>,
}

/// An entry in `Results` or `RelatedTopics`.
///
/// Related topics are either a single entry with `Text` or a named group
/// carrying nested `Topics`.
#[derive(Debug, Default, Deserialize)]
struct Topic {
    #[serde(rename = "Text", default)]
    text: Option<String>,
    #[serde(rename = "Result", default)]
    result: Option<String>,
    #[serde(rename = "Snippet", default)]
    snippet: Option<String>,
    #[serde(rename = "FirstURL", default)]
    first_url: Option<String>,
    #[serde(rename = "Url", default)]
    url: Option<String>,
    #[serde(rename = "Topics", default)]
    topics: Option<Vec<Topic>>,
}

impl Topic {
    fn url(&self) -> String {
        self.first_url
            .clone()
            .or_else(|| self.url.clone())
            .unwrap_or_default()
    }
}

/// DuckDuckGo-backed search.
pub struct DuckDuckGoProvider {
    api_url: String,
    html_url: String,
    user_agent: String,
    client: reqwest::Client,
}

impl DuckDuckGoProvider {
    /// Build a provider from search settings.
    pub fn from_settings(settings: &SearchSettings) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_url: settings.api_url.clone(),
            html_url: settings.html_url.clone(),
            user_agent: settings.user_agent.clone(),
            client,
        })
    }

    /// Query the instant-answer API.
    ///
    /// Returns `Network` when the request could not be made, `Parse` when
    /// the body is not the expected JSON and `Search` when it has no usable
    /// snippets.
    async fn instant_answer(&self, query: &str) -> AppResult<Vec<SearchResult>> {
        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send()
            .await
            .map_err(|e| AppError::Network(format!("Instant answer request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Network(format!("Failed to read instant answer: {}", e)))?;

        let answer: InstantAnswer = serde_json::from_str(&body).map_err(|e| {
            AppError::Parse(format!(
                "Instant answer was not JSON (HTTP {}): {}",
                status, e
            ))
        })?;

        let results = dedupe_results(collect_instant_answer(answer));
        if results.is_empty() {
            return Err(AppError::Search(
                "Instant answer had no usable snippets".to_string(),
            ));
        }
        Ok(results)
    }

    /// Scrape the HTML results page.
    ///
    /// Returns `Search` when the page has no recognisable results.
    async fn html_results(&self, query: &str) -> AppResult<Vec<SearchResult>> {
        let response = self
            .client
            .get(&self.html_url)
            .query(&[("q", query)])
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(|e| AppError::Network(format!("HTML search request failed: {}", e)))?;

        let body = response
            .text()
            .await
            .map_err(|e| AppError::Network(format!("Failed to read HTML results: {}", e)))?;

        let results = dedupe_results(html::parse_results(&body, MAX_RESULTS));
        if results.is_empty() {
            return Err(AppError::Search(
                "HTML results page had no results".to_string(),
            ));
        }
        Ok(results)
    }
}

/// Flatten an instant answer into results, in the API's order.
fn collect_instant_answer(answer: InstantAnswer) -> Vec<SearchResult> {
    let mut results = Vec::new();

    if let Some(text) = answer.abstract_text.filter(|t| !t.trim().is_empty()) {
        results.push(SearchResult::new(
            text,
            answer.abstract_url.unwrap_or_default(),
        ));
    }

    for entry in &answer.results {
        let text = [&entry.text, &entry.result, &entry.snippet]
            .into_iter()
            .flatten()
            .find(|t| !t.trim().is_empty());
        if let Some(text) = text {
            results.push(SearchResult::new(html::clean_text(text), entry.url()));
        }
    }

    for topic in &answer.related_topics {
        if let Some(text) = &topic.text {
            results.push(SearchResult::new(text.clone(), topic.url()));
        } else if let Some(group) = &topic.topics {
            for sub in group.iter().take(TOPICS_PER_GROUP) {
                if let Some(text) = &sub.text {
                    results.push(SearchResult::new(text.clone(), sub.url()));
                }
            }
        }
    }

    results
}

#[async_trait::async_trait]
impl SearchProvider for DuckDuckGoProvider {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    async fn search(&self, query: &str) -> AppResult<Vec<SearchResult>> {
        let query = query.trim();
        tracing::info!(query, "Searching DuckDuckGo");

        match self.instant_answer(query).await {
            Ok(results) => {
                tracing::debug!("Instant answer returned {} results", results.len());
                return Ok(results);
            }
            Err(AppError::Parse(msg) | AppError::Search(msg)) => {
                tracing::debug!("{}, trying HTML results", msg)
            }
            Err(e) => {
                tracing::warn!("Search failed, using stub result: {}", e);
                return Ok(vec![SearchResult::stub(query)]);
            }
        }

        match self.html_results(query).await {
            Ok(results) => {
                tracing::debug!("HTML fallback returned {} results", results.len());
                Ok(results)
            }
            Err(AppError::Search(msg)) => {
                tracing::info!("{}, using stub result", msg);
                Ok(vec![SearchResult::stub(query)])
            }
            Err(e) => {
                tracing::warn!("HTML search failed, using stub result: {}", e);
                Ok(vec![SearchResult::stub(query)])
            }
        }
    }
}
