//! Web search for Scout.
//!
//! Turns a question into a short, ordered list of snippets with source URLs.
//! Providers sit behind the [`SearchProvider`] trait; the DuckDuckGo provider
//! degrades to a single stub result instead of failing, so callers always
//! get something to show the model.

pub mod factory;
pub mod provider;
pub mod providers;
pub mod types;

pub use factory::create_provider;
pub use provider::SearchProvider;
pub use providers::{DuckDuckGoProvider, StaticSearchProvider};
pub use types::{dedupe_results, SearchResult, MAX_RESULTS};
