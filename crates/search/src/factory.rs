//! Search provider factory.

use crate::provider::SearchProvider;
use crate::providers::{DuckDuckGoProvider, StaticSearchProvider};
use scout_core::config::SearchSettings;
use scout_core::AppResult;
use std::sync::Arc;

/// Create the search provider for this run.
///
/// `offline` selects a provider that never touches the network and answers
/// every query with the stub result.
pub fn create_provider(settings: &SearchSettings, offline: bool) -> AppResult<Arc<dyn SearchProvider>> {
    if offline {
        tracing::debug!("Offline mode: web search disabled");
        return Ok(Arc::new(StaticSearchProvider::default()));
    }

    Ok(Arc::new(DuckDuckGoProvider::from_settings(settings)?))
}
