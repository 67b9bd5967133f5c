//! Search provider implementations.

pub mod duckduckgo;
pub mod fixed;
pub mod html;

pub use duckduckgo::DuckDuckGoProvider;
pub use fixed::StaticSearchProvider;
