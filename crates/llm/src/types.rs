//! Provider identifiers.

/// Which backend produces answers.
///
/// `Extractive` has no LLM behind it; it is listed here so configuration
/// parsing accepts it in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderType {
    Ollama,
    Extractive,
}

impl ProviderType {
    /// Parse provider type from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "ollama" => Some(Self::Ollama),
            "extractive" => Some(Self::Extractive),
            _ => None,
        }
    }

    /// Get the canonical provider name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::Extractive => "extractive",
        }
    }

    /// Whether this provider talks to a language model.
    pub fn is_generative(&self) -> bool {
        matches!(self, Self::Ollama)
    }
}
