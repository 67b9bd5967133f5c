//! Configuration management for Scout.
//!
//! Configuration is merged from several sources, later ones winning:
//! - Built-in defaults
//! - A YAML config file (`--config`, `SCOUT_CONFIG`, or `./.scout/config.yaml`)
//! - Environment variables
//! - Command-line flags
//!
//! The answering pipeline never reads the environment itself; everything it
//! needs is resolved here once at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Providers that can produce answers.
///
/// `extractive` skips the language model entirely and answers from the
/// first search snippet.
pub const KNOWN_PROVIDERS: [&str; 2] = ["ollama", "extractive"];

/// Default location of the project-local config file.
const DEFAULT_CONFIG_PATH: &str = ".scout/config.yaml";

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Config file that was merged, if any
    pub config_file: Option<PathBuf>,

    /// Answer provider ("ollama" or "extractive")
    pub provider: String,

    /// Model identifier passed to the provider
    pub model: String,

    /// Base URL of the Ollama server
    pub ollama_url: String,

    /// Sampling temperature (0.0 - 2.0)
    pub temperature: f32,

    /// Optional request timeout for the model, in seconds
    pub llm_timeout_secs: Option<u64>,

    /// Whether answers should carry a sources section
    pub show_sources: bool,

    /// Optional YAML file overriding the built-in answer template
    pub prompt_file: Option<PathBuf>,

    /// Search provider settings
    pub search: SearchSettings,

    /// Skip the network search and answer from a canned result
    pub offline: bool,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Endpoints and request settings for the web search provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Instant-answer JSON endpoint
    pub api_url: String,

    /// HTML results page used when the JSON endpoint has nothing
    pub html_url: String,

    /// User-Agent sent to the HTML results page
    pub user_agent: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            api_url: "https://api.duckduckgo.com/".to_string(),
            html_url: "https://html.duckduckgo.com/html/".to_string(),
            user_agent: "Mozilla/5.0".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmSection>,
    search: Option<SearchSection>,
    answer: Option<AnswerSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LlmSection {
    provider: Option<String>,
    model: Option<String>,
    endpoint: Option<String>,
    temperature: Option<f32>,
    timeout: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SearchSection {
    #[serde(rename = "apiUrl")]
    api_url: Option<String>,
    #[serde(rename = "htmlUrl")]
    html_url: Option<String>,
    #[serde(rename = "userAgent")]
    user_agent: Option<String>,
    timeout: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AnswerSection {
    #[serde(rename = "showSources")]
    show_sources: Option<bool>,
    #[serde(rename = "promptFile")]
    prompt_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

/// Values supplied on the command line.
///
/// Every field is optional; unset fields leave the loaded value alone.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub no_sources: bool,
    pub offline: bool,
    pub log_level: Option<String>,
    pub verbose: bool,
    pub no_color: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            provider: "ollama".to_string(),
            model: "llama3:8b".to_string(),
            ollama_url: "http://localhost:11434".to_string(),
            temperature: 0.0,
            llm_timeout_secs: None,
            show_sources: true,
            prompt_file: None,
            search: SearchSettings::default(),
            offline: false,
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from a config file, environment variables and defaults.
    ///
    /// `config_file` wins over `SCOUT_CONFIG`; when neither is given,
    /// `./.scout/config.yaml` is used if it exists.
    ///
    /// Environment variables:
    /// - `SCOUT_CONFIG`: Path to config file
    /// - `SCOUT_PROVIDER`: Answer provider
    /// - `SCOUT_MODEL`: Model identifier
    /// - `SCOUT_OLLAMA_URL`: Ollama base URL
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use scout_core::config::AppConfig;
    ///
    /// let config = AppConfig::load(None).expect("Failed to load config");
    /// println!("Model: {}", config.model);
    /// ```
    pub fn load(config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        let explicit = config_file.or_else(|| std::env::var("SCOUT_CONFIG").ok().map(PathBuf::from));

        match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::Config(format!(
                        "Config file does not exist: {:?}",
                        path
                    )));
                }
                config = config.merge_yaml(&path)?;
            }
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_PATH);
                if path.exists() {
                    config = config.merge_yaml(&path)?;
                }
            }
        }

        // Environment variables override YAML config
        if let Ok(provider) = std::env::var("SCOUT_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("SCOUT_MODEL") {
            config.model = model;
        }

        if let Ok(url) = std::env::var("SCOUT_OLLAMA_URL") {
            config.ollama_url = url;
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    pub fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = if contents.trim().is_empty() {
            ConfigFile::default()
        } else {
            serde_yaml::from_str(&contents).map_err(|e| {
                AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
            })?
        };

        let mut result = self.clone();
        result.config_file = Some(path.to_path_buf());

        if let Some(llm) = config_file.llm {
            if let Some(provider) = llm.provider {
                result.provider = provider;
            }
            if let Some(model) = llm.model {
                result.model = model;
            }
            if let Some(endpoint) = llm.endpoint {
                result.ollama_url = endpoint;
            }
            if let Some(temperature) = llm.temperature {
                result.temperature = temperature;
            }
            if llm.timeout.is_some() {
                result.llm_timeout_secs = llm.timeout;
            }
        }

        if let Some(search) = config_file.search {
            if let Some(api_url) = search.api_url {
                result.search.api_url = api_url;
            }
            if let Some(html_url) = search.html_url {
                result.search.html_url = html_url;
            }
            if let Some(user_agent) = search.user_agent {
                result.search.user_agent = user_agent;
            }
            if let Some(timeout) = search.timeout {
                result.search.timeout_secs = timeout;
            }
        }

        if let Some(answer) = config_file.answer {
            if let Some(show_sources) = answer.show_sources {
                result.show_sources = show_sources;
            }
            // Relative prompt files are resolved against the config file's directory
            if let Some(prompt_file) = answer.prompt_file {
                let prompt_path = PathBuf::from(prompt_file);
                result.prompt_file = Some(match path.parent() {
                    Some(dir) if prompt_path.is_relative() => dir.join(prompt_path),
                    _ => prompt_path,
                });
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(provider) = overrides.provider {
            self.provider = provider;
        }

        if let Some(model) = overrides.model {
            self.model = model;
        }

        if let Some(temperature) = overrides.temperature {
            self.temperature = temperature;
        }

        if overrides.no_sources {
            self.show_sources = false;
        }

        if overrides.offline {
            self.offline = true;
        }

        if let Some(log_level) = overrides.log_level {
            self.log_level = Some(log_level);
        }

        if overrides.verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if overrides.no_color {
            self.no_color = true;
        }

        self
    }

    /// Validate the merged configuration.
    pub fn validate(&self) -> AppResult<()> {
        if !KNOWN_PROVIDERS.contains(&self.provider.to_lowercase().as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        if self.model.trim().is_empty() {
            return Err(AppError::Config("Model cannot be empty".to_string()));
        }

        validate_temperature(self.temperature)?;

        if self.search.timeout_secs == 0 {
            return Err(AppError::Config(
                "Search timeout must be at least one second".to_string(),
            ));
        }

        for (name, url) in [
            ("search.apiUrl", &self.search.api_url),
            ("search.htmlUrl", &self.search.html_url),
            ("llm.endpoint", &self.ollama_url),
        ] {
            if url.trim().is_empty() {
                return Err(AppError::Config(format!("{} cannot be empty", name)));
            }
        }

        Ok(())
    }
}

/// Check a sampling temperature is inside the range Ollama accepts.
pub fn validate_temperature(temperature: f32) -> AppResult<()> {
    if !(0.0..=2.0).contains(&temperature) {
        return Err(AppError::Config(format!(
            "Temperature must be between 0.0 and 2.0, got {}",
            temperature
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.provider, "ollama");
        assert_eq!(config.model, "llama3:8b");
        assert_eq!(config.temperature, 0.0);
        assert!(config.show_sources);
        assert!(!config.offline);
        assert_eq!(config.search.timeout_secs, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_with_overrides() {
        let overridden = AppConfig::default().with_overrides(ConfigOverrides {
            provider: Some("extractive".to_string()),
            model: Some("mistral".to_string()),
            temperature: Some(0.4),
            no_sources: true,
            verbose: true,
            ..Default::default()
        });

        assert_eq!(overridden.provider, "extractive");
        assert_eq!(overridden.model, "mistral");
        assert_eq!(overridden.temperature, 0.4);
        assert!(!overridden.show_sources);
        assert!(overridden.verbose);
        assert_eq!(overridden.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_verbose_keeps_explicit_level() {
        let overridden = AppConfig::default().with_overrides(ConfigOverrides {
            log_level: Some("trace".to_string()),
            verbose: true,
            ..Default::default()
        });
        assert_eq!(overridden.log_level, Some("trace".to_string()));
    }

    #[test]
    fn test_validate_unknown_provider() {
        let mut config = AppConfig::default();
        config.provider = "openai".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_temperature_range() {
        let mut config = AppConfig::default();
        config.temperature = 2.5;
        assert!(config.validate().is_err());

        config.temperature = 1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_merge_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            r#"
llm:
  provider: extractive
  model: llama3.1:8b
  temperature: 0.3
search:
  apiUrl: http://127.0.0.1:9000/
  timeout: 3
answer:
  showSources: false
  promptFile: prompts/answer.yml
logging:
  level: debug
  color: false
"#,
        )
        .unwrap();

        let config = AppConfig::default().merge_yaml(&path).unwrap();
        assert_eq!(config.provider, "extractive");
        assert_eq!(config.model, "llama3.1:8b");
        assert_eq!(config.temperature, 0.3);
        assert_eq!(config.search.api_url, "http://127.0.0.1:9000/");
        assert_eq!(config.search.timeout_secs, 3);
        // Untouched keys keep their defaults
        assert_eq!(config.search.html_url, SearchSettings::default().html_url);
        assert!(!config.show_sources);
        assert_eq!(
            config.prompt_file,
            Some(dir.path().join("prompts/answer.yml"))
        );
        assert_eq!(config.log_level, Some("debug".to_string()));
        assert!(config.no_color);
        assert_eq!(config.config_file, Some(path));
    }

    #[test]
    fn test_merge_empty_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "").unwrap();

        let config = AppConfig::default().merge_yaml(&path).unwrap();
        assert_eq!(config.provider, "ollama");
    }

    #[test]
    fn test_merge_invalid_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "llm: [unclosed").unwrap();

        let result = AppConfig::default().merge_yaml(&path);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let result = AppConfig::load(Some(PathBuf::from("/nonexistent/scout.yaml")));
        assert!(result.is_err());
    }
}
