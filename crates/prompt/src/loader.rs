//! Loader for YAML answer-template overrides.

use crate::types::PromptTemplate;
use scout_core::{AppError, AppResult};
use std::path::Path;

/// Load an answer template from a YAML file.
///
/// # Example
/// ```no_run
/// use scout_prompt::load_template;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let template = load_template(Path::new(".scout/prompts/answer.yml"))?;
/// println!("Loaded template: {}", template.title);
/// # Ok(())
/// # }
/// ```
pub fn load_template(path: &Path) -> AppResult<PromptTemplate> {
    tracing::debug!("Loading prompt template from: {:?}", path);

    if !path.exists() {
        return Err(AppError::Prompt(format!(
            "Prompt file not found: {:?}",
            path
        )));
    }

    let contents = std::fs::read_to_string(path).map_err(|e| {
        AppError::Prompt(format!("Failed to read prompt file {:?}: {}", path, e))
    })?;

    let template: PromptTemplate = serde_yaml::from_str(&contents).map_err(|e| {
        AppError::Prompt(format!("Failed to parse prompt YAML {:?}: {}", path, e))
    })?;

    validate_template(&template)?;

    tracing::info!("Loaded prompt template: {} ({})", template.id, template.title);

    Ok(template)
}

/// Validate a template definition.
fn validate_template(def: &PromptTemplate) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.title.is_empty() {
        return Err(AppError::Prompt("Prompt title cannot be empty".to_string()));
    }

    if def.template.trim().is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    if !def.template.contains("{{question}}") {
        tracing::warn!(
            "Prompt template '{}' does not reference {{{{question}}}}",
            def.id
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_template(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_valid_template() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_template(
            temp_dir.path(),
            "answer.yml",
            r#"
id: answer.bullets
title: "Bullet answers"
apiVersion: "1.0"
template: |
  Context:
  {{context}}
  Question: {{question}}
"#,
        );

        let template = load_template(&path).unwrap();
        assert_eq!(template.id, "answer.bullets");
        assert!(template.template.contains("{{context}}"));
    }

    #[test]
    fn test_load_nonexistent_template() {
        let temp_dir = TempDir::new().unwrap();
        let result = load_template(&temp_dir.path().join("missing.yml"));
        assert!(matches!(result, Err(AppError::Prompt(_))));
    }

    #[test]
    fn test_load_invalid_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_template(temp_dir.path(), "bad.yml", "invalid: yaml: content:");
        assert!(load_template(&path).is_err());
    }

    #[test]
    fn test_rejects_bad_api_version() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_template(
            temp_dir.path(),
            "v.yml",
            "id: a\ntitle: b\napiVersion: \"1\"\ntemplate: \"{{question}}\"\n",
        );

        match load_template(&path) {
            Err(AppError::Prompt(msg)) => assert!(msg.contains("apiVersion")),
            other => panic!("Expected prompt error, got {:?}", other),
        }
    }
}
