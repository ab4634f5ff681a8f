use chrono::format::{Item, StrftimeItems};

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Pipeline counts and limits are non-zero
/// - Title separator is not empty
/// - At least one source type is enabled
/// - Date format is a valid strftime string
/// - Anthropic has an API key
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let pipeline = &config.pipeline;

    let limits = [
        ("pipeline.top_n", pipeline.top_n),
        ("pipeline.enrich_batch_size", pipeline.enrich_batch_size),
        ("pipeline.headline_max_chars", pipeline.headline_max_chars),
        ("pipeline.short_title_max_chars", pipeline.short_title_max_chars),
    ];
    for (name, value) in limits {
        if value == 0 {
            return Err(ConfigError::ValidationError(format!("{} cannot be 0", name)));
        }
    }

    if pipeline.title_separator.is_empty() {
        return Err(ConfigError::ValidationError(
            "pipeline.title_separator cannot be empty".to_string(),
        ));
    }

    if pipeline.source_types.is_empty() {
        return Err(ConfigError::ValidationError(
            "pipeline.source_types must list at least one source type".to_string(),
        ));
    }

    if StrftimeItems::new(&pipeline.date_format).any(|item| matches!(item, Item::Error)) {
        return Err(ConfigError::ValidationError(format!(
            "pipeline.date_format is not a valid format string: {}",
            pipeline.date_format
        )));
    }

    if config.llm.provider == super::LlmProvider::Anthropic
        && config.llm.api_key.as_deref().unwrap_or_default().is_empty()
    {
        return Err(ConfigError::ValidationError(
            "llm.api_key is required for the anthropic provider".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from_str;

    fn config() -> Config {
        load_config_from_str(
            r#"
[llm]
provider = "ollama"
model = "llama3"

[image]
endpoint = "http://localhost:9000/generate"

[publisher]
api_base = "http://localhost:9100/api"
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&config()).is_ok());
    }

    #[test]
    fn test_validate_zero_top_n_fails() {
        let mut config = config();
        config.pipeline.top_n = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("pipeline.top_n"));
    }

    #[test]
    fn test_validate_zero_batch_size_fails() {
        let mut config = config();
        config.pipeline.enrich_batch_size = 0;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_empty_separator_fails() {
        let mut config = config();
        config.pipeline.title_separator = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_no_source_types_fails() {
        let mut config = config();
        config.pipeline.source_types.clear();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_bad_date_format_fails() {
        let mut config = config();
        config.pipeline.date_format = "%Y-%Q".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("date_format"));
    }

    #[test]
    fn test_validate_anthropic_requires_key() {
        let mut config = config();
        config.llm.provider = crate::config::LlmProvider::Anthropic;
        config.llm.api_key = None;
        assert!(validate_config(&config).is_err());

        config.llm.api_key = Some("sk-test".to_string());
        assert!(validate_config(&config).is_ok());
    }
}
