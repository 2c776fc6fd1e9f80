use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Output format is known (enforced by serde)
/// - engine.path is not empty
/// - engine.resource_dir, when set, is a directory
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if let Some(path) = &config.engine.path {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "engine.path cannot be empty".to_string(),
            ));
        }
    }

    if let Some(dir) = &config.engine.resource_dir {
        if !dir.is_dir() {
            return Err(ConfigError::ValidationError(format!(
                "engine.resource_dir {} is not a directory",
                dir.display()
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_empty_engine_path_fails() {
        let config = Config {
            engine: EngineConfig::with_path(""),
            ..Default::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_resource_dir() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            engine: EngineConfig::default().with_resource_dir(dir.path()),
            ..Default::default()
        };
        assert!(validate_config(&config).is_ok());

        let config = Config {
            engine: EngineConfig::default()
                .with_resource_dir(PathBuf::from("/nonexistent/resources")),
            ..Default::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }
}
