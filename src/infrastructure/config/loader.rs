use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Project-local configuration file, optional
pub const CONFIG_FILE: &str = ".bedrock-setup.yaml";

/// Prefix for environment overrides (`BEDROCK_SETUP_PROVIDER__REGION=eu-west-1`)
pub const ENV_PREFIX: &str = "BEDROCK_SETUP_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid timeout_secs: {0}. Must be between 1 and 300")]
    InvalidTimeout(u64),

    #[error("Model identifier cannot be empty")]
    EmptyModel,

    #[error("Invalid endpoint_url: {0}. Must start with http:// or https://")]
    InvalidEndpoint(String),

    #[error("Settings directory cannot be empty")]
    EmptySettingsDirectory,

    #[error("Settings file name cannot be empty")]
    EmptySettingsFileName,
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .bedrock-setup.yaml in the working directory (optional)
    /// 3. Environment variables (BEDROCK_SETUP_* prefix)
    ///
    /// CLI flags are applied on top by the command layer.
    pub fn load() -> Result<Config> {
        Self::load_from_file(CONFIG_FILE)
    }

    /// Load configuration using a specific YAML file in place of the default one
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.as_ref().display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        if config.provider.timeout_secs == 0 || config.provider.timeout_secs > 300 {
            return Err(ConfigError::InvalidTimeout(config.provider.timeout_secs));
        }

        if config.provider.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel);
        }

        if let Some(endpoint) = &config.provider.endpoint_url {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(ConfigError::InvalidEndpoint(endpoint.clone()));
            }
        }

        // Region shape is checked by the probe so a bad region reports as a credential failure.

        if config.settings.directory.is_empty() {
            return Err(ConfigError::EmptySettingsDirectory);
        }

        if config.settings.file_name.is_empty() {
            return Err(ConfigError::EmptySettingsFileName);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn yaml_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
provider:
  region: eu-central-1
  model: anthropic.claude-3-5-sonnet-20240620-v1:0
  profile: work
  timeout_secs: 10
settings:
  directory: .client
logging:
  level: debug
  format: json
";

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.provider.region, "eu-central-1");
        assert_eq!(config.provider.profile.as_deref(), Some("work"));
        assert_eq!(config.provider.timeout_secs, 10);
        assert_eq!(config.settings.directory, ".client");
        assert_eq!(config.settings.file_name, "settings.local.json");
        assert_eq!(config.logging.format, "json");

        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        temp_env::with_vars_unset(
            ["BEDROCK_SETUP_PROVIDER__REGION", "BEDROCK_SETUP_LOGGING__LEVEL"],
            || {
                let config = ConfigLoader::load_from_file("/nonexistent/bedrock-setup.yaml").unwrap();
                assert_eq!(config.provider.region, "us-east-1");
                assert_eq!(config.logging.level, "warn");
            },
        );
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file = yaml_file("provider:\n  region: ap-northeast-1\n");
        temp_env::with_vars_unset(["BEDROCK_SETUP_PROVIDER__REGION"], || {
            let config = ConfigLoader::load_from_file(file.path()).unwrap();
            assert_eq!(config.provider.region, "ap-northeast-1");
            assert_eq!(config.provider.timeout_secs, 5, "Default should persist");
        });
    }

    #[test]
    fn test_env_overrides_file() {
        let file = yaml_file("provider:\n  region: ap-northeast-1\nlogging:\n  level: info\n");
        temp_env::with_vars(
            [
                ("BEDROCK_SETUP_PROVIDER__REGION", Some("us-west-2")),
                ("BEDROCK_SETUP_PROVIDER__TIMEOUT_SECS", Some("12")),
            ],
            || {
                let config = ConfigLoader::load_from_file(file.path()).unwrap();
                assert_eq!(config.provider.region, "us-west-2");
                assert_eq!(config.provider.timeout_secs, 12);
                assert_eq!(config.logging.level, "info");
            },
        );
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let file = yaml_file("provider:\n  timeout_secs: 0\n");
        temp_env::with_vars_unset(["BEDROCK_SETUP_PROVIDER__TIMEOUT_SECS"], || {
            assert!(ConfigLoader::load_from_file(file.path()).is_err());
        });
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();

        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidLogLevel(level) => assert_eq!(level, "verbose"),
            other => panic!("Expected InvalidLogLevel error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_invalid_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();

        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidLogFormat(_)
        ));
    }

    #[test]
    fn test_validate_timeout_bounds() {
        let mut config = Config::default();
        config.provider.timeout_secs = 0;
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidTimeout(0)
        ));

        config.provider.timeout_secs = 301;
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidTimeout(301)
        ));
    }

    #[test]
    fn test_validate_empty_model() {
        let mut config = Config::default();
        config.provider.model = "  ".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::EmptyModel
        ));
    }

    #[test]
    fn test_validate_endpoint_scheme() {
        let mut config = Config::default();
        config.provider.endpoint_url = Some("bedrock.internal:443".to_string());
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidEndpoint(_)
        ));

        config.provider.endpoint_url = Some("http://127.0.0.1:9000".to_string());
        assert!(ConfigLoader::validate(&config).is_ok());
    }

    #[test]
    fn test_validate_empty_settings_paths() {
        let mut config = Config::default();
        config.settings.directory = String::new();
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::EmptySettingsDirectory
        ));

        let mut config = Config::default();
        config.settings.file_name = String::new();
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::EmptySettingsFileName
        ));
    }
}
