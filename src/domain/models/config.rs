use serde::{Deserialize, Serialize};

/// Main configuration structure for claude-bedrock-setup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Cloud provider configuration
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Settings file location
    #[serde(default)]
    pub settings: SettingsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// AWS Bedrock provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProviderConfig {
    /// AWS region hosting the Bedrock endpoint
    #[serde(default = "default_region")]
    pub region: String,

    /// Model identifier written to the client settings
    #[serde(default = "default_model")]
    pub model: String,

    /// Named profile in the shared credentials file
    #[serde(default)]
    pub profile: Option<String>,

    /// Override for the Bedrock control-plane endpoint (private endpoints, tests)
    #[serde(default)]
    pub endpoint_url: Option<String>,

    /// Timeout for the credential probe in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_model() -> String {
    "us.anthropic.claude-sonnet-4-20250514-v1:0".to_string()
}

const fn default_timeout_secs() -> u64 {
    5
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            model: default_model(),
            profile: None,
            endpoint_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Location of the client settings document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SettingsConfig {
    /// Directory holding the settings file, relative to the invocation directory
    #[serde(default = "default_settings_directory")]
    pub directory: String,

    /// Settings file name inside `directory`
    #[serde(default = "default_settings_file_name")]
    pub file_name: String,
}

fn default_settings_directory() -> String {
    ".claude".to_string()
}

fn default_settings_file_name() -> String {
    "settings.local.json".to_string()
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            directory: default_settings_directory(),
            file_name: default_settings_file_name(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Whether `region` has the shape of an AWS region code (`us-east-1`, `ap-southeast-2`).
pub fn is_valid_region(region: &str) -> bool {
    let parts: Vec<&str> = region.split('-').collect();
    parts.len() >= 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()))
        && parts[0].chars().all(|c| c.is_ascii_lowercase())
        && parts
            .last()
            .is_some_and(|p| p.chars().all(|c| c.is_ascii_digit()))
}
