//! claude-bedrock-setup - point the Claude desktop client at AWS Bedrock
//!
//! Verifies that the ambient AWS credentials can reach Bedrock and merges the
//! matching entries into the client's `.claude/settings.local.json`.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Settings and probe models, failure taxonomy, ports
//! - **Service Layer** (`services`): Credential verification
//! - **Infrastructure Layer** (`infrastructure`): Settings file, Bedrock probe, credentials, config, logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use claude_bedrock_setup::{SettingsDocument, SettingsStore};
//!
//! let store = SettingsStore::new();
//! let entries: SettingsDocument = [("AWS_REGION", "us-east-1")].into_iter().collect();
//! store.save(entries)?;
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{FailureKind, ProbeError, SettingsError, VerificationError};
pub use domain::models::{
    Config, CredentialProbeResult, LoadOutcome, LoggingConfig, ProbeFailure, ProviderConfig,
    SettingsConfig, SettingsDocument,
};
pub use domain::ports::{CredentialProbe, ProbeSuccess};
pub use infrastructure::bedrock::{BedrockProbe, BedrockProbeConfig};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::credentials::{CredentialChain, ResolvedCredentials};
pub use infrastructure::settings::SettingsStore;
pub use services::CredentialVerifier;
