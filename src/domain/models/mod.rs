pub mod config;
pub mod probe;
pub mod settings;

pub use config::{is_valid_region, Config, LoggingConfig, ProviderConfig, SettingsConfig};
pub use probe::{CredentialProbeResult, ProbeFailure};
pub use settings::{LoadOutcome, SettingsDocument};
