//! Domain layer for claude-bedrock-setup
//!
//! Settings and probe models, the failure taxonomy, and the provider port.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{FailureKind, ProbeError, SettingsError, VerificationError};
