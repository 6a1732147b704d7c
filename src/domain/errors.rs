//! Domain errors for claude-bedrock-setup.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::models::ProbeFailure;

/// Coarse failure classification shown to the operator.
///
/// Automated callers branch on this rather than on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Directory or file could not be created, written, or removed
    Io,
    /// Existing settings file is malformed
    Parse,
    /// Credentials missing, rejected, or unauthorized
    Credential,
    /// Provider unreachable, slow, or unavailable
    Connectivity,
}

impl FailureKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Io => "io",
            Self::Parse => "parse",
            Self::Credential => "credential",
            Self::Connectivity => "connectivity",
        }
    }

    /// Next step for the operator
    pub const fn suggestion(self) -> &'static str {
        match self {
            Self::Io => "Check permissions and free space for the settings directory.",
            Self::Parse => {
                "The existing settings file is not valid JSON and will be replaced on the next setup."
            }
            Self::Credential => {
                "Reconfigure AWS credentials (aws configure, AWS_PROFILE, or AWS_BEARER_TOKEN_BEDROCK) and check the region."
            }
            Self::Connectivity => "Check your network connection and retry.",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failures persisting the settings document. Reads never fail.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to create settings directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write settings file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove settings file {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl SettingsError {
    pub const fn kind(&self) -> FailureKind {
        FailureKind::Io
    }
}

/// A classified failure from the credential probe port.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{failure}: {message}")]
pub struct ProbeError {
    pub failure: ProbeFailure,
    pub message: String,
}

impl ProbeError {
    pub fn new(failure: ProbeFailure, message: impl Into<String>) -> Self {
        Self {
            failure,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> FailureKind {
        self.failure.kind()
    }
}

/// Raised by the CLI when the operator's credentials did not verify.
#[derive(Debug, Clone, Error)]
#[error("Credential verification failed ({failure}): {diagnostic}")]
pub struct VerificationError {
    pub failure: ProbeFailure,
    pub diagnostic: String,
}

impl VerificationError {
    pub const fn kind(&self) -> FailureKind {
        self.failure.kind()
    }
}
