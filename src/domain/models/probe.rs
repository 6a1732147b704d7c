//! Outcome of a credential probe against the cloud provider.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::errors::FailureKind;

/// Why a credential probe did not verify.
///
/// Every variant maps onto exactly one [`FailureKind`], which is what an
/// automated caller should branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeFailure {
    /// No credentials found in the environment or shared credentials file
    MissingCredentials,
    /// Provider rejected the credentials (unknown key, bad signature)
    InvalidCredentials,
    /// Session token or API key has expired
    ExpiredCredentials,
    /// Credentials are valid but not authorized for the service
    AccessDenied,
    /// Region is malformed or does not offer the service
    RegionMisconfigured,
    /// Connection could not be established
    Network,
    /// Probe exceeded the configured timeout
    Timeout,
    /// Provider throttled the request or returned a server error
    ServiceUnavailable,
    /// Provider answered with something that could not be interpreted
    UnexpectedResponse,
}

impl ProbeFailure {
    pub const fn kind(self) -> FailureKind {
        match self {
            Self::MissingCredentials
            | Self::InvalidCredentials
            | Self::ExpiredCredentials
            | Self::AccessDenied
            | Self::RegionMisconfigured => FailureKind::Credential,
            Self::Network | Self::Timeout | Self::ServiceUnavailable | Self::UnexpectedResponse => {
                FailureKind::Connectivity
            }
        }
    }

    /// Whether running the probe again could plausibly succeed
    pub const fn is_transient(self) -> bool {
        matches!(self.kind(), FailureKind::Connectivity)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingCredentials => "missing_credentials",
            Self::InvalidCredentials => "invalid_credentials",
            Self::ExpiredCredentials => "expired_credentials",
            Self::AccessDenied => "access_denied",
            Self::RegionMisconfigured => "region_misconfigured",
            Self::Network => "network",
            Self::Timeout => "timeout",
            Self::ServiceUnavailable => "service_unavailable",
            Self::UnexpectedResponse => "unexpected_response",
        }
    }
}

impl fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one credential probe. Lives for a single invocation only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialProbeResult {
    pub verified: bool,

    /// Classified failure, `None` when verified
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<ProbeFailure>,

    /// Human-readable detail from the provider or transport
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,

    /// Where the credentials came from (e.g. "environment", "profile:dev")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_source: Option<String>,

    /// Model identifiers the provider reported
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub models: Vec<String>,
}

impl CredentialProbeResult {
    pub fn verified(credential_source: impl Into<String>, models: Vec<String>) -> Self {
        Self {
            verified: true,
            failure: None,
            diagnostic: None,
            credential_source: Some(credential_source.into()),
            models,
        }
    }

    pub fn failed(failure: ProbeFailure, diagnostic: impl Into<String>) -> Self {
        Self {
            verified: false,
            failure: Some(failure),
            diagnostic: Some(diagnostic.into()),
            credential_source: None,
            models: Vec::new(),
        }
    }

    /// Failure kind, `None` when verified
    pub fn kind(&self) -> Option<FailureKind> {
        self.failure.map(ProbeFailure::kind)
    }
}
