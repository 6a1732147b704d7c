use reqwest::StatusCode;
use thiserror::Error;

use crate::domain::errors::ProbeError;
use crate::domain::models::ProbeFailure;

/// Error responses from the Bedrock control plane
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BedrockApiError {
    /// Unknown access key, bad signature, malformed token
    #[error("Credentials rejected: {0}")]
    InvalidCredentials(String),

    /// Session token or API key past its expiry
    #[error("Credentials expired: {0}")]
    ExpiredCredentials(String),

    /// Identity lacks permission for bedrock:ListFoundationModels
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// Endpoint does not serve Bedrock (HTTP 404, UnknownOperation)
    #[error("Bedrock is not available at this endpoint: {0}")]
    ServiceNotFound(String),

    /// Request throttled (HTTP 429)
    #[error("Request throttled: {0}")]
    Throttled(String),

    /// Server error (HTTP 5xx)
    #[error("Server error ({0}): {1}")]
    ServerError(StatusCode, String),

    /// Any other status
    #[error("Unexpected response ({0}): {1}")]
    Unexpected(StatusCode, String),
}

impl BedrockApiError {
    /// Classify an error response.
    ///
    /// The AWS error type (`x-amzn-ErrorType` header or `__type` body field)
    /// is more specific than the status, so it is consulted first.
    pub fn from_response(status: StatusCode, error_type: Option<&str>, message: String) -> Self {
        if let Some(error_type) = error_type {
            let error_type = error_type.to_ascii_lowercase();
            if error_type.contains("expired") {
                return Self::ExpiredCredentials(message);
            }
            if [
                "unrecognizedclient",
                "invalidsignature",
                "incompletesignature",
                "invalidclienttokenid",
                "missingauthenticationtoken",
            ]
            .iter()
            .any(|t| error_type.contains(t))
            {
                return Self::InvalidCredentials(message);
            }
            if error_type.contains("accessdenied") {
                return Self::AccessDenied(message);
            }
            if error_type.contains("unknownoperation") {
                return Self::ServiceNotFound(message);
            }
            if error_type.contains("throttling") {
                return Self::Throttled(message);
            }
        }

        match status.as_u16() {
            401 | 403 => Self::AccessDenied(message),
            404 => Self::ServiceNotFound(message),
            429 => Self::Throttled(message),
            500..=599 => Self::ServerError(status, message),
            _ => Self::Unexpected(status, message),
        }
    }

    pub const fn failure(&self) -> ProbeFailure {
        match self {
            Self::InvalidCredentials(_) => ProbeFailure::InvalidCredentials,
            Self::ExpiredCredentials(_) => ProbeFailure::ExpiredCredentials,
            Self::AccessDenied(_) => ProbeFailure::AccessDenied,
            Self::ServiceNotFound(_) => ProbeFailure::RegionMisconfigured,
            Self::Throttled(_) | Self::ServerError(_, _) => ProbeFailure::ServiceUnavailable,
            Self::Unexpected(_, _) => ProbeFailure::UnexpectedResponse,
        }
    }
}

impl From<BedrockApiError> for ProbeError {
    fn from(err: BedrockApiError) -> Self {
        Self::new(err.failure(), err.to_string())
    }
}

/// Strip the namespace suffix AWS appends to `x-amzn-ErrorType`
pub fn normalize_error_type(raw: &str) -> &str {
    let name = raw.split(':').next().unwrap_or(raw);
    name.rsplit('#').next().unwrap_or(name).trim()
}
