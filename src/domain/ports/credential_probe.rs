use async_trait::async_trait;

use crate::domain::errors::ProbeError;

/// Successful answer from the provider's listing endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeSuccess {
    /// Where the credentials used for the call came from
    pub credential_source: String,
    /// Model identifiers visible to these credentials
    pub models: Vec<String>,
}

/// Port for a non-billable call that proves credentials work.
///
/// Implementations make exactly one request and never retry; classifying
/// the failure is their job, deciding what to do about it is the caller's.
#[async_trait]
pub trait CredentialProbe: Send + Sync {
    async fn probe(&self) -> Result<ProbeSuccess, ProbeError>;
}
