//! Credential verification service.

use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::models::CredentialProbeResult;
use crate::domain::ports::CredentialProbe;

/// Confirms the ambient credentials can reach the inference service.
///
/// Never returns an error: every outcome, including transport failures,
/// becomes a [`CredentialProbeResult`] the caller can inspect.
pub struct CredentialVerifier<P: CredentialProbe> {
    probe: Arc<P>,
}

impl<P: CredentialProbe> CredentialVerifier<P> {
    pub fn new(probe: Arc<P>) -> Self {
        Self { probe }
    }

    /// Run the probe once.
    pub async fn verify(&self) -> CredentialProbeResult {
        match self.probe.probe().await {
            Ok(success) => {
                info!(
                    source = %success.credential_source,
                    models = success.models.len(),
                    "credentials verified"
                );
                CredentialProbeResult::verified(success.credential_source, success.models)
            }
            Err(err) => {
                warn!(failure = %err.failure, kind = %err.kind(), "credential verification failed");
                CredentialProbeResult::failed(err.failure, err.message)
            }
        }
    }
}
