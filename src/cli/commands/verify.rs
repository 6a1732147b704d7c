//! Implementation of the `claude-bedrock-setup verify` command.

use anyhow::Result;
use clap::Args;
use console::Term;
use serde::Serialize;
use std::sync::Arc;

use crate::cli::output::progress::create_spinner;
use crate::cli::output::{action_success, output, CommandOutput};
use crate::domain::errors::VerificationError;
use crate::domain::models::{Config, CredentialProbeResult, ProbeFailure, ProviderConfig};
use crate::infrastructure::bedrock::BedrockProbe;
use crate::services::CredentialVerifier;

use super::ProviderArgs;

#[derive(Args, Debug, Clone, Default)]
pub struct VerifyArgs {
    #[command(flatten)]
    pub provider: ProviderArgs,
}

#[derive(Debug, Serialize)]
pub struct VerifyOutput {
    pub success: bool,
    pub region: String,
    #[serde(flatten)]
    pub result: CredentialProbeResult,
}

impl CommandOutput for VerifyOutput {
    fn to_human(&self) -> String {
        let source = self.result.credential_source.as_deref().unwrap_or("unknown source");
        let mut lines = vec![action_success(&format!(
            "AWS credentials verified for Bedrock in {} ({source})",
            self.region
        ))];
        if !self.result.models.is_empty() {
            lines.push(format!("\nAnthropic models available: {}", self.result.models.len()));
            for model in &self.result.models {
                lines.push(format!("  - {model}"));
            }
        }
        lines.join("\n")
    }
}

/// Probe Bedrock once with the ambient credentials, showing a spinner on a terminal.
pub async fn probe_credentials(
    provider: &ProviderConfig,
    json_mode: bool,
) -> Result<CredentialProbeResult> {
    let probe = BedrockProbe::ambient(provider)?;
    let verifier = CredentialVerifier::new(Arc::new(probe));

    let spinner = create_spinner(
        format!("Verifying AWS credentials for Bedrock in {}...", provider.region),
        !json_mode && Term::stderr().is_term(),
    );
    let result = verifier.verify().await;
    spinner.finish_and_clear();

    Ok(result)
}

/// Turn an unverified result into the error the CLI reports
pub fn require_verified(result: &CredentialProbeResult) -> Result<(), VerificationError> {
    if result.verified {
        return Ok(());
    }
    Err(VerificationError {
        failure: result.failure.unwrap_or(ProbeFailure::UnexpectedResponse),
        diagnostic: result
            .diagnostic
            .clone()
            .unwrap_or_else(|| "no diagnostic available".to_string()),
    })
}

pub async fn execute(args: VerifyArgs, config: &Config, json_mode: bool) -> Result<()> {
    let provider = args.provider.apply(&config.provider);
    let result = probe_credentials(&provider, json_mode).await?;
    require_verified(&result)?;

    output(
        &VerifyOutput {
            success: true,
            region: provider.region,
            result,
        },
        json_mode,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::FailureKind;

    #[test]
    fn test_require_verified_passes_success() {
        let result = CredentialProbeResult::verified("environment", vec![]);
        assert!(require_verified(&result).is_ok());
    }

    #[test]
    fn test_require_verified_keeps_failure() {
        let result = CredentialProbeResult::failed(ProbeFailure::ExpiredCredentials, "token expired");
        let err = require_verified(&result).unwrap_err();
        assert_eq!(err.failure, ProbeFailure::ExpiredCredentials);
        assert_eq!(err.kind(), FailureKind::Credential);
        assert_eq!(err.diagnostic, "token expired");
    }

    #[test]
    fn test_output_lists_models() {
        let out = VerifyOutput {
            success: true,
            region: "us-west-2".to_string(),
            result: CredentialProbeResult::verified(
                "profile:dev",
                vec!["anthropic.claude-3-haiku-20240307-v1:0".to_string()],
            ),
        };
        let human = out.to_human();
        assert!(human.contains("us-west-2"));
        assert!(human.contains("profile:dev"));
        assert!(human.contains("anthropic.claude-3-haiku-20240307-v1:0"));

        let json = out.to_json();
        assert_eq!(json["verified"], true);
        assert_eq!(json["region"], "us-west-2");
    }
}
