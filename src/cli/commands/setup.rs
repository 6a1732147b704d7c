//! Implementation of the `claude-bedrock-setup setup` command.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use tracing::warn;

use crate::cli::output::{action_success, action_warning, output, CommandOutput};
use crate::domain::errors::VerificationError;
use crate::domain::models::{is_valid_region, Config, ProbeFailure, ProviderConfig, SettingsDocument};
use crate::infrastructure::settings::SettingsStore;

use super::verify::{probe_credentials, require_verified};
use super::ProviderArgs;

/// Switches the client over to Bedrock
pub const USE_BEDROCK_KEY: &str = "CLAUDE_CODE_USE_BEDROCK";
pub const REGION_KEY: &str = "AWS_REGION";
pub const MODEL_KEY: &str = "ANTHROPIC_MODEL";
pub const PROFILE_KEY: &str = "AWS_PROFILE";

/// Cross-region inference profile prefixes that wrap a base model id
const INFERENCE_PROFILE_PREFIXES: &[&str] = &["us.", "eu.", "apac.", "global."];

#[derive(Args, Debug, Clone, Default)]
pub struct SetupArgs {
    #[command(flatten)]
    pub provider: ProviderArgs,

    /// Model id or inference profile to configure
    #[arg(short, long)]
    pub model: Option<String>,

    /// Write the settings without probing Bedrock first
    #[arg(long)]
    pub skip_verify: bool,
}

#[derive(Debug, Serialize)]
pub struct SetupOutput {
    pub success: bool,
    pub settings_path: PathBuf,
    pub verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_source: Option<String>,
    pub settings: SettingsDocument,
    pub warnings: Vec<String>,
}

impl CommandOutput for SetupOutput {
    fn to_human(&self) -> String {
        let mut lines = Vec::new();
        for warning in &self.warnings {
            lines.push(action_warning(warning));
        }
        if let Some(source) = &self.credential_source {
            lines.push(action_success(&format!("AWS credentials verified ({source})")));
        }
        lines.push(action_success(&format!(
            "Bedrock settings written to {}",
            self.settings_path.display()
        )));
        for key in [USE_BEDROCK_KEY, REGION_KEY, MODEL_KEY, PROFILE_KEY] {
            if let Some(value) = self.settings.get_str(key) {
                lines.push(format!("  {key}={value}"));
            }
        }
        lines.join("\n")
    }
}

/// Settings entries enabling Bedrock for the given provider
pub fn bedrock_entries(provider: &ProviderConfig) -> SettingsDocument {
    let mut entries = SettingsDocument::new();
    entries.insert(USE_BEDROCK_KEY, "1");
    entries.insert(REGION_KEY, provider.region.as_str());
    entries.insert(MODEL_KEY, provider.model.as_str());
    if let Some(profile) = &provider.profile {
        entries.insert(PROFILE_KEY, profile.as_str());
    }
    entries
}

/// Keys this tool owns that must not outlive the flag that set them
pub fn stale_keys(provider: &ProviderConfig) -> Vec<&'static str> {
    if provider.profile.is_none() {
        vec![PROFILE_KEY]
    } else {
        Vec::new()
    }
}

/// Model id with any cross-region inference profile prefix removed
pub fn base_model_id(model: &str) -> &str {
    INFERENCE_PROFILE_PREFIXES
        .iter()
        .find_map(|prefix| model.strip_prefix(prefix))
        .unwrap_or(model)
}

/// Whether `model` (or the base model behind an inference profile) was listed
pub fn model_available(model: &str, available: &[String]) -> bool {
    let base = base_model_id(model);
    available.iter().any(|m| m == model || m == base)
}

pub async fn execute(args: SetupArgs, config: &Config, json_mode: bool) -> Result<()> {
    let mut provider = args.provider.apply(&config.provider);
    if let Some(model) = args.model {
        provider.model = model;
    }

    let mut warnings = Vec::new();
    let mut credential_source = None;

    if args.skip_verify {
        if !is_valid_region(&provider.region) {
            return Err(VerificationError {
                failure: ProbeFailure::RegionMisconfigured,
                diagnostic: format!(
                    "'{}' is not a valid AWS region (expected e.g. us-east-1)",
                    provider.region
                ),
            }
            .into());
        }
        warnings.push("Credential verification skipped".to_string());
    } else {
        let result = probe_credentials(&provider, json_mode).await?;
        require_verified(&result)?;
        if !result.models.is_empty() && !model_available(&provider.model, &result.models) {
            warn!(model = %provider.model, "model not reported by Bedrock");
            warnings.push(format!(
                "Model {} was not listed by Bedrock in {}; check model access in the console",
                provider.model, provider.region
            ));
        }
        credential_source = result.credential_source;
    }

    let store = SettingsStore::from_config(&config.settings);
    let report = store
        .update(bedrock_entries(&provider), &stale_keys(&provider))
        .with_context(|| format!("Failed to save {}", store.path().display()))?;
    if let Some(reason) = report.replaced_corrupt {
        warnings.push(format!(
            "{} was not valid JSON ({reason}) and has been replaced",
            store.path().display()
        ));
    }

    output(
        &SetupOutput {
            success: true,
            settings_path: store.path().to_path_buf(),
            verified: !args.skip_verify,
            credential_source,
            settings: report.document,
            warnings,
        },
        json_mode,
    );
    Ok(())
}
