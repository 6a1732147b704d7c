//! CLI command implementations.

pub mod reset;
pub mod setup;
pub mod status;
pub mod verify;

use clap::Args;

use crate::domain::models::ProviderConfig;

/// Provider flags shared by `setup` and `verify`
#[derive(Args, Debug, Clone, Default)]
pub struct ProviderArgs {
    /// AWS region hosting Bedrock (defaults to us-east-1)
    #[arg(short, long)]
    pub region: Option<String>,

    /// Profile in the shared credentials file
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Override the Bedrock endpoint URL
    #[arg(long, hide = true)]
    pub endpoint_url: Option<String>,
}

impl ProviderArgs {
    /// Layer the flags over the loaded provider configuration
    pub fn apply(&self, base: &ProviderConfig) -> ProviderConfig {
        let mut provider = base.clone();
        if let Some(region) = &self.region {
            provider.region.clone_from(region);
        }
        if let Some(profile) = &self.profile {
            provider.profile = Some(profile.clone());
        }
        if let Some(endpoint_url) = &self.endpoint_url {
            provider.endpoint_url = Some(endpoint_url.clone());
        }
        provider
    }
}
