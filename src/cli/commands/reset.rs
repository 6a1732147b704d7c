//! Implementation of the `claude-bedrock-setup reset` command.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::output::{action_success, output, CommandOutput};
use crate::domain::models::Config;
use crate::infrastructure::settings::SettingsStore;

#[derive(Args, Debug, Clone, Default)]
pub struct ResetArgs {}

#[derive(Debug, Serialize)]
pub struct ResetOutput {
    pub success: bool,
    pub removed: bool,
    pub settings_path: PathBuf,
}

impl CommandOutput for ResetOutput {
    fn to_human(&self) -> String {
        if self.removed {
            action_success(&format!("Removed {}", self.settings_path.display()))
        } else {
            format!("Nothing to remove ({} does not exist)", self.settings_path.display())
        }
    }
}

pub fn execute(_args: ResetArgs, config: &Config, json_mode: bool) -> Result<()> {
    let store = SettingsStore::from_config(&config.settings);
    let removed = store
        .reset()
        .with_context(|| format!("Failed to reset {}", store.path().display()))?;

    output(
        &ResetOutput {
            success: true,
            removed,
            settings_path: store.path().to_path_buf(),
        },
        json_mode,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{SettingsConfig, SettingsDocument};
    use tempfile::TempDir;

    #[test]
    fn test_reset_removes_then_noops() {
        let temp = TempDir::new().unwrap();
        let config = Config {
            settings: SettingsConfig {
                directory: temp.path().join(".claude").to_string_lossy().into_owned(),
                ..SettingsConfig::default()
            },
            ..Config::default()
        };
        let store = SettingsStore::from_config(&config.settings);
        store
            .save([("AWS_REGION", "us-east-1")].into_iter().collect::<SettingsDocument>())
            .unwrap();

        execute(ResetArgs::default(), &config, true).unwrap();
        assert!(!store.path().exists());

        execute(ResetArgs::default(), &config, true).unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn test_human_output() {
        let out = ResetOutput {
            success: true,
            removed: false,
            settings_path: PathBuf::from(".claude/settings.local.json"),
        };
        assert!(out.to_human().contains("Nothing to remove"));
    }
}
