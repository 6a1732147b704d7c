//! Implementation of the `claude-bedrock-setup status` command.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::output::table::settings_table;
use crate::cli::output::{action_success, action_warning, output, CommandOutput};
use crate::domain::errors::FailureKind;
use crate::domain::models::{Config, LoadOutcome, SettingsDocument};
use crate::infrastructure::settings::SettingsStore;

use super::setup::USE_BEDROCK_KEY;

#[derive(Args, Debug, Clone, Default)]
pub struct StatusArgs {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingsState {
    Missing,
    Corrupt,
    Loaded,
}

#[derive(Debug, Serialize)]
pub struct StatusOutput {
    pub settings_path: PathBuf,
    pub state: SettingsState,
    pub bedrock_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<SettingsDocument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusOutput {
    pub fn from_outcome(settings_path: PathBuf, outcome: LoadOutcome) -> Self {
        match outcome {
            LoadOutcome::Missing => Self {
                settings_path,
                state: SettingsState::Missing,
                bedrock_enabled: false,
                settings: None,
                error: None,
            },
            LoadOutcome::Corrupt(reason) => Self {
                settings_path,
                state: SettingsState::Corrupt,
                bedrock_enabled: false,
                settings: None,
                error: Some(reason),
            },
            LoadOutcome::Loaded(document) => Self {
                settings_path,
                state: SettingsState::Loaded,
                bedrock_enabled: document.get_str(USE_BEDROCK_KEY) == Some("1"),
                settings: Some(document),
                error: None,
            },
        }
    }
}

impl CommandOutput for StatusOutput {
    fn to_human(&self) -> String {
        let path = self.settings_path.display();
        match (&self.state, &self.settings) {
            (SettingsState::Loaded, Some(document)) => {
                let mut lines = vec![if self.bedrock_enabled {
                    action_success(&format!("Bedrock is configured in {path}"))
                } else {
                    action_warning(&format!("{path} exists but does not enable Bedrock"))
                }];
                if !document.is_empty() {
                    lines.push(settings_table(document).to_string());
                }
                lines.join("\n")
            }
            (SettingsState::Corrupt, _) => format!(
                "{}\n  {}",
                action_warning(&format!(
                    "{path} is corrupt: {}",
                    self.error.as_deref().unwrap_or("unknown error")
                )),
                FailureKind::Parse.suggestion()
            ),
            _ => format!("Not configured ({path} does not exist). Run `claude-bedrock-setup setup`."),
        }
    }
}

pub fn execute(_args: StatusArgs, config: &Config, json_mode: bool) -> Result<()> {
    let store = SettingsStore::from_config(&config.settings);
    let status = StatusOutput::from_outcome(store.path().to_path_buf(), store.inspect());
    output(&status, json_mode);
    Ok(())
}
