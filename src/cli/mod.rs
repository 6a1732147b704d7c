//! Command-line interface.
//!
//! Thin layer over the settings store and credential verifier: parses flags,
//! applies them over the loaded configuration, renders results, and decides
//! exit codes.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use console::style;
use serde_json::json;

use crate::domain::errors::{FailureKind, SettingsError, VerificationError};
use crate::infrastructure::config::ConfigError;

use commands::reset::ResetArgs;
use commands::setup::SetupArgs;
use commands::status::StatusArgs;
use commands::verify::VerifyArgs;

#[derive(Parser, Debug)]
#[command(name = "claude-bedrock-setup")]
#[command(about = "Configure the Claude desktop client to use AWS Bedrock", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Verify AWS credentials and write the Bedrock settings
    Setup(SetupArgs),

    /// Check that AWS credentials can reach Bedrock without changing anything
    Verify(VerifyArgs),

    /// Show the current settings file
    Status(StatusArgs),

    /// Remove the settings file
    Reset(ResetArgs),
}

/// Failure kind of an error chain, when it carries one
pub fn failure_kind(err: &anyhow::Error) -> Option<FailureKind> {
    err.chain().find_map(|cause| {
        if let Some(e) = cause.downcast_ref::<VerificationError>() {
            Some(e.kind())
        } else {
            cause.downcast_ref::<SettingsError>().map(SettingsError::kind)
        }
    })
}

fn suggestion(err: &anyhow::Error) -> &'static str {
    match failure_kind(err) {
        Some(kind) => kind.suggestion(),
        None if err.chain().any(|c| c.is::<ConfigError>() || c.is::<figment::Error>()) => {
            "Fix .bedrock-setup.yaml or the BEDROCK_SETUP_* environment variables."
        }
        None => "Re-run with --verbose for details.",
    }
}

/// Render an error and exit with status 1.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    let kind = failure_kind(&err);
    let failure = err
        .chain()
        .find_map(|c| c.downcast_ref::<VerificationError>())
        .map(|e| e.failure);

    if json_mode {
        let body = json!({
            "success": false,
            "error": format!("{err:#}"),
            "kind": kind,
            "failure": failure,
            "suggestion": suggestion(&err),
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        let label = kind.map_or("error", FailureKind::as_str);
        eprintln!("{} {err:#}", style(format!("{label} error:")).red().bold());
        eprintln!("{}", style(suggestion(&err)).dim());
    }

    std::process::exit(1);
}
