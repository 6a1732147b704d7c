//! Settings persistence infrastructure
//!
//! JSON settings document for the desktop client:
//! - Read with corruption tolerance
//! - Key-wise merge on save
//! - Rename-based writes

pub mod store;

pub use store::{SaveReport, SettingsStore, DEFAULT_SETTINGS_DIR, DEFAULT_SETTINGS_FILE};
