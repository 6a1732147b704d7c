//! Infrastructure layer module
//!
//! This module contains all infrastructure adapters and external integrations:
//! - Settings file persistence
//! - AWS Bedrock credential probe
//! - Ambient credential resolution
//! - Configuration management
//! - Logging infrastructure
//!
//! Infrastructure implementations satisfy the port traits defined in the domain layer.

pub mod bedrock;
pub mod config;
pub mod credentials;
pub mod logging;
pub mod settings;
