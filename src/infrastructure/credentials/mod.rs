//! Credentials management infrastructure
//!
//! Ambient AWS credential resolution:
//! - Bedrock API key and access keys from the environment
//! - Shared credentials file profiles
//! - Signature Version 4 request signing
//!
//! Credentials are held in memory for one probe and never written anywhere.

pub mod chain;
pub mod sigv4;

pub use chain::{
    AwsCredentials, CredentialChain, CredentialError, CredentialProvider, EnvironmentProvider,
    ProfileProvider, ResolvedCredentials,
};
