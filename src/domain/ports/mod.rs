//! Port trait definitions (Hexagonal Architecture)
//!
//! - CredentialProbe: one side-effect-free call against the cloud provider
//!
//! Infrastructure adapters implement these so the verifier service can be
//! exercised without a network.

pub mod credential_probe;

pub use credential_probe::{CredentialProbe, ProbeSuccess};
