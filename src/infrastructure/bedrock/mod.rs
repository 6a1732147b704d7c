pub mod client;
pub mod errors;

pub use client::{BedrockProbe, BedrockProbeConfig};
pub use errors::BedrockApiError;
