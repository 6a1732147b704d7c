//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - JSON or compact human formatting
//! - `RUST_LOG` overrides

pub mod logger;

pub use logger::{LogFormat, LoggerImpl};
