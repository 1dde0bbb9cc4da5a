//! Engine-level error types
//!
//! Wraps the span-layer errors from `notecue-core` and adds the
//! configuration and I/O failures the engine can hit on its own.

use notecue_core::SpanError;
use thiserror::Error;

/// Errors raised while building or running annotation components.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Span geometry violation from the core layer.
    #[error("span error: {0}")]
    Span(#[from] SpanError),

    /// A component was configured in a way that cannot work.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A regex pattern failed to compile.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// A configuration file failed to parse.
    #[error("configuration parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A configuration file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
