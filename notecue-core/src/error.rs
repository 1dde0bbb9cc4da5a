//! Error types for the span layer

use thiserror::Error;

/// Errors raised by span geometry operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpanError {
    /// Token indices are out of order or fall outside the document.
    #[error("invalid span order at token {position}")]
    InvalidSpanOrder {
        /// Token index where the violation was detected.
        position: usize,
    },
}

/// Result type for span operations.
pub type Result<T> = std::result::Result<T, SpanError>;
