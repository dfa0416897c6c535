//! Error types for the framing buffers
//!
//! Only caller misuse is reported here. Running out of space or data is a
//! normal condition and is signalled with a plain `bool` by every buffer.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FramingError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Write request (offset: {offset}, count: {count}) exceeds input bounds ({len})")]
    Range {
        offset: usize,
        count: usize,
        len: usize,
    },
}

pub type Result<T> = std::result::Result<T, FramingError>;

impl FramingError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        FramingError::InvalidConfiguration(msg.into())
    }

    pub(crate) fn shape(msg: impl Into<String>) -> Self {
        FramingError::ShapeMismatch(msg.into())
    }
}
