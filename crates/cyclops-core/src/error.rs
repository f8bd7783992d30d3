//! Error types for Cyclops Core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum CoreError {
    /// One or more required parameter keys are absent or empty
    #[error("required parameters missing: {}", keys.join(", "))]
    MissingParameters { keys: Vec<String> },

    /// A parameter value could not be coerced to the expected shape
    #[error("invalid value for parameter '{key}': {message}")]
    InvalidParameter { key: String, message: String },
}

pub type Result<T> = std::result::Result<T, CoreError>;
