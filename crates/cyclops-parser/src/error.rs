//! Parser error types

use thiserror::Error;

/// Parser error
#[derive(Error, Debug)]
pub enum ParseError {
    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Missing required field
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Invalid field value
    #[error("Invalid value for field '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Two module records claim the same authored step number
    #[error("Duplicate step number {step} in workflow '{workflow}'")]
    DuplicateStep { workflow: String, step: u32 },
}

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, ParseError>;
