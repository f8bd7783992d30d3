//! Runtime error types

use crate::workspace::WorkspaceError;
use cyclops_core::CoreError;
use thiserror::Error;

/// Runtime error
///
/// Validation failures (`MissingParameters`, `MissingWorkspaceObject`,
/// `MissingColumn`, `DimensionMismatch`) are produced by precondition checks
/// and never cross a module boundary as a panic. `ExternalExecutionFailure`
/// wraps an engine-side command failure. `UnknownModuleType` is the one hard
/// construction-time failure: a workflow naming an unregistered module type
/// cannot even be built.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// One or more required parameter keys are absent or empty
    #[error("required parameters missing: {}", keys.join(", "))]
    MissingParameters { keys: Vec<String> },

    /// A parameter value could not be coerced to the expected shape
    #[error("invalid value for parameter '{key}': {message}")]
    InvalidParameter { key: String, message: String },

    /// A referenced object does not exist in the workspace
    #[error("workspace does not contain object '{object}'")]
    MissingWorkspaceObject { object: String },

    /// A referenced table exists but lacks a required column
    #[error("table '{table}' does not contain column '{column}'")]
    MissingColumn { table: String, column: String },

    /// Two workspace objects that must agree in shape do not
    #[error("dimension mismatch: {message}")]
    DimensionMismatch { message: String },

    /// A command submitted to the external engine failed
    #[error("external execution failure: {message}")]
    ExternalExecutionFailure { message: String },

    /// The workflow names a module type that is not registered
    #[error("unknown module type: {0}")]
    UnknownModuleType(String),
}

impl From<CoreError> for RuntimeError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::MissingParameters { keys } => RuntimeError::MissingParameters { keys },
            CoreError::InvalidParameter { key, message } => {
                RuntimeError::InvalidParameter { key, message }
            }
        }
    }
}

impl From<WorkspaceError> for RuntimeError {
    fn from(err: WorkspaceError) -> Self {
        RuntimeError::ExternalExecutionFailure {
            message: err.to_string(),
        }
    }
}

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;
