//! Workspace interface
//!
//! The workspace is the external statistical engine's named-object store:
//! tables and vectors live there under string names, and modules act on it
//! by submitting command text. The engine itself is out of scope; this trait
//! is the surface the pipeline consumes. `MemoryWorkspace` is an in-process
//! stand-in used by tests and examples.
//!
//! Existence and shape are queried, never cached: earlier modules may have
//! created, renamed, or removed any object, so callers re-check immediately
//! before acting.

pub mod memory;

pub use memory::MemoryWorkspace;

use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

/// Workspace-level error
#[derive(Error, Debug)]
pub enum WorkspaceError {
    /// Named object is not present in the workspace
    #[error("object '{0}' not found")]
    ObjectNotFound(String),

    /// The engine rejected or failed a submitted command
    #[error("engine command failed: {0}")]
    CommandFailed(String),

    /// A snapshot could not be written or read
    #[error("snapshot failed: {0}")]
    SnapshotFailed(String),

    /// An engine-side dependency could not be installed
    #[error("dependency '{0}' could not be installed")]
    DependencyFailed(String),
}

/// Result type for workspace operations
pub type WorkspaceResult<T> = std::result::Result<T, WorkspaceError>;

/// The named-object store and command executor of the external engine
pub trait Workspace {
    /// True if an object with this name exists
    fn exists(&self, name: &str) -> bool;

    /// Column names of a table, in table order
    fn column_names(&self, table: &str) -> WorkspaceResult<Vec<String>>;

    /// True if the table exists and contains the column
    fn has_column(&self, table: &str, column: &str) -> bool {
        self.column_names(table)
            .map(|columns| columns.iter().any(|c| c == column))
            .unwrap_or(false)
    }

    /// Length of a vector, or row count of a table
    fn vector_length(&self, name: &str) -> WorkspaceResult<usize>;

    /// Submit command text to the engine for execution
    fn execute(&self, command: &str) -> WorkspaceResult<()>;

    /// Persist the full workspace image to a file
    fn save_snapshot(&self, path: &Path) -> WorkspaceResult<()>;

    /// Restore a workspace image from a file
    fn load_snapshot(&self, path: &Path) -> WorkspaceResult<()>;

    /// Install an engine-side dependency package
    fn install_dependency(&self, name: &str) -> WorkspaceResult<()>;

    /// True if an engine-side dependency package is available
    fn is_dependency_installed(&self, name: &str) -> bool;
}

/// Generate a temporary object name: the caller's prefix plus a
/// process-unique suffix. Two calls with the same prefix never collide
/// within one run.
pub fn temporary_object_name(prefix: &str) -> String {
    format!("{}{}", prefix, Uuid::new_v4().simple())
}
