//! Table handles
//!
//! A `TableHandle` ties a workspace object name to the workspace it lives
//! in, so precondition checks are expressed against the handle instead of
//! loose strings. The underlying coupling is unchanged: the object may be
//! created, replaced, or removed by any module at any time, so every check
//! queries the workspace fresh.

use crate::error::{Result, RuntimeError};
use crate::workspace::Workspace;
use std::sync::Arc;

/// A named workspace object bound to its workspace
#[derive(Clone)]
pub struct TableHandle {
    workspace: Arc<dyn Workspace>,
    name: String,
}

impl TableHandle {
    pub fn new(workspace: Arc<dyn Workspace>, name: impl Into<String>) -> Self {
        Self {
            workspace,
            name: name.into(),
        }
    }

    /// The object name this handle refers to
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True if the object currently exists
    pub fn exists(&self) -> bool {
        self.workspace.exists(&self.name)
    }

    /// Column names, in table order
    pub fn column_names(&self) -> Result<Vec<String>> {
        Ok(self.workspace.column_names(&self.name)?)
    }

    /// True if the object exists and contains the column
    pub fn has_column(&self, column: &str) -> bool {
        self.workspace.has_column(&self.name, column)
    }

    /// Vector length, or table row count
    pub fn vector_length(&self) -> Result<usize> {
        Ok(self.workspace.vector_length(&self.name)?)
    }

    /// Fail with `MissingWorkspaceObject` unless the object exists
    pub fn require_exists(&self) -> Result<()> {
        if self.exists() {
            Ok(())
        } else {
            Err(RuntimeError::MissingWorkspaceObject {
                object: self.name.clone(),
            })
        }
    }

    /// Fail with `MissingColumn` unless the object exists and contains the
    /// column; the error names both the table and the column
    pub fn require_column(&self, column: &str) -> Result<()> {
        self.require_exists()?;
        if self.has_column(column) {
            Ok(())
        } else {
            Err(RuntimeError::MissingColumn {
                table: self.name.clone(),
                column: column.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::MemoryWorkspace;

    fn workspace_with_factors() -> Arc<MemoryWorkspace> {
        let workspace = Arc::new(MemoryWorkspace::new());
        workspace.define_table("T_Factors", &["Alias", "Fixed_Effect"], 12);
        workspace
    }

    #[test]
    fn test_require_exists() {
        let workspace = workspace_with_factors();

        let present = TableHandle::new(workspace.clone(), "T_Factors");
        assert!(present.require_exists().is_ok());

        let absent = TableHandle::new(workspace, "T_Missing");
        let err = absent.require_exists().unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::MissingWorkspaceObject { ref object } if object == "T_Missing"
        ));
    }

    #[test]
    fn test_require_column_names_table_and_column() {
        let workspace = workspace_with_factors();
        let handle = TableHandle::new(workspace, "T_Factors");

        assert!(handle.require_column("Fixed_Effect").is_ok());

        let err = handle.require_column("Random_Effect").unwrap_err();
        match err {
            RuntimeError::MissingColumn { table, column } => {
                assert_eq!(table, "T_Factors");
                assert_eq!(column, "Random_Effect");
            }
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_table_reported_before_missing_column() {
        let workspace = workspace_with_factors();
        let handle = TableHandle::new(workspace, "T_Missing");

        let err = handle.require_column("Fixed_Effect").unwrap_err();
        assert!(matches!(err, RuntimeError::MissingWorkspaceObject { .. }));
    }
}
