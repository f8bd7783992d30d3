//! In-memory workspace
//!
//! Simple memory-based workspace for testing and development. Tracks object
//! names and shapes rather than real data, records every submitted command,
//! and interprets plain assignment and removal commands so that pipeline
//! behavior can be exercised without an embedded engine.

use super::{Workspace, WorkspaceError, WorkspaceResult};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Shape of a stored table: ordered column names and a row count
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectShape {
    pub columns: Vec<String>,
    pub rows: usize,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct State {
    tables: HashMap<String, ObjectShape>,
    vectors: HashMap<String, usize>,
    packages: HashSet<String>,
    #[serde(skip)]
    commands: Vec<String>,
    #[serde(skip)]
    fail_markers: Vec<String>,
}

/// In-memory workspace
///
/// Suitable for tests and development; object contents are not modeled, only
/// names and shapes. Commands of the form `name <- ...` create `name`, and
/// `rm(name)` removes it; anything else is recorded and accepted.
#[derive(Debug, Default)]
pub struct MemoryWorkspace {
    state: Mutex<State>,
}

impl MemoryWorkspace {
    /// Create an empty workspace
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a table with the given columns and row count
    pub fn define_table(&self, name: &str, columns: &[&str], rows: usize) {
        let shape = ObjectShape {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        };
        self.lock().tables.insert(name.to_string(), shape);
    }

    /// Seed a vector with the given length
    pub fn define_vector(&self, name: &str, length: usize) {
        self.lock().vectors.insert(name.to_string(), length);
    }

    /// Every command submitted so far, in submission order
    pub fn commands(&self) -> Vec<String> {
        self.lock().commands.clone()
    }

    /// Number of commands submitted so far
    pub fn command_count(&self) -> usize {
        self.lock().commands.len()
    }

    /// Names of every object currently present, sorted
    pub fn object_names(&self) -> Vec<String> {
        let state = self.lock();
        let mut names: Vec<String> = state
            .tables
            .keys()
            .chain(state.vectors.keys())
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Make any future command containing `marker` fail, for exercising
    /// engine-side failure paths
    pub fn fail_commands_containing(&self, marker: &str) {
        self.lock().fail_markers.push(marker.to_string());
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn apply_line(state: &mut State, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        if let Some(inner) = line.strip_prefix("rm(").and_then(|r| r.strip_suffix(')')) {
            let name = inner.trim();
            state.tables.remove(name);
            state.vectors.remove(name);
            return;
        }

        if let Some((target, _)) = line.split_once("<-") {
            let target = target.trim();
            if !target.is_empty() && !state.tables.contains_key(target) {
                state.tables.insert(target.to_string(), ObjectShape::default());
            }
        }
    }
}

impl Workspace for MemoryWorkspace {
    fn exists(&self, name: &str) -> bool {
        let state = self.lock();
        state.tables.contains_key(name) || state.vectors.contains_key(name)
    }

    fn column_names(&self, table: &str) -> WorkspaceResult<Vec<String>> {
        self.lock()
            .tables
            .get(table)
            .map(|shape| shape.columns.clone())
            .ok_or_else(|| WorkspaceError::ObjectNotFound(table.to_string()))
    }

    fn vector_length(&self, name: &str) -> WorkspaceResult<usize> {
        let state = self.lock();
        if let Some(length) = state.vectors.get(name) {
            return Ok(*length);
        }
        state
            .tables
            .get(name)
            .map(|shape| shape.rows)
            .ok_or_else(|| WorkspaceError::ObjectNotFound(name.to_string()))
    }

    fn execute(&self, command: &str) -> WorkspaceResult<()> {
        let mut state = self.lock();
        state.commands.push(command.to_string());

        if let Some(marker) = state
            .fail_markers
            .iter()
            .find(|marker| command.contains(marker.as_str()))
        {
            let marker = marker.clone();
            return Err(WorkspaceError::CommandFailed(format!(
                "command matched failure marker '{marker}'"
            )));
        }

        for line in command.lines() {
            Self::apply_line(&mut state, line);
        }
        Ok(())
    }

    fn save_snapshot(&self, path: &Path) -> WorkspaceResult<()> {
        let state = self.lock();
        let json = serde_json::to_string_pretty(&*state)
            .map_err(|e| WorkspaceError::SnapshotFailed(e.to_string()))?;
        std::fs::write(path, json).map_err(|e| {
            WorkspaceError::SnapshotFailed(format!("{}: {e}", path.display()))
        })
    }

    fn load_snapshot(&self, path: &Path) -> WorkspaceResult<()> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            WorkspaceError::SnapshotFailed(format!("{}: {e}", path.display()))
        })?;
        let loaded: State = serde_json::from_str(&json)
            .map_err(|e| WorkspaceError::SnapshotFailed(e.to_string()))?;

        let mut state = self.lock();
        state.tables = loaded.tables;
        state.vectors = loaded.vectors;
        state.packages = loaded.packages;
        Ok(())
    }

    fn install_dependency(&self, name: &str) -> WorkspaceResult<()> {
        self.lock().packages.insert(name.to_string());
        Ok(())
    }

    fn is_dependency_installed(&self, name: &str) -> bool {
        self.lock().packages.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_creates_object() {
        let workspace = MemoryWorkspace::new();
        assert!(!workspace.exists("T2"));

        workspace.execute("T2 <- (T1+0)*1").unwrap();
        assert!(workspace.exists("T2"));
        assert_eq!(workspace.commands(), vec!["T2 <- (T1+0)*1"]);
    }

    #[test]
    fn test_rm_removes_object() {
        let workspace = MemoryWorkspace::new();
        workspace.define_table("tmpTable_abc", &[], 0);

        workspace.execute("rm(tmpTable_abc)").unwrap();
        assert!(!workspace.exists("tmpTable_abc"));
    }

    #[test]
    fn test_multi_line_command() {
        let workspace = MemoryWorkspace::new();
        workspace.define_table("T1", &["A"], 10);

        workspace
            .execute("options(warn=-1)\ntmp <- T1\nT2 <- performAnova(Data=tmp)\nrm(tmp)")
            .unwrap();

        assert!(workspace.exists("T2"));
        assert!(!workspace.exists("tmp"));
    }

    #[test]
    fn test_column_introspection() {
        let workspace = MemoryWorkspace::new();
        workspace.define_table("T_Factors", &["Alias", "Fixed_Effect"], 12);

        assert_eq!(
            workspace.column_names("T_Factors").unwrap(),
            vec!["Alias", "Fixed_Effect"]
        );
        assert!(workspace.has_column("T_Factors", "Fixed_Effect"));
        assert!(!workspace.has_column("T_Factors", "Random_Effect"));
        assert!(!workspace.has_column("T_Missing", "Fixed_Effect"));
        assert!(matches!(
            workspace.column_names("T_Missing"),
            Err(WorkspaceError::ObjectNotFound(_))
        ));
    }

    #[test]
    fn test_vector_length_falls_back_to_table_rows() {
        let workspace = MemoryWorkspace::new();
        workspace.define_vector("v_Factors", 8);
        workspace.define_table("T1", &["A", "B"], 20);

        assert_eq!(workspace.vector_length("v_Factors").unwrap(), 8);
        assert_eq!(workspace.vector_length("T1").unwrap(), 20);
        assert!(workspace.vector_length("nope").is_err());
    }

    #[test]
    fn test_fail_marker() {
        let workspace = MemoryWorkspace::new();
        workspace.fail_commands_containing("performAnova");

        assert!(workspace.execute("T2 <- performAnova(Data=T1)").is_err());
        // The failing command is still recorded for inspection
        assert_eq!(workspace.command_count(), 1);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let workspace = MemoryWorkspace::new();
        workspace.define_table("T1", &["A", "B"], 5);
        workspace.install_dependency("outliers").unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Results.RData");
        workspace.save_snapshot(&path).unwrap();

        let restored = MemoryWorkspace::new();
        restored.load_snapshot(&path).unwrap();
        assert!(restored.exists("T1"));
        assert!(restored.is_dependency_installed("outliers"));
        assert_eq!(restored.column_names("T1").unwrap(), vec!["A", "B"]);
    }
}
