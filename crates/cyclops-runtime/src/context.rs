//! Pipeline execution context
//!
//! One `PipelineContext` is created per pipeline run and threaded through
//! every module: it owns the workspace handle, the step counter, and the
//! run's success state. The state machine is one-way: `Running` transitions
//! to `Failed` on the first error and never back within a run; recovery is
//! an operator reloading a persisted snapshot and rerunning.

use crate::error::{Result, RuntimeError};
use crate::handle::TableHandle;
use crate::workspace::{self, Workspace};
use cyclops_core::ParameterSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Run state of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Modules continue to execute
    Running,
    /// A module failed; every remaining module is skipped
    Failed,
}

/// Shared per-run execution state
pub struct PipelineContext {
    workspace: Arc<dyn Workspace>,
    work_dir: PathBuf,
    snapshot_path: Option<PathBuf>,
    snapshot_on_failure: bool,
    run_parameters: ParameterSet,
    current_step: u32,
    total_steps: usize,
    state: PipelineState,
    failure: Option<String>,
}

impl PipelineContext {
    /// Create a context for one pipeline run. `work_dir` is where side
    /// artifacts (plots, exports, debug snapshots) are written.
    pub fn new(workspace: Arc<dyn Workspace>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            workspace,
            work_dir: work_dir.into(),
            snapshot_path: None,
            snapshot_on_failure: false,
            run_parameters: ParameterSet::new(),
            current_step: 0,
            total_steps: 0,
            state: PipelineState::Running,
            failure: None,
        }
    }

    /// Set run-level parameters, merged into every module at tree build
    pub fn with_run_parameters(mut self, parameters: ParameterSet) -> Self {
        self.run_parameters = parameters;
        self
    }

    /// Set the workspace image file used for crash-recovery dumps
    pub fn with_snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }

    /// Persist a full workspace snapshot whenever a module fails
    pub fn with_snapshot_on_failure(mut self, enabled: bool) -> Self {
        self.snapshot_on_failure = enabled;
        self
    }

    pub fn workspace(&self) -> &dyn Workspace {
        self.workspace.as_ref()
    }

    /// A handle for a named workspace object
    pub fn table(&self, name: impl Into<String>) -> TableHandle {
        TableHandle::new(self.workspace.clone(), name)
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Directory for generated plots, created on demand
    pub fn ensure_plots_dir(&self) -> Result<PathBuf> {
        let dir = self.work_dir.join("Plots");
        if !dir.exists() {
            std::fs::create_dir_all(&dir).map_err(|e| {
                RuntimeError::ExternalExecutionFailure {
                    message: format!("could not create {}: {e}", dir.display()),
                }
            })?;
        }
        Ok(dir)
    }

    pub fn run_parameters(&self) -> &ParameterSet {
        &self.run_parameters
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// True while no module has failed
    pub fn is_successful(&self) -> bool {
        self.state == PipelineState::Running
    }

    pub fn current_step(&self) -> u32 {
        self.current_step
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn set_total_steps(&mut self, total: usize) {
        self.total_steps = total;
    }

    /// Assign the next step number, in execution order
    pub fn advance_step(&mut self) -> u32 {
        self.current_step += 1;
        self.current_step
    }

    /// Message of the failure that stopped the run, if any
    pub fn failure_message(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Record a module failure: log it with its module name and step
    /// number, transition to `Failed`, and optionally persist a workspace
    /// snapshot for post-mortem inspection.
    pub fn record_failure(&mut self, module: &str, step: u32, err: &RuntimeError) {
        error!(module, step, error = %err, "module failed");
        if self.failure.is_none() {
            self.failure = Some(format!("step {step} ({module}): {err}"));
        }
        self.state = PipelineState::Failed;

        if self.snapshot_on_failure {
            self.save_debug_snapshot(module, step);
        }
    }

    /// Persist the full workspace image for offline debugging
    pub fn save_debug_snapshot(&self, module: &str, step: u32) {
        let path = self
            .snapshot_path
            .clone()
            .unwrap_or_else(|| self.work_dir.join("Results.RData"));
        info!(module, step, path = %path.display(), "saving workspace snapshot");
        if let Err(err) = self.workspace.save_snapshot(&path) {
            warn!(module, step, error = %err, "workspace snapshot failed");
        }
    }

    /// Generate a temporary object name unique within this run
    pub fn temporary_table_name(&self, prefix: &str) -> String {
        workspace::temporary_object_name(prefix)
    }

    /// Make sure an engine-side package is available, installing it if the
    /// engine reports it absent
    pub fn ensure_dependency(&self, package: &str) -> Result<()> {
        if self.workspace.is_dependency_installed(package) {
            return Ok(());
        }
        info!(package, "installing engine dependency");
        self.workspace.install_dependency(package)?;
        Ok(())
    }
}
