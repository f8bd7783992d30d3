//! Run summaries
//!
//! A compact record of one pipeline run, written alongside the run's other
//! artifacts so an operator can see at a glance how far a run got and what
//! stopped it.

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Outcome of one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Workflow name
    pub workflow: String,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Modules in the workflow
    pub total_steps: usize,

    /// Highest step number reached before the run stopped
    pub steps_completed: u32,

    pub success: bool,

    /// Description of the failure that stopped the run, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl RunSummary {
    /// Write the summary as pretty-printed JSON
    pub fn write_json(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .with_context(|| format!("Failed to serialize run summary for '{}'", self.workflow))?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write run summary: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_round_trip() {
        let summary = RunSummary {
            workflow: "label_free_quantitation".to_string(),
            started_at: Utc::now(),
            finished_at: Utc::now(),
            total_steps: 7,
            steps_completed: 4,
            success: false,
            failure: Some("step 4 (Anova): external execution failure".to_string()),
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run_summary.json");
        summary.write_json(&path).unwrap();

        let json = std::fs::read_to_string(&path).unwrap();
        let back: RunSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back.workflow, summary.workflow);
        assert_eq!(back.steps_completed, 4);
        assert!(!back.success);
    }

    #[test]
    fn test_failure_omitted_when_successful() {
        let summary = RunSummary {
            workflow: "ok".to_string(),
            started_at: Utc::now(),
            finished_at: Utc::now(),
            total_steps: 2,
            steps_completed: 2,
            success: true,
            failure: None,
        };

        let json = serde_json::to_string(&summary).unwrap();
        assert!(!json.contains("failure"));
    }
}
