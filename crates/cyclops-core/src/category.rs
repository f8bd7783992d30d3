//! Module categories
//!
//! Every module belongs to one of three categories. When a module finishes,
//! its children run grouped by category: visualization children first, then
//! export children, then data children. Within a category, insertion order
//! is preserved.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a pipeline module
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleCategory {
    /// Plot-producing leaf modules
    Visualization,
    /// Modules that move tables out of the workspace (files, snapshots)
    Export,
    /// Modules that create or rewrite workspace tables
    #[default]
    Data,
}

impl ModuleCategory {
    /// Rank used to order sibling children at execution time
    pub fn execution_rank(self) -> u8 {
        match self {
            ModuleCategory::Visualization => 0,
            ModuleCategory::Export => 1,
            ModuleCategory::Data => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ModuleCategory::Visualization => "visualization",
            ModuleCategory::Export => "export",
            ModuleCategory::Data => "data",
        }
    }
}

impl fmt::Display for ModuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
