//! Workflow definition records
//!
//! A `WorkflowDefinition` is the declarative shape of a pipeline: an ordered
//! tree of module records, each naming a module type, an optional step
//! number, a category, a parameter bag, and nested children. Definitions are
//! produced by authoring tools, materialized into live module trees by the
//! runtime, and a live tree can be serialized back into this same shape.

use crate::category::ModuleCategory;
use crate::params::ParameterSet;
use serde::{Deserialize, Serialize};

/// A named, versioned workflow: an ordered list of root module records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    /// Workflow name (required)
    pub name: String,

    /// Optional version string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Optional description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Root modules, in declared order
    pub modules: Vec<ModuleDefinition>,
}

/// One module record in a workflow definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleDefinition {
    /// Module type name, resolved against the module registry
    pub module: String,

    /// Step number assigned by the authoring tool (optional; the executor
    /// assigns execution-order numbers at run time regardless)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<u32>,

    /// Category the record was authored under
    #[serde(default)]
    pub category: ModuleCategory,

    /// Parameters for the module instance
    #[serde(default, skip_serializing_if = "ParameterSet::is_empty")]
    pub parameters: ParameterSet,

    /// Child module records, in declared order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ModuleDefinition>,
}

impl WorkflowDefinition {
    /// Create a new empty workflow definition
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            description: None,
            modules: Vec::new(),
        }
    }

    /// Set the workflow version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the workflow description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a root module record
    pub fn add_module(mut self, module: ModuleDefinition) -> Self {
        self.modules.push(module);
        self
    }

    /// Total number of module records, children included
    pub fn module_count(&self) -> usize {
        self.modules.iter().map(ModuleDefinition::count).sum()
    }
}

impl ModuleDefinition {
    /// Create a record for a module type with no parameters
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            step: None,
            category: ModuleCategory::default(),
            parameters: ParameterSet::new(),
            children: Vec::new(),
        }
    }

    /// Set the authored step number
    pub fn with_step(mut self, step: u32) -> Self {
        self.step = Some(step);
        self
    }

    /// Set the category
    pub fn with_category(mut self, category: ModuleCategory) -> Self {
        self.category = category;
        self
    }

    /// Add one parameter
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.set(key, value);
        self
    }

    /// Replace the parameter bag
    pub fn with_parameters(mut self, parameters: ParameterSet) -> Self {
        self.parameters = parameters;
        self
    }

    /// Add a child record
    pub fn add_child(mut self, child: ModuleDefinition) -> Self {
        self.children.push(child);
        self
    }

    /// Number of records in this subtree
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(ModuleDefinition::count).sum::<usize>()
    }
}
