//! The module contract
//!
//! A module is one pipeline step. It owns its parameter bag and step number,
//! declares which parameter keys it requires and which optional keys it
//! recognizes, validates its preconditions against the workspace, and
//! performs its effect by submitting command text to the engine. Modules are
//! created by the registry, wired into a tree, and executed exactly once per
//! run.

use crate::context::PipelineContext;
use crate::error::{Result, RuntimeError};
use cyclops_core::{ModuleCategory, ParameterSet};
use indexmap::IndexMap;
use tracing::warn;

/// One pipeline step
pub trait Module: std::fmt::Debug {
    /// Module type name, also used for registry lookup
    fn name(&self) -> &str;

    /// Category, which controls sibling ordering during child execution
    fn category(&self) -> ModuleCategory {
        ModuleCategory::Data
    }

    /// The parameter bag supplied to this instance
    fn parameters(&self) -> &ParameterSet;

    /// Step number assigned by the executor (0 before execution)
    fn step_number(&self) -> u32;

    fn set_step_number(&mut self, step: u32);

    /// Required parameter keys, in schema order; fixed per module type
    fn required_parameters(&self) -> &[&str];

    /// Recognized optional keys with their compiled-in defaults
    fn optional_parameters(&self) -> &[(&str, &str)] {
        &[]
    }

    /// Every recognized key mapped to its default value: required keys map
    /// to the empty string, optional keys to their defaults. Pure function
    /// of the module type.
    fn parameter_template(&self) -> IndexMap<String, String> {
        let mut template = IndexMap::new();
        for key in self.required_parameters() {
            template.insert(key.to_string(), String::new());
        }
        for (key, default) in self.optional_parameters() {
            template.insert(key.to_string(), default.to_string());
        }
        template
    }

    /// Validate required keys and workspace preconditions. Never mutates
    /// the workspace; the returned error distinguishes a missing key from a
    /// missing object, a missing column, and a shape disagreement.
    fn check_parameters(&self, ctx: &PipelineContext) -> Result<()>;

    /// Perform the module's effect. Called by the executor only while the
    /// pipeline is successful and only after `check_parameters` passed.
    fn perform_operation(&mut self, ctx: &mut PipelineContext) -> Result<()>;
}

/// Validate that every required key is present with a non-empty value.
/// Every missing key is logged individually, tagged with the module name
/// and step number; the returned error names them all.
pub fn check_required_parameters(module: &dyn Module) -> Result<()> {
    let missing = module
        .parameters()
        .missing_required(module.required_parameters());
    if missing.is_empty() {
        return Ok(());
    }
    for key in &missing {
        warn!(
            module = module.name(),
            step = module.step_number(),
            "required parameter missing: {key}"
        );
    }
    Err(RuntimeError::MissingParameters { keys: missing })
}

/// Fetch a required parameter value, for use after validation or from
/// helpers that may run standalone
pub fn required_value<'a>(parameters: &'a ParameterSet, key: &str) -> Result<&'a str> {
    parameters
        .get_nonempty(key)
        .ok_or_else(|| RuntimeError::MissingParameters {
            keys: vec![key.to_string()],
        })
}

/// A module and its ordered children
#[derive(Debug)]
pub struct ModuleNode {
    pub module: Box<dyn Module>,
    pub children: Vec<ModuleNode>,
}

impl ModuleNode {
    pub fn new(module: Box<dyn Module>) -> Self {
        Self {
            module,
            children: Vec::new(),
        }
    }

    /// Attach a child; insertion order within a category is preserved
    pub fn add_child(&mut self, child: ModuleNode) {
        self.children.push(child);
    }

    /// Number of modules in this subtree
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(ModuleNode::count).sum::<usize>()
    }

    /// Child indices in execution order: visualization children first, then
    /// export, then data, stable within each category
    pub fn child_execution_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.children.len()).collect();
        order.sort_by_key(|&i| self.children[i].module.category().execution_rank());
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::MemoryWorkspace;
    use std::sync::Arc;

    #[derive(Debug)]
    struct StubModule {
        name: &'static str,
        category: ModuleCategory,
        parameters: ParameterSet,
        step_number: u32,
    }

    impl StubModule {
        fn new(name: &'static str, category: ModuleCategory) -> Self {
            Self {
                name,
                category,
                parameters: ParameterSet::new(),
                step_number: 0,
            }
        }
    }

    impl Module for StubModule {
        fn name(&self) -> &str {
            self.name
        }

        fn category(&self) -> ModuleCategory {
            self.category
        }

        fn parameters(&self) -> &ParameterSet {
            &self.parameters
        }

        fn step_number(&self) -> u32 {
            self.step_number
        }

        fn set_step_number(&mut self, step: u32) {
            self.step_number = step;
        }

        fn required_parameters(&self) -> &[&str] {
            &["InputTableName"]
        }

        fn optional_parameters(&self) -> &[(&str, &str)] {
            &[("Threshold", "3")]
        }

        fn check_parameters(&self, _ctx: &PipelineContext) -> Result<()> {
            check_required_parameters(self)
        }

        fn perform_operation(&mut self, _ctx: &mut PipelineContext) -> Result<()> {
            Ok(())
        }
    }

    fn node(name: &'static str, category: ModuleCategory) -> ModuleNode {
        ModuleNode::new(Box::new(StubModule::new(name, category)))
    }

    #[test]
    fn test_parameter_template_is_idempotent() {
        let module = StubModule::new("Stub", ModuleCategory::Data);
        let first = module.parameter_template();
        let second = module.parameter_template();

        assert_eq!(first, second);
        assert_eq!(first.get("InputTableName").map(String::as_str), Some(""));
        assert_eq!(first.get("Threshold").map(String::as_str), Some("3"));
    }

    #[test]
    fn test_check_required_parameters_collects_all_missing() {
        let module = StubModule::new("Stub", ModuleCategory::Data);
        let ctx = PipelineContext::new(Arc::new(MemoryWorkspace::new()), "/tmp");

        let err = module.check_parameters(&ctx).unwrap_err();
        assert!(
            matches!(err, RuntimeError::MissingParameters { ref keys } if keys == &["InputTableName"])
        );
    }

    #[test]
    fn test_child_execution_order_groups_by_category() {
        // Children added in reverse category order: data, export, visualization
        let mut parent = node("Parent", ModuleCategory::Data);
        parent.add_child(node("DataChild", ModuleCategory::Data));
        parent.add_child(node("ExportChild", ModuleCategory::Export));
        parent.add_child(node("VizChild", ModuleCategory::Visualization));

        assert_eq!(parent.child_execution_order(), vec![2, 1, 0]);
    }

    #[test]
    fn test_child_execution_order_is_stable_within_category() {
        let mut parent = node("Parent", ModuleCategory::Data);
        parent.add_child(node("FirstData", ModuleCategory::Data));
        parent.add_child(node("Viz", ModuleCategory::Visualization));
        parent.add_child(node("SecondData", ModuleCategory::Data));

        assert_eq!(parent.child_execution_order(), vec![1, 0, 2]);
    }

    #[test]
    fn test_count() {
        let mut parent = node("Parent", ModuleCategory::Data);
        let mut mid = node("Mid", ModuleCategory::Data);
        mid.add_child(node("Leaf", ModuleCategory::Visualization));
        parent.add_child(mid);

        assert_eq!(parent.count(), 3);
    }
}
