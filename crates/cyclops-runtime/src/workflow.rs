//! Live workflows
//!
//! A `Workflow` is the materialized form of a declarative definition: a tree
//! of module instances built through the registry, ready to execute. The
//! tree serializes back into the same definition shape it was built from,
//! so edited or completed workflows can be written out again.

use crate::context::PipelineContext;
use crate::error::Result;
use crate::executor::Executor;
use crate::module::ModuleNode;
use crate::registry::ModuleRegistry;
use crate::summary::RunSummary;
use chrono::Utc;
use cyclops_core::{ModuleDefinition, ParameterSet, WorkflowDefinition};
use cyclops_parser::WorkflowParser;
use std::path::Path;
use tracing::warn;

/// A materialized module tree
#[derive(Debug)]
pub struct Workflow {
    name: String,
    version: Option<String>,
    description: Option<String>,
    nodes: Vec<ModuleNode>,
}

impl Workflow {
    /// Build a live module tree from a definition. Run-level parameters are
    /// merged into every module's bag; keys the module record already sets
    /// win. Fails with `UnknownModuleType` on the first unregistered name.
    pub fn from_definition(
        definition: &WorkflowDefinition,
        registry: &ModuleRegistry,
        run_parameters: &ParameterSet,
    ) -> Result<Self> {
        let nodes = definition
            .modules
            .iter()
            .map(|record| Self::build_node(record, registry, run_parameters))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: definition.name.clone(),
            version: definition.version.clone(),
            description: definition.description.clone(),
            nodes,
        })
    }

    fn build_node(
        record: &ModuleDefinition,
        registry: &ModuleRegistry,
        run_parameters: &ParameterSet,
    ) -> Result<ModuleNode> {
        let mut parameters = record.parameters.clone();
        parameters.merge_defaults(run_parameters);

        let mut module = registry.create(&record.module, parameters)?;
        if let Some(step) = record.step {
            module.set_step_number(step);
        }
        if record.category != module.category() {
            warn!(
                module = %record.module,
                authored = %record.category,
                actual = %module.category(),
                "workflow record category does not match module type"
            );
        }

        let mut node = ModuleNode::new(module);
        for child in &record.children {
            node.add_child(Self::build_node(child, registry, run_parameters)?);
        }
        Ok(node)
    }

    /// Serialize the live tree back into definition records
    pub fn to_definition(&self) -> WorkflowDefinition {
        WorkflowDefinition {
            name: self.name.clone(),
            version: self.version.clone(),
            description: self.description.clone(),
            modules: self.nodes.iter().map(Self::node_to_record).collect(),
        }
    }

    fn node_to_record(node: &ModuleNode) -> ModuleDefinition {
        let step = node.module.step_number();
        ModuleDefinition {
            module: node.module.name().to_string(),
            step: (step > 0).then_some(step),
            category: node.module.category(),
            parameters: node.module.parameters().clone(),
            children: node.children.iter().map(Self::node_to_record).collect(),
        }
    }

    /// Parse a YAML definition and materialize it
    pub fn from_yaml(
        yaml: &str,
        registry: &ModuleRegistry,
        run_parameters: &ParameterSet,
    ) -> anyhow::Result<Self> {
        let definition = WorkflowParser::parse(yaml)?;
        Ok(Self::from_definition(&definition, registry, run_parameters)?)
    }

    /// Read a YAML definition file and materialize it
    pub fn load_file(
        path: impl AsRef<Path>,
        registry: &ModuleRegistry,
        run_parameters: &ParameterSet,
    ) -> anyhow::Result<Self> {
        let definition = WorkflowParser::read_file(path)?;
        Ok(Self::from_definition(&definition, registry, run_parameters)?)
    }

    /// Serialize the live tree to YAML
    pub fn to_yaml(&self) -> anyhow::Result<String> {
        Ok(WorkflowParser::to_yaml(&self.to_definition())?)
    }

    /// Write the live tree out as a YAML definition file
    pub fn write_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        WorkflowParser::write_file(&self.to_definition(), path)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nodes(&self) -> &[ModuleNode] {
        &self.nodes
    }

    /// Number of modules in the tree
    pub fn step_count(&self) -> usize {
        self.nodes.iter().map(ModuleNode::count).sum()
    }

    /// Execute the workflow. Returns the final success state; an empty
    /// workflow is a successful no-op.
    pub fn run(&mut self, ctx: &mut PipelineContext) -> bool {
        if self.nodes.is_empty() {
            warn!(workflow = %self.name, "no modules were detected in the workflow");
            return true;
        }
        ctx.set_total_steps(self.step_count());
        Executor::run(&mut self.nodes, ctx)
    }

    /// Execute the workflow and return a run summary
    pub fn run_with_summary(&mut self, ctx: &mut PipelineContext) -> RunSummary {
        let started_at = Utc::now();
        let success = self.run(ctx);
        RunSummary {
            workflow: self.name.clone(),
            started_at,
            finished_at: Utc::now(),
            total_steps: ctx.total_steps(),
            steps_completed: ctx.current_step(),
            success,
            failure: ctx.failure_message().map(String::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::MemoryWorkspace;
    use cyclops_core::ModuleCategory;
    use std::sync::Arc;

    fn sample_definition() -> WorkflowDefinition {
        WorkflowDefinition::new("transform_and_plot")
            .with_version("0.1.0")
            .add_module(
                ModuleDefinition::new("Transform")
                    .with_step(1)
                    .with_parameter("InputTableName", "T1")
                    .with_parameter("NewTableName", "T2")
                    .add_child(
                        ModuleDefinition::new("BarPlot")
                            .with_category(ModuleCategory::Visualization)
                            .with_parameter("TableName", "T2")
                            .with_parameter("PlotFileName", "t2.png")
                            .with_parameter("DataColumns", "Abundance"),
                    ),
            )
    }

    #[test]
    fn test_definition_round_trip() {
        let registry = ModuleRegistry::with_builtin_modules();
        let definition = sample_definition();

        let workflow =
            Workflow::from_definition(&definition, &registry, &ParameterSet::new()).unwrap();
        assert_eq!(workflow.step_count(), 2);
        assert_eq!(workflow.to_definition(), definition);
    }

    #[test]
    fn test_unknown_module_type_fails_at_build() {
        let registry = ModuleRegistry::with_builtin_modules();
        let definition = WorkflowDefinition::new("broken")
            .add_module(ModuleDefinition::new("NotARealModule"));

        let err = Workflow::from_definition(&definition, &registry, &ParameterSet::new())
            .unwrap_err();
        assert!(matches!(err, crate::error::RuntimeError::UnknownModuleType(_)));
    }

    #[test]
    fn test_run_parameters_merge_without_overwriting() {
        let registry = ModuleRegistry::with_builtin_modules();
        let run_parameters: ParameterSet =
            [("workDir", "/data/run7"), ("NewTableName", "T_Global")]
                .into_iter()
                .collect();

        let workflow = Workflow::from_definition(
            &sample_definition(),
            &registry,
            &run_parameters,
        )
        .unwrap();

        let transform = &workflow.nodes()[0].module;
        assert_eq!(transform.parameters().get("workDir"), Some("/data/run7"));
        // The record's own value wins over the run-level one
        assert_eq!(transform.parameters().get("NewTableName"), Some("T2"));
    }

    #[test]
    fn test_empty_workflow_is_a_successful_noop() {
        let mut workflow = Workflow {
            name: "empty".to_string(),
            version: None,
            description: None,
            nodes: Vec::new(),
        };
        let mut ctx = PipelineContext::new(Arc::new(MemoryWorkspace::new()), "/tmp");

        assert!(workflow.run(&mut ctx));
        assert_eq!(ctx.current_step(), 0);
    }
}
