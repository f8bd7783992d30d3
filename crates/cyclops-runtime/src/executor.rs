//! Pipeline executor
//!
//! Walks the module tree depth-first in declared order, assigning strictly
//! increasing step numbers in pre-order. Each module runs only while the
//! context is still successful; a failure is recorded on the context and
//! every remaining module is skipped at entry, without advancing the step
//! counter. Children run only after their parent succeeds, visualization
//! children first, then export, then data.

use crate::context::PipelineContext;
use crate::error::Result;
use crate::module::{Module, ModuleNode};
use tracing::info;

/// Depth-first tree runner
pub struct Executor;

impl Executor {
    /// Execute the given root modules against the context. Returns the
    /// final success state of the run.
    pub fn run(nodes: &mut [ModuleNode], ctx: &mut PipelineContext) -> bool {
        for node in nodes.iter_mut() {
            Self::run_node(node, ctx);
        }
        ctx.is_successful()
    }

    fn run_node(node: &mut ModuleNode, ctx: &mut PipelineContext) {
        // Cooperative skip: an upstream failure stops everything downstream
        // without touching the step counter.
        if !ctx.is_successful() {
            return;
        }

        let step = ctx.advance_step();
        node.module.set_step_number(step);
        info!(
            module = node.module.name(),
            step,
            total = ctx.total_steps(),
            "running module"
        );

        if let Err(err) = Self::run_module(node.module.as_mut(), ctx) {
            ctx.record_failure(node.module.name(), step, &err);
            return;
        }

        for index in node.child_execution_order() {
            Self::run_node(&mut node.children[index], ctx);
        }
    }

    fn run_module(module: &mut dyn Module, ctx: &mut PipelineContext) -> Result<()> {
        module.check_parameters(ctx)?;
        module.perform_operation(ctx)
    }
}
