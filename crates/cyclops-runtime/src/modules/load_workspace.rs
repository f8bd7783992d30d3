//! Load workspace module
//!
//! Restores a previously saved workspace image from the working directory,
//! the entry point for resuming a failed run from a chosen step.

use crate::context::PipelineContext;
use crate::error::Result;
use crate::module::{check_required_parameters, required_value, Module};
use cyclops_core::ParameterSet;
use tracing::info;

#[derive(Debug)]
pub struct LoadWorkspace {
    parameters: ParameterSet,
    step_number: u32,
}

impl LoadWorkspace {
    pub const NAME: &'static str = "LoadWorkspace";

    const REQUIRED: &'static [&'static str] = &["InputFileName"];

    pub fn new(parameters: ParameterSet) -> Self {
        Self {
            parameters,
            step_number: 0,
        }
    }

    pub fn boxed(parameters: ParameterSet) -> Box<dyn Module> {
        Box::new(Self::new(parameters))
    }
}

impl Module for LoadWorkspace {
    fn name(&self) -> &str {
        Self::NAME
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
        Self::REQUIRED
    }

    fn check_parameters(&self, _ctx: &PipelineContext) -> Result<()> {
        check_required_parameters(self)
    }

    fn perform_operation(&mut self, ctx: &mut PipelineContext) -> Result<()> {
        let path = ctx
            .work_dir()
            .join(required_value(&self.parameters, "InputFileName")?);
        info!(module = Self::NAME, step = self.step_number, path = %path.display(), "restoring workspace image");
        ctx.workspace().load_snapshot(&path)?;
        Ok(())
    }
}
