//! Central tendency module
//!
//! Mean- or median-centers a table via the engine's `MeanCenter.Div`
//! contract.

use crate::command::{self, RFunction};
use crate::context::PipelineContext;
use crate::error::Result;
use crate::module::{check_required_parameters, required_value, Module};
use cyclops_core::ParameterSet;
use tracing::debug;

#[derive(Debug)]
pub struct CentralTendency {
    parameters: ParameterSet,
    step_number: u32,
}

impl CentralTendency {
    pub const NAME: &'static str = "CentralTendency";

    const REQUIRED: &'static [&'static str] =
        &["NewTableName", "InputTableName", "MeanCenter", "Center"];

    pub fn new(parameters: ParameterSet) -> Self {
        Self {
            parameters,
            step_number: 0,
        }
    }

    pub fn boxed(parameters: ParameterSet) -> Box<dyn Module> {
        Box::new(Self::new(parameters))
    }

    fn build_command(&self) -> Result<String> {
        let new_table = required_value(&self.parameters, "NewTableName")?;
        let input = command::symbol(
            "InputTableName",
            required_value(&self.parameters, "InputTableName")?,
        )?;
        let mean = command::logical("MeanCenter", required_value(&self.parameters, "MeanCenter")?)?;
        let center = command::logical("Center", required_value(&self.parameters, "Center")?)?;

        let call = RFunction::new("MeanCenter.Div")
            .arg("Data", input)
            .arg("Mean", mean)
            .arg("centerZero", center)
            .build();
        command::assign(new_table, &call)
    }
}

impl Module for CentralTendency {
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

    fn check_parameters(&self, ctx: &PipelineContext) -> Result<()> {
        check_required_parameters(self)?;
        ctx.table(required_value(&self.parameters, "InputTableName")?)
            .require_exists()
    }

    fn perform_operation(&mut self, ctx: &mut PipelineContext) -> Result<()> {
        let cmd = self.build_command()?;
        debug!(module = Self::NAME, step = self.step_number, command = %cmd, "submitting");
        ctx.workspace().execute(&cmd)?;
        Ok(())
    }
}
