//! Transform module
//!
//! Scales, offsets, and optionally log-transforms a table, writing the
//! result under a new name. With `LogBase` set, the transformation is
//! `log((data.matrix(input)+Add)*Scale, LogBase)`; without it, the plain
//! affine form `(input+Add)*Scale`.

use crate::command;
use crate::context::PipelineContext;
use crate::error::Result;
use crate::module::{check_required_parameters, required_value, Module};
use cyclops_core::ParameterSet;
use tracing::debug;

#[derive(Debug)]
pub struct Transform {
    parameters: ParameterSet,
    step_number: u32,
}

impl Transform {
    pub const NAME: &'static str = "Transform";

    const REQUIRED: &'static [&'static str] = &["InputTableName", "NewTableName"];
    const OPTIONAL: &'static [(&'static str, &'static str)] =
        &[("Add", "0"), ("Scale", "1"), ("LogBase", "")];

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
        let input = command::symbol(
            "InputTableName",
            required_value(&self.parameters, "InputTableName")?,
        )?;
        let new_table = required_value(&self.parameters, "NewTableName")?;
        let add = command::number("Add", self.parameters.get_or("Add", "0"))?;
        let scale = command::number("Scale", self.parameters.get_or("Scale", "1"))?;

        match self.parameters.get_nonempty("LogBase") {
            Some(base) => {
                let base = command::number("LogBase", base)?;
                command::assign(
                    new_table,
                    &format!("log((data.matrix({input})+{add})*{scale},{base})"),
                )
            }
            None => command::assign(new_table, &format!("({input}+{add})*{scale}")),
        }
    }
}

impl Module for Transform {
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

    fn optional_parameters(&self) -> &[(&str, &str)] {
        Self::OPTIONAL
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
