//! Aggregate module
//!
//! Collapses a table along one margin with a summary function, e.g.
//! row-wise or column-wise means.

use crate::command;
use crate::context::PipelineContext;
use crate::error::Result;
use crate::module::{check_required_parameters, required_value, Module};
use cyclops_core::ParameterSet;
use tracing::debug;

#[derive(Debug)]
pub struct Aggregate {
    parameters: ParameterSet,
    step_number: u32,
}

impl Aggregate {
    pub const NAME: &'static str = "Aggregate";

    const REQUIRED: &'static [&'static str] =
        &["NewTableName", "InputTableName", "Margin", "Function"];

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
        let margin = command::number("Margin", required_value(&self.parameters, "Margin")?)?;
        let function =
            command::symbol("Function", required_value(&self.parameters, "Function")?)?;

        command::assign(new_table, &format!("apply({input}, {margin}, {function})"))
    }
}

impl Module for Aggregate {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuntimeError;
    use crate::workspace::MemoryWorkspace;
    use std::sync::Arc;

    #[test]
    fn test_command_text() {
        let module = Aggregate::new(
            [
                ("NewTableName", "T_Means"),
                ("InputTableName", "T1"),
                ("Margin", "2"),
                ("Function", "mean"),
            ]
            .into_iter()
            .collect(),
        );
        assert_eq!(module.build_command().unwrap(), "T_Means <- apply(T1, 2, mean)");
    }

    #[test]
    fn test_all_required_keys_reported_at_once() {
        let workspace = Arc::new(MemoryWorkspace::new());
        let ctx = PipelineContext::new(workspace, "/tmp/cyclops-test");
        let module = Aggregate::new(ParameterSet::new());

        let err = module.check_parameters(&ctx).unwrap_err();
        match err {
            RuntimeError::MissingParameters { keys } => {
                assert_eq!(
                    keys,
                    vec!["NewTableName", "InputTableName", "Margin", "Function"]
                );
            }
            other => panic!("expected MissingParameters, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_nonnumeric_margin() {
        let module = Aggregate::new(
            [
                ("NewTableName", "T_Means"),
                ("InputTableName", "T1"),
                ("Margin", "rows"),
                ("Function", "mean"),
            ]
            .into_iter()
            .collect(),
        );
        assert!(matches!(
            module.build_command().unwrap_err(),
            RuntimeError::InvalidParameter { ref key, .. } if key == "Margin"
        ));
    }
}
