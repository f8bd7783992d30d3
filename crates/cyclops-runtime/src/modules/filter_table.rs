//! Filter table module
//!
//! Keeps the rows of a table whose column value satisfies a comparison.

use crate::command;
use crate::context::PipelineContext;
use crate::error::{Result, RuntimeError};
use crate::module::{check_required_parameters, required_value, Module};
use cyclops_core::ParameterSet;
use tracing::debug;

const OPERATIONS: &[&str] = &["<", ">", "<=", ">=", "==", "!="];

#[derive(Debug)]
pub struct FilterTable {
    parameters: ParameterSet,
    step_number: u32,
}

impl FilterTable {
    pub const NAME: &'static str = "FilterTable";

    const REQUIRED: &'static [&'static str] = &[
        "InputTableName",
        "NewTableName",
        "ColumnName",
        "Operation",
        "Value",
    ];

    pub fn new(parameters: ParameterSet) -> Self {
        Self {
            parameters,
            step_number: 0,
        }
    }

    pub fn boxed(parameters: ParameterSet) -> Box<dyn Module> {
        Box::new(Self::new(parameters))
    }

    fn operation(&self) -> Result<&str> {
        let op = required_value(&self.parameters, "Operation")?;
        if OPERATIONS.contains(&op) {
            Ok(op)
        } else {
            Err(RuntimeError::InvalidParameter {
                key: "Operation".to_string(),
                message: format!("'{op}' is not a comparison operator"),
            })
        }
    }

    fn build_command(&self) -> Result<String> {
        let new_table = required_value(&self.parameters, "NewTableName")?;
        let input = command::symbol(
            "InputTableName",
            required_value(&self.parameters, "InputTableName")?,
        )?;
        let column =
            command::symbol("ColumnName", required_value(&self.parameters, "ColumnName")?)?;
        let op = self.operation()?;
        let value = command::number("Value", required_value(&self.parameters, "Value")?)?;

        command::assign(
            new_table,
            &format!("{input}[{input}${column} {op} {value}, ]"),
        )
    }
}

impl Module for FilterTable {
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
        self.operation()?;
        ctx.table(required_value(&self.parameters, "InputTableName")?)
            .require_column(required_value(&self.parameters, "ColumnName")?)
    }

    fn perform_operation(&mut self, ctx: &mut PipelineContext) -> Result<()> {
        let cmd = self.build_command()?;
        debug!(module = Self::NAME, step = self.step_number, command = %cmd, "submitting");
        ctx.workspace().execute(&cmd)?;
        Ok(())
    }
}
