//! Export table module
//!
//! Writes a workspace table out to a delimited file in the working
//! directory.

use crate::command::{self, RFunction};
use crate::context::PipelineContext;
use crate::error::{Result, RuntimeError};
use crate::module::{check_required_parameters, required_value, Module};
use cyclops_core::{ModuleCategory, ParameterSet};
use tracing::debug;

#[derive(Debug)]
pub struct ExportTable {
    parameters: ParameterSet,
    step_number: u32,
}

impl ExportTable {
    pub const NAME: &'static str = "ExportTable";

    const REQUIRED: &'static [&'static str] = &[
        "Source",
        "Target",
        "TableName",
        "FileName",
        "SeparatingCharacter",
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

    fn validate_source_and_target(&self) -> Result<()> {
        let source = required_value(&self.parameters, "Source")?;
        if !source.eq_ignore_ascii_case("r") {
            return Err(RuntimeError::InvalidParameter {
                key: "Source".to_string(),
                message: format!("unsupported export source '{source}'"),
            });
        }

        let target = required_value(&self.parameters, "Target")?;
        match target.to_ascii_lowercase().as_str() {
            "csv" | "tsv" | "txt" => Ok(()),
            other => Err(RuntimeError::InvalidParameter {
                key: "Target".to_string(),
                message: format!("unsupported export target '{other}'"),
            }),
        }
    }

    fn build_command(&self, ctx: &PipelineContext) -> Result<String> {
        let table = command::symbol("TableName", required_value(&self.parameters, "TableName")?)?;
        let file = ctx
            .work_dir()
            .join(required_value(&self.parameters, "FileName")?);
        let separator = required_value(&self.parameters, "SeparatingCharacter")?;

        Ok(RFunction::new("write.table")
            .arg("x", table)
            .string_arg("file", &command::engine_path(&file))
            .string_arg("sep", separator)
            .arg("quote", "FALSE")
            .arg("row.names", "FALSE")
            .arg("col.names", "TRUE")
            .build())
    }
}

impl Module for ExportTable {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn category(&self) -> ModuleCategory {
        ModuleCategory::Export
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
        self.validate_source_and_target()?;
        ctx.table(required_value(&self.parameters, "TableName")?)
            .require_exists()
    }

    fn perform_operation(&mut self, ctx: &mut PipelineContext) -> Result<()> {
        let cmd = self.build_command(ctx)?;
        debug!(module = Self::NAME, step = self.step_number, command = %cmd, "submitting");
        ctx.workspace().execute(&cmd)?;
        Ok(())
    }
}
