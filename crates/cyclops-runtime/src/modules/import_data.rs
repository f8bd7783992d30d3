//! Import data module
//!
//! Reads a delimited file from the working directory into a new workspace
//! table.

use crate::command::{self, RFunction};
use crate::context::PipelineContext;
use crate::error::{Result, RuntimeError};
use crate::module::{check_required_parameters, required_value, Module};
use cyclops_core::ParameterSet;
use tracing::debug;

#[derive(Debug)]
pub struct ImportData {
    parameters: ParameterSet,
    step_number: u32,
}

impl ImportData {
    pub const NAME: &'static str = "ImportData";

    const REQUIRED: &'static [&'static str] = &["Source", "InputFileName", "NewTableName"];
    const OPTIONAL: &'static [(&'static str, &'static str)] =
        &[("Delimiter", "\t"), ("HasHeader", "TRUE")];

    pub fn new(parameters: ParameterSet) -> Self {
        Self {
            parameters,
            step_number: 0,
        }
    }

    pub fn boxed(parameters: ParameterSet) -> Box<dyn Module> {
        Box::new(Self::new(parameters))
    }

    /// Field separator implied by the source kind
    fn separator(&self) -> Result<String> {
        let source = required_value(&self.parameters, "Source")?;
        match source.to_ascii_lowercase().as_str() {
            "csv" => Ok(",".to_string()),
            "tsv" => Ok("\t".to_string()),
            "delimited" => Ok(self.parameters.get_or("Delimiter", "\t").to_string()),
            other => Err(RuntimeError::InvalidParameter {
                key: "Source".to_string(),
                message: format!("unsupported import source '{other}'"),
            }),
        }
    }

    fn build_command(&self, ctx: &PipelineContext) -> Result<String> {
        let new_table = required_value(&self.parameters, "NewTableName")?;
        let file = ctx
            .work_dir()
            .join(required_value(&self.parameters, "InputFileName")?);
        let header =
            command::logical("HasHeader", self.parameters.get_or("HasHeader", "TRUE"))?;
        let separator = self.separator()?;

        let call = RFunction::new("read.table")
            .string_arg("file", &command::engine_path(&file))
            .arg("header", header)
            .string_arg("sep", &separator)
            .arg("stringsAsFactors", "FALSE")
            .build();
        command::assign(new_table, &call)
    }
}

impl Module for ImportData {
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

    fn check_parameters(&self, _ctx: &PipelineContext) -> Result<()> {
        check_required_parameters(self)?;
        self.separator()?;
        Ok(())
    }

    fn perform_operation(&mut self, ctx: &mut PipelineContext) -> Result<()> {
        let cmd = self.build_command(ctx)?;
        debug!(module = Self::NAME, step = self.step_number, command = %cmd, "submitting");
        ctx.workspace().execute(&cmd)?;
        Ok(())
    }
}
