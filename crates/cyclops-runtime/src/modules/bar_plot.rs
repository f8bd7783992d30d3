//! Bar plot module
//!
//! Renders a bar plot of one table column through the engine's `plotBars`
//! contract. Plot files land in the `Plots` directory under the working
//! directory, which is created on demand.

use crate::command::{self, RFunction};
use crate::context::PipelineContext;
use crate::error::Result;
use crate::module::{check_required_parameters, required_value, Module};
use cyclops_core::{ModuleCategory, ParameterSet};
use tracing::debug;

#[derive(Debug)]
pub struct BarPlot {
    parameters: ParameterSet,
    step_number: u32,
}

impl BarPlot {
    pub const NAME: &'static str = "BarPlot";

    const REQUIRED: &'static [&'static str] = &["TableName", "PlotFileName", "DataColumns"];
    const OPTIONAL: &'static [(&'static str, &'static str)] = &[
        ("BackgroundColor", "white"),
        ("BarColor", "cornflowerblue"),
        ("Log", "FALSE"),
        ("LogBase", "2"),
        ("Names", ""),
        ("XLabel", ""),
        ("YLabel", ""),
        ("Main", ""),
        ("Width", "1200"),
        ("Height", "1200"),
        ("FontSize", "12"),
        ("Resolution", "600"),
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

    fn build_command(&self, ctx: &PipelineContext) -> Result<String> {
        let table = command::symbol("TableName", required_value(&self.parameters, "TableName")?)?;
        let plot_file = ctx
            .ensure_plots_dir()?
            .join(required_value(&self.parameters, "PlotFileName")?);

        let take_log = command::logical("Log", self.parameters.get_or("Log", "FALSE"))?;
        let log_base = command::number("LogBase", self.parameters.get_or("LogBase", "2"))?;
        let width = command::number("Width", self.parameters.get_or("Width", "1200"))?;
        let height = command::number("Height", self.parameters.get_or("Height", "1200"))?;
        let font_size = command::number("FontSize", self.parameters.get_or("FontSize", "12"))?;
        let resolution =
            command::number("Resolution", self.parameters.get_or("Resolution", "600"))?;

        Ok(RFunction::new("plotBars")
            .arg("x", table)
            .string_arg("Data.Column", required_value(&self.parameters, "DataColumns")?)
            .string_arg("file", &command::engine_path(&plot_file))
            .string_arg(
                "bkground",
                self.parameters.get_or("BackgroundColor", "white"),
            )
            .arg("takeLog", take_log)
            .arg("base", log_base)
            .string_arg("names.arg", self.parameters.get_or("Names", ""))
            .string_arg("xLab", self.parameters.get_or("XLabel", ""))
            .string_arg("yLab", self.parameters.get_or("YLabel", ""))
            .string_arg("title", self.parameters.get_or("Main", ""))
            .string_arg("col", self.parameters.get_or("BarColor", "cornflowerblue"))
            .arg("IMGwidth", width)
            .arg("IMGheight", height)
            .arg("FNTsize", font_size)
            .arg("res", resolution)
            .build())
    }
}

impl Module for BarPlot {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn category(&self) -> ModuleCategory {
        ModuleCategory::Visualization
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
