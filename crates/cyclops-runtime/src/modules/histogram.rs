//! Histogram module

use crate::command::{self, RFunction};
use crate::context::PipelineContext;
use crate::error::Result;
use crate::module::{check_required_parameters, required_value, Module};
use cyclops_core::{ModuleCategory, ParameterSet};
use tracing::debug;

#[derive(Debug)]
pub struct Histogram {
    parameters: ParameterSet,
    step_number: u32,
}

impl Histogram {
    pub const NAME: &'static str = "Histogram";

    const REQUIRED: &'static [&'static str] = &["TableName", "PlotFileName"];
    const OPTIONAL: &'static [(&'static str, &'static str)] = &[
        ("DataColumn", ""),
        ("BackgroundColor", "white"),
        ("BarColor", "cornflowerblue"),
        ("Main", ""),
        ("XLabel", ""),
        ("YLabel", ""),
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

        let width = command::number("Width", self.parameters.get_or("Width", "1200"))?;
        let height = command::number("Height", self.parameters.get_or("Height", "1200"))?;
        let font_size = command::number("FontSize", self.parameters.get_or("FontSize", "12"))?;
        let resolution =
            command::number("Resolution", self.parameters.get_or("Resolution", "600"))?;

        Ok(RFunction::new("plotHist")
            .arg("Data", table)
            .string_arg("Data.Column", self.parameters.get_or("DataColumn", ""))
            .string_arg("file", &command::engine_path(&plot_file))
            .string_arg(
                "bkground",
                self.parameters.get_or("BackgroundColor", "white"),
            )
            .string_arg("colF", self.parameters.get_or("BarColor", "cornflowerblue"))
            .string_arg("title", self.parameters.get_or("Main", ""))
            .string_arg("xLab", self.parameters.get_or("XLabel", ""))
            .string_arg("yLab", self.parameters.get_or("YLabel", ""))
            .arg("IMGwidth", width)
            .arg("IMGheight", height)
            .arg("FNTsize", font_size)
            .arg("res", resolution)
            .build())
    }
}

impl Module for Histogram {
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
