//! Merge module
//!
//! Joins two tables on a link column from each side.

use crate::command::{self, RFunction};
use crate::context::PipelineContext;
use crate::error::Result;
use crate::module::{check_required_parameters, required_value, Module};
use cyclops_core::ParameterSet;
use tracing::debug;

#[derive(Debug)]
pub struct Merge {
    parameters: ParameterSet,
    step_number: u32,
}

impl Merge {
    pub const NAME: &'static str = "Merge";

    const REQUIRED: &'static [&'static str] = &[
        "NewTableName",
        "XTable",
        "YTable",
        "XLink",
        "YLink",
        "AllX",
        "AllY",
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

    fn build_command(&self) -> Result<String> {
        let new_table = required_value(&self.parameters, "NewTableName")?;
        let x_table = command::symbol("XTable", required_value(&self.parameters, "XTable")?)?;
        let y_table = command::symbol("YTable", required_value(&self.parameters, "YTable")?)?;
        let all_x = command::logical("AllX", required_value(&self.parameters, "AllX")?)?;
        let all_y = command::logical("AllY", required_value(&self.parameters, "AllY")?)?;

        let call = RFunction::new("merge")
            .arg("x", x_table)
            .arg("y", y_table)
            .string_arg("by.x", required_value(&self.parameters, "XLink")?)
            .string_arg("by.y", required_value(&self.parameters, "YLink")?)
            .arg("all.x", all_x)
            .arg("all.y", all_y)
            .build();
        command::assign(new_table, &call)
    }
}

impl Module for Merge {
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

        let x = ctx.table(required_value(&self.parameters, "XTable")?);
        let y = ctx.table(required_value(&self.parameters, "YTable")?);
        x.require_column(required_value(&self.parameters, "XLink")?)?;
        y.require_column(required_value(&self.parameters, "YLink")?)?;
        Ok(())
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
    use crate::workspace::{MemoryWorkspace, Workspace};
    use std::sync::Arc;

    fn merge_params() -> ParameterSet {
        [
            ("NewTableName", "T_Merged"),
            ("XTable", "T_X"),
            ("YTable", "T_Y"),
            ("XLink", "Mass_Tag_ID"),
            ("YLink", "Mass_Tag_ID"),
            ("AllX", "TRUE"),
            ("AllY", "FALSE"),
        ]
        .into_iter()
        .collect()
    }

    fn context_with_tables() -> (Arc<MemoryWorkspace>, PipelineContext) {
        let workspace = Arc::new(MemoryWorkspace::new());
        workspace.define_table("T_X", &["Mass_Tag_ID", "Abundance"], 100);
        workspace.define_table("T_Y", &["Mass_Tag_ID", "Protein"], 80);
        let ctx = PipelineContext::new(workspace.clone(), "/tmp/cyclops-test");
        (workspace, ctx)
    }

    #[test]
    fn test_command_text() {
        let module = Merge::new(merge_params());
        assert_eq!(
            module.build_command().unwrap(),
            "T_Merged <- merge(x=T_X, y=T_Y, by.x='Mass_Tag_ID', by.y='Mass_Tag_ID', \
             all.x=TRUE, all.y=FALSE)"
        );
    }

    #[test]
    fn test_check_passes_and_submits() {
        let (workspace, mut ctx) = context_with_tables();
        let mut module = Merge::new(merge_params());

        assert!(module.check_parameters(&ctx).is_ok());
        assert!(module.perform_operation(&mut ctx).is_ok());
        assert_eq!(workspace.command_count(), 1);
        assert!(workspace.exists("T_Merged"));
    }

    #[test]
    fn test_missing_link_column() {
        let (_, ctx) = context_with_tables();
        let mut params = merge_params();
        params.set("YLink", "Peptide");
        let module = Merge::new(params);

        let err = module.check_parameters(&ctx).unwrap_err();
        match err {
            RuntimeError::MissingColumn { table, column } => {
                assert_eq!(table, "T_Y");
                assert_eq!(column, "Peptide");
            }
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_y_table() {
        let workspace = Arc::new(MemoryWorkspace::new());
        workspace.define_table("T_X", &["Mass_Tag_ID"], 10);
        let ctx = PipelineContext::new(workspace, "/tmp/cyclops-test");

        let module = Merge::new(merge_params());
        let err = module.check_parameters(&ctx).unwrap_err();
        assert!(
            matches!(err, RuntimeError::MissingWorkspaceObject { ref object } if object == "T_Y")
        );
    }
}
