//! ANOVA module
//!
//! Runs the engine's `performAnova` contract over a data table and a factor
//! table. The factor table must carry the fixed-effect column, and its row
//! count must agree with the number of data columns being analyzed; both are
//! validated before any command is submitted. The input is copied into a
//! temporary table for the call and the temporary is removed afterwards.

use crate::command::{self, RFunction};
use crate::context::PipelineContext;
use crate::error::{Result, RuntimeError};
use crate::module::{check_required_parameters, required_value, Module};
use cyclops_core::ParameterSet;
use tracing::debug;

#[derive(Debug)]
pub struct Anova {
    parameters: ParameterSet,
    step_number: u32,
}

impl Anova {
    pub const NAME: &'static str = "Anova";

    const REQUIRED: &'static [&'static str] = &[
        "NewTableName",
        "InputTableName",
        "Mode",
        "FactorTable",
        "Fixed_Effect",
    ];
    const OPTIONAL: &'static [(&'static str, &'static str)] = &[
        ("Random_Effect", "NULL"),
        ("Interaction", "FALSE"),
        ("Unbalanced", "TRUE"),
        ("UseREML", "TRUE"),
        ("Threshold", "3"),
        ("RemovePeptideColumn", "FALSE"),
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

    fn removes_first_column(&self) -> Result<bool> {
        Ok(self
            .parameters
            .get_bool("RemovePeptideColumn")
            .map_err(RuntimeError::from)?
            .unwrap_or(false))
    }

    /// `NULL`, or a factor-table column reference
    fn random_effect(&self) -> Result<String> {
        let value = self.parameters.get_or("Random_Effect", "NULL");
        if value.eq_ignore_ascii_case("null") {
            Ok("NULL".to_string())
        } else {
            command::symbol("Random_Effect", value)
        }
    }

    fn build_command(&self, tmp_table: &str) -> Result<String> {
        let new_table = required_value(&self.parameters, "NewTableName")?;
        let input = command::symbol(
            "InputTableName",
            required_value(&self.parameters, "InputTableName")?,
        )?;
        let factor_table =
            command::symbol("FactorTable", required_value(&self.parameters, "FactorTable")?)?;
        let fixed_effect = required_value(&self.parameters, "Fixed_Effect")?;

        let interact =
            command::logical("Interaction", self.parameters.get_or("Interaction", "FALSE"))?;
        let unbalanced =
            command::logical("Unbalanced", self.parameters.get_or("Unbalanced", "TRUE"))?;
        let use_reml = command::logical("UseREML", self.parameters.get_or("UseREML", "TRUE"))?;
        let threshold = command::number("Threshold", self.parameters.get_or("Threshold", "3"))?;

        let data_expr = if self.removes_first_column()? {
            format!("{input}[,-1]")
        } else {
            input
        };

        let call = RFunction::new("performAnova")
            .arg("Data", tmp_table)
            .string_arg("FixedEffects", fixed_effect)
            .arg("RandomEffects", self.random_effect()?)
            .arg("interact", interact)
            .arg("unbalanced", unbalanced)
            .arg("useREML", use_reml)
            .arg("Factors", format!("t({factor_table})"))
            .arg("thres", threshold)
            .build();

        Ok(format!(
            "options(warn=-1)\n{tmp_table} <- {data_expr}\n{}\n{}",
            command::assign(new_table, &call)?,
            command::remove(tmp_table),
        ))
    }
}

impl Module for Anova {
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

        let input = ctx.table(required_value(&self.parameters, "InputTableName")?);
        input.require_exists()?;

        let factors = ctx.table(required_value(&self.parameters, "FactorTable")?);
        factors.require_column(required_value(&self.parameters, "Fixed_Effect")?)?;

        // Factor rows must line up with the data columns being analyzed.
        // Shapes the workspace cannot report are left for the engine.
        let factor_rows = factors.vector_length().unwrap_or(0);
        let mut data_columns = input.column_names().map(|c| c.len()).unwrap_or(0);
        if self.removes_first_column()? && data_columns > 0 {
            data_columns -= 1;
        }
        if factor_rows > 0 && data_columns > 0 && factor_rows != data_columns {
            return Err(RuntimeError::DimensionMismatch {
                message: format!(
                    "factor table '{}' has {factor_rows} rows but '{}' has {data_columns} \
                     data columns",
                    factors.name(),
                    input.name(),
                ),
            });
        }
        Ok(())
    }

    fn perform_operation(&mut self, ctx: &mut PipelineContext) -> Result<()> {
        let tmp_table = ctx.temporary_table_name("tmpInputAnova_");
        let cmd = self.build_command(&tmp_table)?;
        debug!(module = Self::NAME, step = self.step_number, command = %cmd, "submitting");
        ctx.workspace().execute(&cmd)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::{MemoryWorkspace, Workspace};
    use std::sync::Arc;

    fn anova_params() -> ParameterSet {
        [
            ("NewTableName", "T_Anova"),
            ("InputTableName", "T_Data"),
            ("Mode", "anova"),
            ("FactorTable", "T_Factors"),
            ("Fixed_Effect", "Condition"),
        ]
        .into_iter()
        .collect()
    }

    fn context_with_shapes(
        factor_rows: usize,
        data_columns: &[&str],
    ) -> (Arc<MemoryWorkspace>, PipelineContext) {
        let workspace = Arc::new(MemoryWorkspace::new());
        workspace.define_table("T_Data", data_columns, 500);
        workspace.define_table("T_Factors", &["Alias", "Condition"], factor_rows);
        let ctx = PipelineContext::new(workspace.clone(), "/tmp/cyclops-test");
        (workspace, ctx)
    }

    #[test]
    fn test_check_passes_when_shapes_agree() {
        let (_, ctx) = context_with_shapes(3, &["S1", "S2", "S3"]);
        let module = Anova::new(anova_params());
        assert!(module.check_parameters(&ctx).is_ok());
    }

    #[test]
    fn test_missing_fixed_effect_column() {
        let (_, ctx) = context_with_shapes(3, &["S1", "S2", "S3"]);
        let mut params = anova_params();
        params.set("Fixed_Effect", "Fixed_Effect");
        let module = Anova::new(params);

        let err = module.check_parameters(&ctx).unwrap_err();
        match err {
            RuntimeError::MissingColumn { table, column } => {
                assert_eq!(table, "T_Factors");
                assert_eq!(column, "Fixed_Effect");
            }
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_dimension_mismatch_names_both_objects() {
        let (_, ctx) = context_with_shapes(4, &["S1", "S2", "S3"]);
        let module = Anova::new(anova_params());

        let err = module.check_parameters(&ctx).unwrap_err();
        match err {
            RuntimeError::DimensionMismatch { message } => {
                assert!(message.contains("T_Factors"));
                assert!(message.contains("T_Data"));
            }
            other => panic!("expected DimensionMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_remove_peptide_column_balances_shapes() {
        let (_, ctx) = context_with_shapes(3, &["Peptide", "S1", "S2", "S3"]);
        let mut params = anova_params();
        params.set("RemovePeptideColumn", "TRUE");
        let module = Anova::new(params);

        assert!(module.check_parameters(&ctx).is_ok());
    }

    #[test]
    fn test_command_creates_and_removes_temporary() {
        let (workspace, mut ctx) = context_with_shapes(3, &["S1", "S2", "S3"]);
        let mut module = Anova::new(anova_params());

        module.check_parameters(&ctx).unwrap();
        module.perform_operation(&mut ctx).unwrap();

        let commands = workspace.commands();
        assert_eq!(commands.len(), 1);
        assert!(commands[0].starts_with("options(warn=-1)\ntmpInputAnova_"));
        assert!(commands[0].contains("T_Anova <- performAnova(Data=tmpInputAnova_"));
        assert!(commands[0].contains("FixedEffects='Condition'"));
        assert!(commands[0].contains("Factors=t(T_Factors)"));
        assert!(commands[0].contains("rm(tmpInputAnova_"));

        // The temporary is gone, the result table is present
        assert!(workspace.exists("T_Anova"));
        assert!(!workspace
            .object_names()
            .iter()
            .any(|name| name.starts_with("tmpInputAnova_")));
    }
}
