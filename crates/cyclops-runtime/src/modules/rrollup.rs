//! RRollup module
//!
//! Rolls peptide abundances up to protein level through the engine's
//! `RRollup.proteins` contract. The protein-to-peptide mapping table must
//! carry both mapping columns before anything is submitted. Grubbs' outlier
//! filtering inside the rollup needs the engine-side `outliers` package,
//! which is installed on demand.

use crate::command::{self, RFunction};
use crate::context::PipelineContext;
use crate::error::Result;
use crate::module::{check_required_parameters, required_value, Module};
use cyclops_core::ParameterSet;
use tracing::debug;

#[derive(Debug)]
pub struct RRollup {
    parameters: ParameterSet,
    step_number: u32,
}

impl RRollup {
    pub const NAME: &'static str = "RRollup";

    const REQUIRED: &'static [&'static str] =
        &["NewTableName", "InputTableName", "ProteinInfoTable"];
    const OPTIONAL: &'static [(&'static str, &'static str)] = &[
        ("MinPresence", "50"),
        ("Mode", "median"),
        ("ProteinInfo_ProteinCol", "Protein"),
        ("ProteinInfo_PeptideCol", "Peptide"),
        ("MinOverlap", "3"),
        ("OneHitWonders", "TRUE"),
        ("GpValue", "0.05"),
        ("GminPCount", "5"),
        ("Center", "FALSE"),
    ];

    /// Engine-side package providing Grubbs' test
    const OUTLIER_PACKAGE: &'static str = "outliers";

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
        let protein_info = command::symbol(
            "ProteinInfoTable",
            required_value(&self.parameters, "ProteinInfoTable")?,
        )?;

        let min_presence =
            command::number("MinPresence", self.parameters.get_or("MinPresence", "50"))?;
        let min_overlap =
            command::number("MinOverlap", self.parameters.get_or("MinOverlap", "3"))?;
        let one_hit_wonders = command::logical(
            "OneHitWonders",
            self.parameters.get_or("OneHitWonders", "TRUE"),
        )?;
        let gp_value = command::number("GpValue", self.parameters.get_or("GpValue", "0.05"))?;
        let gmin_p_count =
            command::number("GminPCount", self.parameters.get_or("GminPCount", "5"))?;
        let center = command::logical("Center", self.parameters.get_or("Center", "FALSE"))?;

        let call = RFunction::new("RRollup.proteins")
            .arg("Data", input)
            .arg("ProtInfo", protein_info)
            .arg("minPresence", min_presence)
            .string_arg("Mode", self.parameters.get_or("Mode", "median"))
            .string_arg(
                "protInfo_ProtCol",
                self.parameters.get_or("ProteinInfo_ProteinCol", "Protein"),
            )
            .string_arg(
                "protInfo_PepCol",
                self.parameters.get_or("ProteinInfo_PeptideCol", "Peptide"),
            )
            .arg("minOverlap", min_overlap)
            .arg("oneHitWonders", one_hit_wonders)
            .arg("gpvalue", gp_value)
            .arg("gminPCount", gmin_p_count)
            .arg("center", center)
            .build();
        command::assign(new_table, &call)
    }
}

impl Module for RRollup {
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
            .require_exists()?;

        let protein_info = ctx.table(required_value(&self.parameters, "ProteinInfoTable")?);
        protein_info
            .require_column(self.parameters.get_or("ProteinInfo_ProteinCol", "Protein"))?;
        protein_info
            .require_column(self.parameters.get_or("ProteinInfo_PeptideCol", "Peptide"))?;
        Ok(())
    }

    fn perform_operation(&mut self, ctx: &mut PipelineContext) -> Result<()> {
        ctx.ensure_dependency(Self::OUTLIER_PACKAGE)?;

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

    fn rollup_params() -> ParameterSet {
        [
            ("NewTableName", "T_Proteins"),
            ("InputTableName", "T_Peptides"),
            ("ProteinInfoTable", "T_ProteinInfo"),
        ]
        .into_iter()
        .collect()
    }

    fn context_with_tables() -> (Arc<MemoryWorkspace>, PipelineContext) {
        let workspace = Arc::new(MemoryWorkspace::new());
        workspace.define_table("T_Peptides", &["Peptide", "S1", "S2"], 900);
        workspace.define_table("T_ProteinInfo", &["Protein", "Peptide"], 900);
        let ctx = PipelineContext::new(workspace.clone(), "/tmp/cyclops-test");
        (workspace, ctx)
    }

    #[test]
    fn test_command_uses_defaults() {
        let module = RRollup::new(rollup_params());
        assert_eq!(
            module.build_command().unwrap(),
            "T_Proteins <- RRollup.proteins(Data=T_Peptides, ProtInfo=T_ProteinInfo, \
             minPresence=50, Mode='median', protInfo_ProtCol='Protein', \
             protInfo_PepCol='Peptide', minOverlap=3, oneHitWonders=TRUE, gpvalue=0.05, \
             gminPCount=5, center=FALSE)"
        );
    }

    #[test]
    fn test_installs_outlier_package_on_demand() {
        let (workspace, mut ctx) = context_with_tables();
        let mut module = RRollup::new(rollup_params());

        module.check_parameters(&ctx).unwrap();
        module.perform_operation(&mut ctx).unwrap();

        assert!(workspace.is_dependency_installed("outliers"));
        assert!(workspace.exists("T_Proteins"));
    }

    #[test]
    fn test_mapping_columns_are_validated() {
        let workspace = Arc::new(MemoryWorkspace::new());
        workspace.define_table("T_Peptides", &["Peptide", "S1"], 10);
        workspace.define_table("T_ProteinInfo", &["Protein"], 10);
        let ctx = PipelineContext::new(workspace, "/tmp/cyclops-test");

        let module = RRollup::new(rollup_params());
        let err = module.check_parameters(&ctx).unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::MissingColumn { ref table, ref column }
                if table == "T_ProteinInfo" && column == "Peptide"
        ));
    }
}
