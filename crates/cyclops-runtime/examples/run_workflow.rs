//! Runs a small label-free workflow against the in-memory workspace and
//! prints the submitted engine commands plus the run summary.
//!
//! ```sh
//! RUST_LOG=debug cargo run --example run_workflow
//! ```

use cyclops_core::ParameterSet;
use cyclops_runtime::{MemoryWorkspace, ModuleRegistry, PipelineContext, Workflow};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const WORKFLOW: &str = r#"
name: label_free_demo
version: "0.1.0"
description: Log-transform peptide abundances, roll up to proteins, export
modules:
  - module: Transform
    parameters:
      InputTableName: T_Peptides
      NewTableName: T_Log
      LogBase: "2"
      Add: "8"
  - module: RRollup
    parameters:
      InputTableName: T_Log
      ProteinInfoTable: T_ProteinInfo
      NewTableName: T_Proteins
    children:
      - module: BarPlot
        category: visualization
        parameters:
          TableName: T_Proteins
          PlotFileName: proteins.png
          DataColumns: Abundance
      - module: ExportTable
        category: export
        parameters:
          Source: R
          Target: csv
          TableName: T_Proteins
          FileName: proteins.csv
          SeparatingCharacter: ","
  - module: SaveWorkspace
    category: export
"#;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let workspace = Arc::new(MemoryWorkspace::new());
    workspace.define_table("T_Peptides", &["Peptide", "S1", "S2", "S3"], 4200);
    workspace.define_table("T_ProteinInfo", &["Protein", "Peptide"], 4200);

    let work_dir = std::env::temp_dir().join("cyclops-demo");
    std::fs::create_dir_all(&work_dir)?;

    let registry = ModuleRegistry::with_builtin_modules();
    let mut workflow = Workflow::from_yaml(WORKFLOW, &registry, &ParameterSet::new())?;
    let mut ctx = PipelineContext::new(workspace.clone(), &work_dir);

    let summary = workflow.run_with_summary(&mut ctx);
    summary.write_json(work_dir.join("run_summary.json"))?;

    println!("submitted commands:");
    for command in workspace.commands() {
        println!("  {}", command.replace('\n', "\n  "));
    }
    println!(
        "\n{} finished: success={}, steps {}/{}",
        summary.workflow, summary.success, summary.steps_completed, summary.total_steps
    );
    Ok(())
}
