//! Workflow parser
//!
//! Parses YAML workflow definitions into `WorkflowDefinition` records and
//! serializes them back. Structural validation happens here so the runtime
//! can assume well-formed records: module names must be non-empty, and
//! authored step numbers, when present, must be unique within the workflow.

use crate::error::{ParseError, Result};
use anyhow::Context;
use cyclops_core::{ModuleDefinition, WorkflowDefinition};
use log::debug;
use std::collections::HashSet;
use std::path::Path;

/// Workflow definition parser
pub struct WorkflowParser;

impl WorkflowParser {
    /// Parse a workflow definition from a YAML string
    pub fn parse(yaml_str: &str) -> Result<WorkflowDefinition> {
        let definition: WorkflowDefinition = serde_yaml::from_str(yaml_str)?;
        Self::validate(&definition)?;
        debug!(
            "parsed workflow '{}' with {} modules",
            definition.name,
            definition.module_count()
        );
        Ok(definition)
    }

    /// Serialize a workflow definition to a YAML string
    pub fn to_yaml(definition: &WorkflowDefinition) -> Result<String> {
        Ok(serde_yaml::to_string(definition)?)
    }

    /// Read a workflow definition from a YAML file
    pub fn read_file(path: impl AsRef<Path>) -> anyhow::Result<WorkflowDefinition> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read workflow file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse workflow file: {}", path.display()))
    }

    /// Write a workflow definition to a YAML file
    pub fn write_file(
        definition: &WorkflowDefinition,
        path: impl AsRef<Path>,
    ) -> anyhow::Result<()> {
        let path = path.as_ref();
        let yaml = Self::to_yaml(definition)
            .with_context(|| format!("Failed to serialize workflow '{}'", definition.name))?;
        std::fs::write(path, yaml)
            .with_context(|| format!("Failed to write workflow file: {}", path.display()))
    }

    /// Validate the structure of a parsed definition
    pub fn validate(definition: &WorkflowDefinition) -> Result<()> {
        if definition.name.is_empty() {
            return Err(ParseError::MissingField {
                field: "name".to_string(),
            });
        }

        let mut seen_steps = HashSet::new();
        for module in &definition.modules {
            Self::validate_module(definition, module, &mut seen_steps)?;
        }
        Ok(())
    }

    fn validate_module(
        definition: &WorkflowDefinition,
        module: &ModuleDefinition,
        seen_steps: &mut HashSet<u32>,
    ) -> Result<()> {
        if module.module.is_empty() {
            return Err(ParseError::MissingField {
                field: "module".to_string(),
            });
        }

        if let Some(step) = module.step {
            if !seen_steps.insert(step) {
                return Err(ParseError::DuplicateStep {
                    workflow: definition.name.clone(),
                    step,
                });
            }
        }

        for child in &module.children {
            Self::validate_module(definition, child, seen_steps)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cyclops_core::ModuleCategory;

    const SAMPLE_WORKFLOW: &str = r#"
name: spectral_count_rollup
version: "0.1.0"
modules:
  - module: ImportData
    step: 1
    parameters:
      Source: delimited
      InputFileName: peptides.txt
      NewTableName: T_Peptides
  - module: RRollup
    step: 2
    parameters:
      InputTableName: T_Peptides
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
"#;

    #[test]
    fn test_parse_sample_workflow() {
        let definition = WorkflowParser::parse(SAMPLE_WORKFLOW).unwrap();

        assert_eq!(definition.name, "spectral_count_rollup");
        assert_eq!(definition.modules.len(), 2);
        assert_eq!(definition.module_count(), 4);

        let rollup = &definition.modules[1];
        assert_eq!(rollup.module, "RRollup");
        assert_eq!(rollup.step, Some(2));
        assert_eq!(rollup.children.len(), 2);
        assert_eq!(rollup.children[0].category, ModuleCategory::Visualization);
        assert_eq!(
            rollup.parameters.get("inputtablename"),
            Some("T_Peptides")
        );
    }

    #[test]
    fn test_parse_rejects_empty_module_name() {
        let yaml = r#"
name: broken
modules:
  - module: ""
"#;
        let err = WorkflowParser::parse(yaml).unwrap_err();
        assert!(matches!(err, ParseError::MissingField { ref field } if field == "module"));
    }

    #[test]
    fn test_parse_rejects_duplicate_steps() {
        let yaml = r#"
name: broken
modules:
  - module: Transform
    step: 3
    parameters:
      InputTableName: T1
      NewTableName: T2
  - module: Merge
    step: 3
"#;
        let err = WorkflowParser::parse(yaml).unwrap_err();
        assert!(matches!(err, ParseError::DuplicateStep { step: 3, .. }));
    }

    #[test]
    fn test_yaml_round_trip() {
        let definition = WorkflowParser::parse(SAMPLE_WORKFLOW).unwrap();
        let yaml = WorkflowParser::to_yaml(&definition).unwrap();
        let back = WorkflowParser::parse(&yaml).unwrap();

        assert_eq!(back, definition);
    }

    #[test]
    fn test_file_round_trip() {
        let definition = WorkflowParser::parse(SAMPLE_WORKFLOW).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workflow.yml");
        WorkflowParser::write_file(&definition, &path).unwrap();

        let back = WorkflowParser::read_file(&path).unwrap();
        assert_eq!(back, definition);
    }
}
