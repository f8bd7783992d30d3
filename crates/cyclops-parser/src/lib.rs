//! Cyclops Parser - YAML workflow definitions for the Cyclops workflow engine
//!
//! Reads declarative workflow definitions from YAML into
//! [`cyclops_core::WorkflowDefinition`] records, validates their structure,
//! and writes definitions back out so a live module tree round-trips through
//! the same shape.

pub mod error;
pub mod workflow_parser;

pub use error::ParseError;
pub use workflow_parser::WorkflowParser;
