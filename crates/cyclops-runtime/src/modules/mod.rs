//! Built-in module implementations
//!
//! Each module wraps one external-function contract of the statistical
//! engine: it declares its parameter schema, validates preconditions against
//! the workspace, and renders the command text the engine executes. The set
//! registered here is the closed set of module types a workflow may name.

pub mod aggregate;
pub mod anova;
pub mod bar_plot;
pub mod central_tendency;
pub mod export_table;
pub mod filter_table;
pub mod histogram;
pub mod import_data;
pub mod load_workspace;
pub mod merge;
pub mod rrollup;
pub mod save_workspace;
pub mod transform;

pub use aggregate::Aggregate;
pub use anova::Anova;
pub use bar_plot::BarPlot;
pub use central_tendency::CentralTendency;
pub use export_table::ExportTable;
pub use filter_table::FilterTable;
pub use histogram::Histogram;
pub use import_data::ImportData;
pub use load_workspace::LoadWorkspace;
pub use merge::Merge;
pub use rrollup::RRollup;
pub use save_workspace::SaveWorkspace;
pub use transform::Transform;

use crate::registry::ModuleRegistry;

/// Register every built-in module type
pub fn register_builtin_modules(registry: &mut ModuleRegistry) {
    registry.register(Aggregate::NAME, Aggregate::boxed);
    registry.register(Anova::NAME, Anova::boxed);
    registry.register(BarPlot::NAME, BarPlot::boxed);
    registry.register(CentralTendency::NAME, CentralTendency::boxed);
    registry.register(ExportTable::NAME, ExportTable::boxed);
    registry.register(FilterTable::NAME, FilterTable::boxed);
    registry.register(Histogram::NAME, Histogram::boxed);
    registry.register(ImportData::NAME, ImportData::boxed);
    registry.register(LoadWorkspace::NAME, LoadWorkspace::boxed);
    registry.register(Merge::NAME, Merge::boxed);
    registry.register(RRollup::NAME, RRollup::boxed);
    registry.register(SaveWorkspace::NAME, SaveWorkspace::boxed);
    registry.register(Transform::NAME, Transform::boxed);
}
