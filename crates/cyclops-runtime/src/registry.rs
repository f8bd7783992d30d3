//! Module registry
//!
//! Maps workflow-facing module type names to constructors. The supported
//! module set is closed and registered explicitly at startup, so the set is
//! enumerable at compile time and an unknown type name fails while the
//! workflow is being built, before anything runs.

use crate::error::{Result, RuntimeError};
use crate::module::Module;
use cyclops_core::ParameterSet;
use std::collections::BTreeMap;

/// Constructor for one module type
pub type ModuleFactory = fn(ParameterSet) -> Box<dyn Module>;

struct Registration {
    name: String,
    factory: ModuleFactory,
}

/// Registry of module constructors, looked up case-insensitively by name
#[derive(Default)]
pub struct ModuleRegistry {
    registrations: BTreeMap<String, Registration>,
}

impl ModuleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every built-in module registered
    pub fn with_builtin_modules() -> Self {
        let mut registry = Self::new();
        crate::modules::register_builtin_modules(&mut registry);
        registry
    }

    /// Register a module type under its canonical name
    pub fn register(&mut self, name: &str, factory: ModuleFactory) {
        self.registrations.insert(
            name.to_ascii_lowercase(),
            Registration {
                name: name.to_string(),
                factory,
            },
        );
    }

    /// True if a module type is registered under this name, any casing
    pub fn contains(&self, name: &str) -> bool {
        self.registrations.contains_key(&name.to_ascii_lowercase())
    }

    /// Instantiate a module by type name. Fails with `UnknownModuleType`
    /// when the name is not registered.
    pub fn create(&self, name: &str, parameters: ParameterSet) -> Result<Box<dyn Module>> {
        let registration = self
            .registrations
            .get(&name.to_ascii_lowercase())
            .ok_or_else(|| RuntimeError::UnknownModuleType(name.to_string()))?;
        Ok((registration.factory)(parameters))
    }

    /// Canonical names of every registered module type, sorted
    pub fn module_names(&self) -> Vec<&str> {
        self.registrations
            .values()
            .map(|registration| registration.name.as_str())
            .collect()
    }
}
