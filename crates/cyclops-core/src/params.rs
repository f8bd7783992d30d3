//! Module parameter sets
//!
//! A `ParameterSet` is the string-keyed configuration bag supplied to a
//! module instance. Keys are looked up case-insensitively, values are plain
//! strings; numeric and boolean coercion happens at the point of use.
//! Insertion order is preserved so that serialized workflows keep the
//! parameter order their authors wrote.

use crate::error::{CoreError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Case-insensitive, insertion-ordered map of parameter keys to values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSet {
    entries: IndexMap<String, String>,
}

impl ParameterSet {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no parameters are present
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Set a parameter value. If the key is already present under any
    /// casing, the existing spelling is kept and its value replaced.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(existing) = self.canonical_key(&key) {
            self.entries.insert(existing, value);
        } else {
            self.entries.insert(key, value);
        }
    }

    /// Look up a value by key, ignoring case
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Look up a value by key, treating an empty value as absent
    pub fn get_nonempty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    /// Look up a value by key, falling back to a default when the key is
    /// absent or its value empty
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get_nonempty(key).unwrap_or(default)
    }

    /// True if the key is present under any casing
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Coerce a parameter to a boolean. Accepts `true`/`false` in any
    /// casing (the engine-facing `TRUE`/`FALSE` spellings included).
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        match self.get_nonempty(key) {
            None => Ok(None),
            Some(v) if v.eq_ignore_ascii_case("true") => Ok(Some(true)),
            Some(v) if v.eq_ignore_ascii_case("false") => Ok(Some(false)),
            Some(v) => Err(CoreError::InvalidParameter {
                key: key.to_string(),
                message: format!("expected a boolean, got '{v}'"),
            }),
        }
    }

    /// Coerce a parameter to a floating-point number
    pub fn get_f64(&self, key: &str) -> Result<Option<f64>> {
        match self.get_nonempty(key) {
            None => Ok(None),
            Some(v) => v.parse::<f64>().map(Some).map_err(|_| {
                CoreError::InvalidParameter {
                    key: key.to_string(),
                    message: format!("expected a number, got '{v}'"),
                }
            }),
        }
    }

    /// Return every required key that is absent or empty, in schema order
    pub fn missing_required(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|key| self.get_nonempty(key).is_none())
            .map(|key| key.to_string())
            .collect()
    }

    /// Fail unless every required key is present with a non-empty value.
    /// All missing keys are collected into a single error.
    pub fn validate_required(&self, required: &[&str]) -> Result<()> {
        let missing = self.missing_required(required);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(CoreError::MissingParameters { keys: missing })
        }
    }

    /// Copy entries from `defaults` for any key not already present.
    /// Existing values always win.
    pub fn merge_defaults(&mut self, defaults: &ParameterSet) {
        for (key, value) in defaults.iter() {
            if !self.contains(key) {
                self.entries.insert(key.to_string(), value.to_string());
            }
        }
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parameter keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    fn canonical_key(&self, key: &str) -> Option<String> {
        self.entries
            .keys()
            .find(|k| k.eq_ignore_ascii_case(key))
            .cloned()
    }
}

impl FromIterator<(String, String)> for ParameterSet {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        let mut params = ParameterSet::new();
        for (k, v) in iter {
            params.set(k, v);
        }
        params
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for ParameterSet {
    fn from_iter<T: IntoIterator<Item = (&'a str, &'a str)>>(iter: T) -> Self {
        iter.into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}
