//! Engine command construction
//!
//! Commands submitted to the engine are plain text tied to external function
//! contracts. Every value substituted into that text is validated for shape
//! first: object references must be legal engine identifiers, numbers must
//! parse, logicals are normalized to the engine's `TRUE`/`FALSE` spelling,
//! and strings are quoted with escaping. Building the text from named parts
//! keeps the exact wire contract while ruling out formatting bugs.

use crate::error::{Result, RuntimeError};
use std::path::Path;

/// True for legal engine identifiers: a letter or dot followed by letters,
/// digits, dots, or underscores
pub fn is_valid_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '.' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_')
}

/// Validate a value as an engine identifier (table, vector, or function
/// reference). The parameter key is carried into the error.
pub fn symbol(key: &str, value: &str) -> Result<String> {
    if is_valid_identifier(value) {
        Ok(value.to_string())
    } else {
        Err(RuntimeError::InvalidParameter {
            key: key.to_string(),
            message: format!("'{value}' is not a valid object name"),
        })
    }
}

/// Validate a value as a number literal
pub fn number(key: &str, value: &str) -> Result<String> {
    if value.parse::<f64>().is_ok() {
        Ok(value.to_string())
    } else {
        Err(RuntimeError::InvalidParameter {
            key: key.to_string(),
            message: format!("expected a number, got '{value}'"),
        })
    }
}

/// Normalize a value to the engine's logical spelling
pub fn logical(key: &str, value: &str) -> Result<&'static str> {
    if value.eq_ignore_ascii_case("true") {
        Ok("TRUE")
    } else if value.eq_ignore_ascii_case("false") {
        Ok("FALSE")
    } else {
        Err(RuntimeError::InvalidParameter {
            key: key.to_string(),
            message: format!("expected a logical, got '{value}'"),
        })
    }
}

/// Quote a string literal for the engine, escaping backslashes and quotes
pub fn quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

/// Render a filesystem path the way the engine expects it
pub fn engine_path(path: &Path) -> String {
    path.display().to_string().replace('\\', "/")
}

/// An assignment statement: `target <- expr`
pub fn assign(target: &str, expr: &str) -> Result<String> {
    let target = symbol("NewTableName", target)?;
    Ok(format!("{target} <- {expr}"))
}

/// A removal statement: `rm(name)`
pub fn remove(name: &str) -> String {
    format!("rm({name})")
}

/// Builder for one external-function call with named arguments
pub struct RFunction {
    name: String,
    args: Vec<(String, String)>,
}

impl RFunction {
    /// Start a call to a named engine function. Callers pass literal
    /// function names, so an invalid name is a programming error surfaced
    /// at build time.
    pub fn new(name: &str) -> Self {
        debug_assert!(is_valid_identifier(name), "invalid function name {name}");
        Self {
            name: name.to_string(),
            args: Vec::new(),
        }
    }

    /// Add a named argument with an already-validated expression
    pub fn arg(mut self, name: &str, expr: impl Into<String>) -> Self {
        self.args.push((name.to_string(), expr.into()));
        self
    }

    /// Add a named string argument, quoted and escaped
    pub fn string_arg(self, name: &str, value: &str) -> Self {
        let quoted = quote(value);
        self.arg(name, quoted)
    }

    /// Render the call
    pub fn build(self) -> String {
        let args: Vec<String> = self
            .args
            .into_iter()
            .map(|(name, expr)| format!("{name}={expr}"))
            .collect();
        format!("{}({})", self.name, args.join(", "))
    }
}
