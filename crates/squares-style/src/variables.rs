//! CSS variables (custom properties) declared on the document root.

use std::collections::HashMap;

use squares_core::Document;

use crate::Result;
use crate::parser::parse_root_declarations;

/// Custom properties for the document root.
///
/// Names are stored without the leading `--`; lookups accept either form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootVariables {
    variables: HashMap<String, String>,
}

impl RootVariables {
    /// Create empty variables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the custom properties of every `:root` rule in `css`.
    ///
    /// Ordinary properties (without `--`) are ignored.
    pub fn from_css(css: &str) -> Result<Self> {
        let mut vars = Self::new();
        for (name, value) in parse_root_declarations(css)? {
            if name.starts_with("--") {
                vars.set(name, value);
            } else {
                tracing::debug!(property = %name, "ignoring non-custom root property");
            }
        }
        Ok(vars)
    }

    /// Set a variable.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let name = name.strip_prefix("--").unwrap_or(&name).to_string();
        self.variables.insert(name, value.into());
    }

    /// Get a variable value.
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = name.strip_prefix("--").unwrap_or(name);
        self.variables.get(name).map(|s| s.as_str())
    }

    /// Get a variable as an integer, using [`parse_integer_prefix`].
    pub fn integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(parse_integer_prefix)
    }

    /// Check if a variable exists.
    pub fn contains(&self, name: &str) -> bool {
        let name = name.strip_prefix("--").unwrap_or(name);
        self.variables.contains_key(name)
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Whether no variables are set.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Iterate over all variables (names without `--`).
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Write every variable onto the document element's inline style.
    pub fn apply(&self, document: &Document) {
        for (name, value) in self.iter() {
            document.set_root_property(&format!("--{name}"), value);
        }
        tracing::debug!(count = self.len(), "applied root variables");
    }
}

/// Read the leading integer of a CSS value, the way `parseInt` does.
///
/// Leading whitespace and one sign are accepted; parsing stops at the first
/// non-digit. `"40px"` yields 40, `"1.5rem"` yields 1, and values without a
/// leading digit (including the empty string) yield `None`.
pub fn parse_integer_prefix(value: &str) -> Option<i64> {
    let trimmed = value.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let magnitude: i64 = digits[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
