//! Widget configuration.
//!
//! ```
//! use squares::SquaresConfig;
//!
//! let config = SquaresConfig::from_toml_str("initial_rows = 2\ninitial_columns = 6").unwrap();
//! assert_eq!((config.initial_rows, config.initial_columns), (2, 6));
//! assert_eq!(config.size_variable, "--square-size");
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default number of rows and columns.
pub const DEFAULT_GRID_SIZE: usize = 4;

/// Settings for one mounted widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SquaresConfig {
    /// Rows built at mount.
    pub initial_rows: usize,
    /// Cells per row built at mount.
    pub initial_columns: usize,
    /// Custom property holding the cell size.
    pub size_variable: String,
    /// Custom property holding the offset of the minus controls.
    pub offset_variable: String,
    /// Custom property holding the cell border width.
    pub border_width_variable: String,
}

impl Default for SquaresConfig {
    fn default() -> Self {
        Self {
            initial_rows: DEFAULT_GRID_SIZE,
            initial_columns: DEFAULT_GRID_SIZE,
            size_variable: "--square-size".to_string(),
            offset_variable: "--square-offset".to_string(),
            border_width_variable: "--square-border-width".to_string(),
        }
    }
}

impl SquaresConfig {
    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Set the initial grid shape.
    pub fn with_shape(mut self, rows: usize, columns: usize) -> Self {
        self.initial_rows = rows;
        self.initial_columns = columns;
        self
    }

    /// Check that the configuration describes a usable grid.
    pub fn validate(&self) -> Result<()> {
        if self.initial_rows == 0 {
            return Err(Error::invalid_config("initial_rows must be at least 1"));
        }
        if self.initial_columns == 0 {
            return Err(Error::invalid_config("initial_columns must be at least 1"));
        }
        for name in [
            &self.size_variable,
            &self.offset_variable,
            &self.border_width_variable,
        ] {
            if !name.starts_with("--") || name.len() < 3 {
                return Err(Error::invalid_config(format!(
                    "'{name}' is not a custom property name"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_four_by_four() {
        let config = SquaresConfig::default();
        assert_eq!(config.initial_rows, 4);
        assert_eq!(config.initial_columns, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_toml_uses_defaults() {
        assert_eq!(SquaresConfig::from_toml_str("").unwrap(), SquaresConfig::default());
    }

    #[test]
    fn toml_round_trip() {
        let config = SquaresConfig {
            offset_variable: "--grid-offset".into(),
            ..SquaresConfig::default().with_shape(3, 7)
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(SquaresConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn rejects_empty_grid() {
        let err = SquaresConfig::from_toml_str("initial_rows = 0").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    fn rejects_bad_variable_names() {
        let err = SquaresConfig::from_toml_str("size_variable = \"square-size\"").unwrap_err();
        assert!(err.to_string().contains("square-size"));
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = SquaresConfig::from_toml_str("rows = 3").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }
}
