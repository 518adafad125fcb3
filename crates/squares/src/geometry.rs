//! Cell geometry read from root custom properties.

use squares_core::Document;
use squares_core::logging::targets;
use squares_style::parse_integer_prefix;

use crate::config::SquaresConfig;
use crate::dom::Dom;

/// Pixel measurements of the grid, as integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    /// Cell edge length.
    pub size: i64,
    /// Offset of the minus controls from the cell edge.
    pub offset: i64,
    /// Cell border width.
    pub border_width: i64,
}

impl Geometry {
    /// Read the three custom properties named by `config`.
    ///
    /// Values are parsed with integer-prefix semantics, so `"40px"` reads as
    /// 40. Returns `None` (and logs a warning) when any of them is missing or
    /// does not start with a number.
    pub fn read(document: &Document, config: &SquaresConfig) -> Option<Self> {
        let read = |name: &str| {
            let raw = Dom::get_css_variable(document, name);
            let value = parse_integer_prefix(&raw);
            if value.is_none() {
                tracing::warn!(
                    target: targets::HOVER,
                    variable = name,
                    value = %raw,
                    "geometry variable missing or not numeric"
                );
            }
            value
        };
        Some(Self {
            size: read(&config.size_variable)?,
            offset: read(&config.offset_variable)?,
            border_width: read(&config.border_width_variable)?,
        })
    }

    /// Position of the control for the 1-based row or column `index`:
    /// `index * size + offset + (index - 1) * border_width`.
    ///
    /// `None` when the result does not fit in an `i64`.
    pub fn position(&self, index: usize) -> Option<i64> {
        let index = i64::try_from(index).ok()?;
        let cells = index.checked_mul(self.size)?;
        let borders = index.checked_sub(1)?.checked_mul(self.border_width)?;
        cells.checked_add(self.offset)?.checked_add(borders)
    }

    /// [`position`](Self::position) as a CSS pixel length.
    pub fn px(&self, index: usize) -> Option<String> {
        self.position(index).map(|position| format!("{position}px"))
    }
}
