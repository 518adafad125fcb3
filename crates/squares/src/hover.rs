//! Hover highlight controller.
//!
//! Hovering a row records the hovered row and column, moves the minus
//! controls next to them and shows both. Leaving the region formed by the
//! table and the controls hides them again, unless the pointer moved between
//! the table and a control (or between controls): the controls sit outside
//! the table and must stay reachable across the gap.

use squares_core::Document;
use squares_core::logging::targets;

use crate::builder::SHOW_CLASS;
use crate::dom::{Dom, DomEvent};
use crate::error::Result;
use crate::geometry::Geometry;
use crate::widget::WidgetState;

/// The most recently hovered row and column (1-based).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HoverSelection {
    /// Hovered row index.
    pub row: Option<usize>,
    /// Hovered column index.
    pub column: Option<usize>,
}

/// Visibility of the two minus controls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MinusVisibility {
    /// Neither control carries the `show` class.
    #[default]
    Hidden,
    /// Both controls carry the `show` class.
    Shown,
}

/// Apply `visibility` to both minus controls.
pub(crate) fn set_visibility(
    document: &Document,
    state: &mut WidgetState,
    visibility: MinusVisibility,
) -> Result<()> {
    let minuses = state.elements.minuses(document);
    match visibility {
        MinusVisibility::Shown => minuses.add_class(SHOW_CLASS)?,
        MinusVisibility::Hidden => minuses.remove_class(SHOW_CLASS)?,
    };
    if state.visibility != visibility {
        tracing::trace!(target: targets::HOVER, ?visibility, "minus controls");
    }
    state.visibility = visibility;
    Ok(())
}

/// `mouseover` on a row: the bound row gives the row index, the hovered cell
/// gives the column index.
pub(crate) fn row_over(state: &mut WidgetState, event: &DomEvent) -> Result<()> {
    let document = event.document();
    let row = parse_index(event.current.data("row")?);
    let column = match hovered_cell(event)? {
        Some(cell) => parse_index(cell.data("column")?),
        None => None,
    };
    let geometry = Geometry::read(document, &state.config);

    if let Some(row) = row {
        state.selection.row = Some(row);
        if let Some(top) = geometry.and_then(|g| control_offset(&g, row)) {
            state.elements.minus_row(document).css(&[("top", top)])?;
        }
    }
    if let Some(column) = column {
        state.selection.column = Some(column);
        if let Some(left) = geometry.and_then(|g| control_offset(&g, column)) {
            state.elements.minus_column(document).css(&[("left", left)])?;
        }
    }
    tracing::trace!(target: targets::HOVER, ?row, ?column, "row hovered");

    set_visibility(document, state, MinusVisibility::Shown)
}

/// The pixel offset of the control for `index`, or `None` (logged) when it
/// overflows.
fn control_offset(geometry: &Geometry, index: usize) -> Option<String> {
    let px = geometry.px(index);
    if px.is_none() {
        tracing::warn!(target: targets::HOVER, index, ?geometry, "control position out of range");
    }
    px
}

/// `mouseleave` on the table or a control.
pub(crate) fn region_leave(state: &mut WidgetState, event: &DomEvent) -> Result<()> {
    let target = event.target.name()?;
    let related = match &event.related {
        Some(related) => related.name()?,
        None => None,
    };

    if leaves_region(target.as_deref(), related.as_deref()) {
        set_visibility(event.document(), state, MinusVisibility::Hidden)?;
    }
    Ok(())
}

/// Whether a leave from `target` into `related` exits the table-or-control
/// region entirely.
fn leaves_region(target: Option<&str>, related: Option<&str>) -> bool {
    match target {
        Some("table") => related != Some("button"),
        Some("button") => !matches!(related, Some("table" | "button")),
        _ => false,
    }
}

/// The cell under the pointer: the target itself or its nearest ancestor
/// carrying `data-column`, searched up to the bound row.
fn hovered_cell(event: &DomEvent) -> Result<Option<Dom>> {
    let (Some(target), Some(row)) = (event.target.first(), event.current.first()) else {
        return Ok(None);
    };
    let document = event.document();
    let cell = document.with_read(|t| -> squares_core::DomResult<_> {
        let mut candidates = vec![target];
        candidates.extend(t.ancestors(target)?);
        for node in candidates {
            if node == row {
                break;
            }
            if t.attribute(node, "data-column")?.is_some() {
                return Ok(Some(node));
            }
        }
        Ok(None)
    })?;
    Ok(cell.map(|node| Dom::wrap(document.clone(), vec![node])))
}

/// Parse a 1-based index attribute. Zero and garbage yield `None`.
fn parse_index(value: Option<String>) -> Option<usize> {
    value
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&index| index >= 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leave_policy() {
        // Pointer leaves the combined region.
        assert!(leaves_region(Some("table"), None));
        assert!(leaves_region(Some("table"), Some("body")));
        assert!(leaves_region(Some("button"), Some("div")));
        assert!(leaves_region(Some("button"), None));

        // Pointer stays inside it.
        assert!(!leaves_region(Some("table"), Some("button")));
        assert!(!leaves_region(Some("button"), Some("table")));
        assert!(!leaves_region(Some("button"), Some("button")));

        // Other targets never hide.
        assert!(!leaves_region(Some("td"), None));
    }

    #[test]
    fn index_parsing() {
        assert_eq!(parse_index(Some("3".into())), Some(3));
        assert_eq!(parse_index(Some("0".into())), None);
        assert_eq!(parse_index(Some("x".into())), None);
        assert_eq!(parse_index(None), None);
    }
}
