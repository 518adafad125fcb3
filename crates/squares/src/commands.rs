//! Grid mutation commands.
//!
//! Every command leaves rows numbered `1..=R` and each row's cells numbered
//! `1..=C` before it returns. Remove commands hide the minus controls; add
//! commands leave visibility alone.

use std::fmt;

use squares_core::logging::targets;
use squares_core::{Document, DomError};

use crate::dom::Dom;
use crate::error::Result;
use crate::hover::{self, MinusVisibility};
use crate::widget::WidgetState;

/// The four grid mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Append a cell to every row.
    AddColumn,
    /// Append a row shaped like the first row.
    AddRow,
    /// Remove the hovered row.
    RemoveRow,
    /// Remove the hovered column from every row.
    RemoveColumn,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AddColumn => "add-column",
            Self::AddRow => "add-row",
            Self::RemoveRow => "remove-row",
            Self::RemoveColumn => "remove-column",
        })
    }
}

/// What a command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The grid changed.
    Applied,
    /// Refused: the grid already has a single row or column.
    AtMinimum,
    /// Refused: nothing has been hovered yet, so there is no row or column
    /// to remove.
    NoHoverSelection,
}

/// Append a cell to every row, numbered after that row's last cell.
#[tracing::instrument(skip(document, state), target = "squares::commands", level = "debug")]
pub(crate) fn add_column(document: &Document, state: &mut WidgetState) -> Result<CommandOutcome> {
    state.elements.rows(document).try_each(|tr, _| -> Result<()> {
        let next = tr.count_children()? + 1;
        tr.append(&Dom::create(document, "td", [("data-column", next.to_string())])?)?;
        Ok(())
    })?;
    Ok(CommandOutcome::Applied)
}

/// Append a row of shallow copies of the first row's cells.
///
/// `subscribe` is called with the new row before it is attached so it can be
/// wired to the row hover handler.
#[tracing::instrument(skip(document, state, subscribe), target = "squares::commands", level = "debug")]
pub(crate) fn add_row<F>(
    document: &Document,
    state: &mut WidgetState,
    subscribe: F,
) -> Result<CommandOutcome>
where
    F: FnOnce(&Dom) -> Result<()>,
{
    let tbody = state.elements.tbody(document);
    let next = tbody.count_children()? + 1;
    let tr = Dom::create(document, "tr", [("data-row", next.to_string())])?;
    subscribe(&tr)?;

    state.elements.rows(document).children()?.try_each(|td, _| -> Result<()> {
        if let Some(copy) = td.clone_node()? {
            tr.append(&copy)?;
        }
        Ok(())
    })?;
    tbody.append(&tr)?;
    state.elements.refresh_rows(document)?;
    Ok(CommandOutcome::Applied)
}

/// Remove the hovered row and renumber the rest.
#[tracing::instrument(skip(document, state), target = "squares::commands", level = "debug")]
pub(crate) fn remove_row(document: &Document, state: &mut WidgetState) -> Result<CommandOutcome> {
    let tbody = state.elements.tbody(document);
    if tbody.count_children()? <= 1 {
        tracing::debug!(target: targets::COMMANDS, "refusing to remove the last row");
        return Ok(CommandOutcome::AtMinimum);
    }
    let Some(row) = state.selection.row else {
        tracing::debug!(target: targets::COMMANDS, "no hovered row");
        return Ok(CommandOutcome::NoHoverSelection);
    };

    let mut rows = state.elements.rows(document);
    let index = row - 1;
    let removed = rows.elements().get(index).copied().ok_or(DomError::IndexOutOfRange {
        index,
        len: rows.len(),
    })?;
    rows.remove(index)?;
    document.destroy(removed)?;

    state.elements.refresh_rows(document)?;
    state.elements.rows(document).try_each(|tr, i| tr.set_attr("data-row", (i + 1).to_string()))?;

    hover::set_visibility(document, state, MinusVisibility::Hidden)?;
    Ok(CommandOutcome::Applied)
}

/// Remove the hovered column from every row and renumber each row's cells.
#[tracing::instrument(skip(document, state), target = "squares::commands", level = "debug")]
pub(crate) fn remove_column(document: &Document, state: &mut WidgetState) -> Result<CommandOutcome> {
    let rows = state.elements.rows(document);
    if rows.count_children()? <= 1 {
        tracing::debug!(target: targets::COMMANDS, "refusing to remove the last column");
        return Ok(CommandOutcome::AtMinimum);
    }
    let Some(column) = state.selection.column else {
        tracing::debug!(target: targets::COMMANDS, "no hovered column");
        return Ok(CommandOutcome::NoHoverSelection);
    };
    let index = column - 1;

    // Check every row first so a bad index never leaves a ragged grid.
    let mut cells = Vec::with_capacity(rows.len());
    for tr in rows.elements() {
        let row_cells = Dom::wrap(document.clone(), vec![*tr]).children()?;
        if index >= row_cells.len() {
            return Err(DomError::IndexOutOfRange {
                index,
                len: row_cells.len(),
            }
            .into());
        }
        cells.push(row_cells);
    }

    for mut row_cells in cells {
        let removed = row_cells.elements()[index];
        row_cells.remove(index)?;
        document.destroy(removed)?;
        row_cells.try_each(|td, i| td.set_attr("data-column", (i + 1).to_string()))?;
    }

    hover::set_visibility(document, state, MinusVisibility::Hidden)?;
    Ok(CommandOutcome::Applied)
}

/// Run `command` against a widget's state.
pub(crate) fn execute<F>(
    document: &Document,
    state: &mut WidgetState,
    command: Command,
    subscribe_row: F,
) -> Result<CommandOutcome>
where
    F: FnOnce(&Dom) -> Result<()>,
{
    let outcome = match command {
        Command::AddColumn => add_column(document, state),
        Command::AddRow => add_row(document, state, subscribe_row),
        Command::RemoveRow => remove_row(document, state),
        Command::RemoveColumn => remove_column(document, state),
    }?;
    tracing::debug!(target: targets::COMMANDS, %command, ?outcome, "command finished");
    Ok(outcome)
}
