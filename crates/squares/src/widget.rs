//! Widget mount, event wiring and introspection.
//!
//! A mounted [`Squares`] owns its state behind a mutex shared with its event
//! handlers. Handlers reach the document through the event they receive and
//! never store it, so a document does not keep itself alive through its own
//! listeners.

use std::sync::Arc;

use parking_lot::Mutex;
use squares_core::logging::targets;
use squares_core::{Document, EventKind, NodeId};

use crate::builder::{GridBuilder, GridElements};
use crate::commands::{self, Command, CommandOutcome};
use crate::config::SquaresConfig;
use crate::dom::{Dom, DomEvent, DomInput};
use crate::error::{Error, Result};
use crate::hover::{self, HoverSelection, MinusVisibility};

/// Per-mount mutable state.
#[derive(Debug)]
pub(crate) struct WidgetState {
    pub(crate) config: SquaresConfig,
    pub(crate) elements: GridElements,
    pub(crate) selection: HoverSelection,
    pub(crate) visibility: MinusVisibility,
}

type SharedState = Arc<Mutex<WidgetState>>;

/// Row and column counts of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    /// Number of rows.
    pub rows: usize,
    /// Cells in the first row.
    pub columns: usize,
}

/// The indices carried by one row and its cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSnapshot {
    /// Parsed `data-row`, if present and numeric.
    pub index: Option<usize>,
    /// Parsed `data-column` of each cell in order.
    pub cells: Vec<Option<usize>>,
}

/// A mounted grid widget.
///
/// Dropping the handle does not unmount the widget; its handlers keep
/// working until [`unmount`](Self::unmount) is called.
///
/// # Example
///
/// ```
/// use squares::{CommandOutcome, Document, Squares, SquaresConfig};
///
/// let doc = Document::new();
/// let root = doc.create_element("div");
/// doc.with_write(|t| t.set_attribute(root, "id", "grid")).unwrap();
/// doc.append_child(doc.body(), root).unwrap();
///
/// let squares = Squares::mount(&doc, "#grid", SquaresConfig::default())
///     .unwrap()
///     .expect("root exists");
/// assert_eq!(squares.add_column().unwrap(), CommandOutcome::Applied);
/// assert_eq!(squares.shape().unwrap().columns, 5);
/// ```
pub struct Squares {
    document: Document,
    state: SharedState,
}

static_assertions::assert_impl_all!(Squares: Send, Sync);

impl Squares {
    /// Build a grid inside the first element of `root` and wire its handlers.
    ///
    /// Returns `Ok(None)` when `root` resolves to no element.
    pub fn mount<'a>(
        document: &Document,
        root: impl Into<DomInput<'a>>,
        config: SquaresConfig,
    ) -> Result<Option<Self>> {
        config.validate()?;
        let root = Dom::new(document, root)?;
        if root.is_empty() {
            tracing::debug!(target: targets::WIDGET, "mount root not found");
            return Ok(None);
        }

        let elements = GridBuilder::new(document)
            .rows(config.initial_rows)
            .columns(config.initial_columns)
            .build(&root)?;
        let state = Arc::new(Mutex::new(WidgetState {
            config,
            elements,
            selection: HoverSelection::default(),
            visibility: MinusVisibility::Hidden,
        }));
        attach_handlers(document, &state)?;

        let wrapper = state.lock().elements.wrapper;
        tracing::info!(target: targets::WIDGET, ?wrapper, "mounted");
        Ok(Some(Self {
            document: document.clone(),
            state,
        }))
    }

    /// The document the widget is mounted in.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// A copy of the cached element handles.
    pub fn elements(&self) -> GridElements {
        self.state.lock().elements.clone()
    }

    /// Run a command, as if its control had been clicked.
    ///
    /// Must not be called from inside one of this widget's own handlers.
    pub fn execute(&self, command: Command) -> Result<CommandOutcome> {
        run(&self.document, &self.state, command)
    }

    /// Append a column.
    pub fn add_column(&self) -> Result<CommandOutcome> {
        self.execute(Command::AddColumn)
    }

    /// Append a row.
    pub fn add_row(&self) -> Result<CommandOutcome> {
        self.execute(Command::AddRow)
    }

    /// Remove the hovered row.
    pub fn remove_row(&self) -> Result<CommandOutcome> {
        self.execute(Command::RemoveRow)
    }

    /// Remove the hovered column.
    pub fn remove_column(&self) -> Result<CommandOutcome> {
        self.execute(Command::RemoveColumn)
    }

    /// The most recent hover selection.
    pub fn hover_selection(&self) -> HoverSelection {
        self.state.lock().selection
    }

    /// Whether the minus controls are shown.
    pub fn minus_visibility(&self) -> MinusVisibility {
        self.state.lock().visibility
    }

    /// Current row and column counts, read from the document.
    pub fn shape(&self) -> Result<GridShape> {
        let tbody = self.state.lock().elements.tbody(&self.document);
        let rows = tbody.children()?;
        Ok(GridShape {
            rows: rows.len(),
            columns: rows.count_children()?,
        })
    }

    /// The indices of every row and cell, read from the document.
    pub fn snapshot(&self) -> Result<Vec<RowSnapshot>> {
        let tbody = self.state.lock().elements.tbody(&self.document);
        let parse = |value: Option<String>| value.and_then(|v| v.parse::<usize>().ok());

        let mut snapshot = Vec::new();
        tbody.children()?.try_each(|tr, _| -> Result<()> {
            let mut cells = Vec::new();
            tr.children()?.try_each(|td, _| -> Result<()> {
                cells.push(parse(td.data("column")?));
                Ok(())
            })?;
            snapshot.push(RowSnapshot {
                index: parse(tr.data("row")?),
                cells,
            });
            Ok(())
        })?;
        Ok(snapshot)
    }

    /// Verify that the grid is non-empty, rectangular and contiguously
    /// numbered, and that the cached rows match the document.
    pub fn check_invariants(&self) -> Result<()> {
        let snapshot = self.snapshot()?;
        let Some(first) = snapshot.first() else {
            return Err(Error::invariant("grid has no rows"));
        };
        let columns = first.cells.len();
        if columns == 0 {
            return Err(Error::invariant("grid has no columns"));
        }

        for (r, row) in snapshot.iter().enumerate() {
            if row.index != Some(r + 1) {
                return Err(Error::invariant(format!(
                    "row {} has data-row {:?}",
                    r + 1,
                    row.index
                )));
            }
            if row.cells.len() != columns {
                return Err(Error::invariant(format!(
                    "row {} has {} cells, expected {columns}",
                    r + 1,
                    row.cells.len()
                )));
            }
            for (c, cell) in row.cells.iter().enumerate() {
                if *cell != Some(c + 1) {
                    return Err(Error::invariant(format!(
                        "cell {} of row {} has data-column {cell:?}",
                        c + 1,
                        r + 1
                    )));
                }
            }
        }

        let state = self.state.lock();
        let rows = state.elements.tbody(&self.document).children()?;
        if rows.elements() != state.elements.rows.as_slice() {
            return Err(Error::invariant("cached rows are out of date"));
        }
        Ok(())
    }

    /// Remove the widget's elements and their listeners from the document.
    ///
    /// The root element is left as it was before mount.
    pub fn unmount(self) -> Result<()> {
        let wrapper = self.state.lock().elements.wrapper;
        self.document.destroy(wrapper)?;
        tracing::info!(target: targets::WIDGET, ?wrapper, "unmounted");
        Ok(())
    }
}

impl std::fmt::Debug for Squares {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Squares")
            .field("wrapper", &state.elements.wrapper)
            .field("rows", &state.elements.rows.len())
            .field("selection", &state.selection)
            .field("visibility", &state.visibility)
            .finish()
    }
}

fn run(document: &Document, shared: &SharedState, command: Command) -> Result<CommandOutcome> {
    let mut state = shared.lock();
    commands::execute(document, &mut state, command, |row| attach_row_hover(row, shared))
}

fn attach_handlers(document: &Document, shared: &SharedState) -> Result<()> {
    let elements = shared.lock().elements.clone();

    attach_row_hover(&elements.rows(document), shared)?;

    let state = Arc::clone(shared);
    elements
        .table_buttons(document)
        .on_kind(EventKind::MouseLeave, move |event| {
            if let Err(e) = hover::region_leave(&mut state.lock(), event) {
                tracing::error!(target: targets::HOVER, error = %e, "pointer leave failed");
            }
        })?;

    for (node, command) in [
        (elements.plus_column, Command::AddColumn),
        (elements.plus_row, Command::AddRow),
        (elements.minus_row, Command::RemoveRow),
        (elements.minus_column, Command::RemoveColumn),
    ] {
        attach_click(document, node, command, shared)?;
    }
    Ok(())
}

fn attach_row_hover(rows: &Dom, shared: &SharedState) -> Result<()> {
    let state = Arc::clone(shared);
    rows.on_kind(EventKind::MouseOver, move |event: &DomEvent| {
        if let Err(e) = hover::row_over(&mut state.lock(), event) {
            tracing::error!(target: targets::HOVER, error = %e, "row hover failed");
        }
    })?;
    Ok(())
}

fn attach_click(document: &Document, node: NodeId, command: Command, shared: &SharedState) -> Result<()> {
    let state = Arc::clone(shared);
    Dom::wrap(document.clone(), vec![node]).on_kind(EventKind::Click, move |event| {
        if let Err(e) = run(event.document(), &state, command) {
            tracing::error!(target: targets::COMMANDS, %command, error = %e, "command failed");
        }
    })?;
    Ok(())
}
