//! Construction of the grid and its controls.
//!
//! The builder produces this structure inside the root element:
//!
//! ```text
//! div.squares-wrapper
//! └── div.squares
//!     ├── button.plus.column   aria-label="Plus column"
//!     ├── button.plus.row      aria-label="Plus row"
//!     ├── button.minus.row     aria-label="Minus row"
//!     ├── button.minus.column  aria-label="Minus column"
//!     └── table
//!         └── tbody
//!             └── tr[data-row=1..R]
//!                 └── td[data-column=1..C]
//! ```

use squares_core::logging::targets;
use squares_core::{Document, NodeId};

use crate::config::DEFAULT_GRID_SIZE;
use crate::dom::Dom;
use crate::error::Result;

/// Class on the outer wrapper.
pub const WRAPPER_CLASS: &str = "squares-wrapper";
/// Class on the controls container.
pub const SQUARES_CLASS: &str = "squares";
/// Class toggled on the minus controls while they are visible.
pub const SHOW_CLASS: &str = "show";

/// Control buttons in the order they are appended: class list and label.
const CONTROLS: [(&str, &str); 4] = [
    ("plus column", "Plus column"),
    ("plus row", "Plus row"),
    ("minus row", "Minus row"),
    ("minus column", "Minus column"),
];

/// Handles to the elements of one mounted grid.
///
/// Only node ids are stored; [`Dom`] views are created on demand for a
/// document. `rows` must be refreshed after every row insertion or removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridElements {
    /// `div.squares-wrapper`
    pub wrapper: NodeId,
    /// `div.squares`
    pub squares: NodeId,
    /// `table`
    pub table: NodeId,
    /// `tbody`
    pub tbody: NodeId,
    /// Rows in order.
    pub rows: Vec<NodeId>,
    /// `button.plus.column`
    pub plus_column: NodeId,
    /// `button.plus.row`
    pub plus_row: NodeId,
    /// `button.minus.row`
    pub minus_row: NodeId,
    /// `button.minus.column`
    pub minus_column: NodeId,
    /// All four controls.
    pub buttons: Vec<NodeId>,
    /// The two minus controls.
    pub minuses: Vec<NodeId>,
    /// The table and the four controls, for pointer-leave detection.
    pub table_buttons: Vec<NodeId>,
}

impl GridElements {
    fn view(document: &Document, nodes: &[NodeId]) -> Dom {
        Dom::wrap(document.clone(), nodes.to_vec())
    }

    /// The wrapper element.
    pub fn wrapper(&self, document: &Document) -> Dom {
        Self::view(document, &[self.wrapper])
    }

    /// The row body.
    pub fn tbody(&self, document: &Document) -> Dom {
        Self::view(document, &[self.tbody])
    }

    /// The cached rows.
    pub fn rows(&self, document: &Document) -> Dom {
        Self::view(document, &self.rows)
    }

    /// The minus-row control.
    pub fn minus_row(&self, document: &Document) -> Dom {
        Self::view(document, &[self.minus_row])
    }

    /// The minus-column control.
    pub fn minus_column(&self, document: &Document) -> Dom {
        Self::view(document, &[self.minus_column])
    }

    /// Both minus controls.
    pub fn minuses(&self, document: &Document) -> Dom {
        Self::view(document, &self.minuses)
    }

    /// The table and all controls.
    pub fn table_buttons(&self, document: &Document) -> Dom {
        Self::view(document, &self.table_buttons)
    }

    /// Re-query the rows from the row body.
    pub fn refresh_rows(&mut self, document: &Document) -> Result<()> {
        self.rows = self.tbody(document).find("tr")?.elements().to_vec();
        Ok(())
    }
}

/// Builds the grid for one mount.
#[derive(Debug, Clone)]
pub struct GridBuilder<'a> {
    document: &'a Document,
    rows: usize,
    columns: usize,
}

impl<'a> GridBuilder<'a> {
    /// A 4x4 builder.
    pub fn new(document: &'a Document) -> Self {
        Self {
            document,
            rows: DEFAULT_GRID_SIZE,
            columns: DEFAULT_GRID_SIZE,
        }
    }

    /// Set the number of rows.
    pub fn rows(mut self, rows: usize) -> Self {
        self.rows = rows;
        self
    }

    /// Set the number of cells per row.
    pub fn columns(mut self, columns: usize) -> Self {
        self.columns = columns;
        self
    }

    /// Build the grid and append it to the first element of `root`.
    ///
    /// Not idempotent: every call appends another grid.
    pub fn build(self, root: &Dom) -> Result<GridElements> {
        let doc = self.document;
        let wrapper = Dom::create(doc, "div", [("class", WRAPPER_CLASS)])?;
        let squares = Dom::create(doc, "div", [("class", SQUARES_CLASS)])?;
        let table = Dom::create(doc, "table", std::iter::empty::<(&str, &str)>())?;
        let tbody = Dom::create(doc, "tbody", std::iter::empty::<(&str, &str)>())?;

        for row_index in 1..=self.rows {
            let tr = Dom::create(doc, "tr", [("data-row", row_index.to_string())])?;
            for column_index in 1..=self.columns {
                tr.append(&Dom::create(doc, "td", [("data-column", column_index.to_string())])?)?;
            }
            tbody.append(&tr)?;
        }

        let mut controls = Vec::with_capacity(CONTROLS.len());
        for (class, label) in CONTROLS {
            let button = Dom::create(doc, "button", [("class", class), ("aria-label", label)])?;
            controls.push(squares.append(&button)?);
        }

        root.append(&wrapper)?
            .append(&squares)?
            .append(&table)?
            .append(&tbody)?;

        let first = |dom: &Dom| dom.first().ok_or(squares_core::DomError::InvalidNodeId);
        let elements = GridElements {
            wrapper: first(&wrapper)?,
            squares: first(&squares)?,
            table: first(&table)?,
            tbody: first(&tbody)?,
            rows: tbody.find("tr")?.elements().to_vec(),
            plus_column: first(&controls[0])?,
            plus_row: first(&controls[1])?,
            minus_row: first(&controls[2])?,
            minus_column: first(&controls[3])?,
            buttons: wrapper.find(".squares button")?.elements().to_vec(),
            minuses: wrapper.find(".squares .minus")?.elements().to_vec(),
            table_buttons: wrapper
                .find(".squares table, .squares button")?
                .elements()
                .to_vec(),
        };

        tracing::debug!(
            target: targets::WIDGET,
            rows = self.rows,
            columns = self.columns,
            "built grid"
        );
        Ok(elements)
    }
}
