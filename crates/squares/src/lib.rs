//! Squares - an embeddable rows x columns grid widget.
//!
//! This is the umbrella crate: it re-exports the headless document from
//! `squares-core`, exposes selector/variable support from `squares-style`, and
//! adds the widget itself:
//!
//! - **Facade**: [`Dom`], a set of elements with chainable mutation helpers
//! - **Builder**: the initial grid and its four controls
//! - **Hover**: positioning and visibility of the minus controls
//! - **Commands**: add/remove row/column with contiguous renumbering
//! - **Widget**: [`Squares`] mount, unmount and introspection
//!
//! # Example
//!
//! ```
//! use squares::prelude::*;
//!
//! let doc = Document::new();
//! RootVariables::from_css(
//!     ":root { --square-size: 40px; --square-offset: 3px; --square-border-width: 1px; }",
//! )
//! .unwrap()
//! .apply(&doc);
//!
//! let squares = Squares::mount(&doc, "body", SquaresConfig::default())
//!     .unwrap()
//!     .unwrap();
//!
//! // Hover the second cell of the third row, then remove that row.
//! let cell = Dom::new(&doc, "tr[data-row=\"3\"] td[data-column=\"2\"]").unwrap();
//! doc.move_pointer(cell.first()).unwrap();
//! assert_eq!(squares.minus_visibility(), MinusVisibility::Shown);
//!
//! assert_eq!(squares.remove_row().unwrap(), CommandOutcome::Applied);
//! assert_eq!(squares.shape().unwrap(), GridShape { rows: 3, columns: 4 });
//! squares.check_invariants().unwrap();
//! ```

pub use squares_core::*;

/// Selectors, queries and root custom properties.
pub mod style {
    pub use squares_style::*;
}

pub mod builder;
pub mod commands;
pub mod config;
pub mod dom;
pub mod geometry;
pub mod hover;
pub mod prelude;
pub mod widget;

mod error;

pub use builder::{GridBuilder, GridElements};
pub use commands::{Command, CommandOutcome};
pub use config::SquaresConfig;
pub use dom::{Dom, DomEvent, DomInput};
pub use error::{Error, Result};
pub use geometry::Geometry;
pub use hover::{HoverSelection, MinusVisibility};
pub use widget::{GridShape, RowSnapshot, Squares};
