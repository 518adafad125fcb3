//! Core systems for Squares.
//!
//! This crate provides the headless document the Squares widget runs on:
//!
//! - **Node Tree**: Arena-backed nodes with ordered children, attributes,
//!   class lists and inline styles
//! - **Document**: Shared, lockable handle over one node tree
//! - **Events**: Listener registration and bubbling dispatch
//! - **Pointer Model**: `mouseover` / `mouseleave` sequences from pointer moves
//! - **Logging**: `tracing` targets and tree visualization
//!
//! # Example
//!
//! ```
//! use squares_core::{Document, EventKind};
//!
//! let doc = Document::new();
//! let button = doc.create_element("button");
//! doc.append_child(doc.body(), button).unwrap();
//!
//! doc.add_listener(button, EventKind::Click, |_doc, event| {
//!     println!("clicked {:?}", event.target);
//! })
//! .unwrap();
//!
//! assert_eq!(doc.click(button).unwrap(), 1);
//! ```

mod document;
mod error;
mod event;
pub mod logging;
pub mod node;

pub use document::Document;
pub use error::{DomError, DomResult};
pub use event::{Event, EventHandler, EventKind, ListenerId};
pub use logging::{TreeDebug, TreeFormatOptions, TreeStyle};
pub use node::{NodeId, NodeKind, NodeTree};
