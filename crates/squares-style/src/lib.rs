//! Selectors, queries and root custom properties for Squares.
//!
//! This crate provides the CSS side of the headless document:
//!
//! - **Selectors**: Type, class, ID, attribute, structural pseudo-class and
//!   combinator selectors, parsed with `cssparser`
//! - **Queries**: `querySelectorAll`-style lookup over a node tree
//! - **Variables**: Custom properties declared on the document root
//!
//! # Example
//!
//! ```
//! use squares_core::Document;
//! use squares_style::prelude::*;
//!
//! let doc = Document::new();
//! let row = doc.create_element("tr");
//! doc.with_write(|t| t.set_attribute(row, "data-row", "1")).unwrap();
//! doc.append_child(doc.body(), row).unwrap();
//!
//! let list = parse_selector_list("body > tr[data-row]").unwrap();
//! let found = doc.with_read(|t| query_selector_all(t, t.document(), &list)).unwrap();
//! assert_eq!(found, vec![row]);
//! ```

pub mod parser;
pub mod query;
pub mod selector;
pub mod variables;

mod error;

pub use error::{Error, Result};
pub use parser::{parse_root_declarations, parse_selector, parse_selector_list};
pub use query::{query_selector_all, query_selector_all_str};
pub use variables::{RootVariables, parse_integer_prefix};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::parser::{parse_selector, parse_selector_list};
    pub use crate::query::{query_selector_all, query_selector_all_str};
    pub use crate::selector::{Combinator, PseudoClass, Selector, SelectorList, SelectorMatcher, SelectorPart};
    pub use crate::variables::{RootVariables, parse_integer_prefix};
}
