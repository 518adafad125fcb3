//! CSS parsing module.

mod declarations;
mod selector;

pub use declarations::parse_root_declarations;
pub use selector::{parse_selector, parse_selector_list};
