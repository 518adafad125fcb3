//! CSS selector types and matching.

mod matcher;
mod types;

pub use matcher::{ElementMatchContext, SelectorMatcher, SiblingInfo};
pub use types::*;
