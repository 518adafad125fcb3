//! Selector queries over a node tree.
//!
//! Queries follow `querySelectorAll` semantics: candidates are the
//! descendants of the scope node, but the selector is matched against the
//! whole tree, so `.squares td` finds cells under a scoped `tbody` when the
//! `.squares` element is above the scope.

use squares_core::{NodeId, NodeTree};

use crate::Result;
use crate::parser::parse_selector_list;
use crate::selector::{SelectorList, SelectorMatcher};

/// Elements under `scope` (exclusive) matching any selector of `list`,
/// in document order and without duplicates.
pub fn query_selector_all(tree: &NodeTree, scope: NodeId, list: &SelectorList) -> Result<Vec<NodeId>> {
    let mut found = Vec::new();
    for node in tree.descendants(scope)? {
        if SelectorMatcher::matches_any(list, tree, node)? {
            found.push(node);
        }
    }
    Ok(found)
}

/// Parse `selector` and run [`query_selector_all`].
pub fn query_selector_all_str(tree: &NodeTree, scope: NodeId, selector: &str) -> Result<Vec<NodeId>> {
    let list = parse_selector_list(selector)?;
    query_selector_all(tree, scope, &list)
}
