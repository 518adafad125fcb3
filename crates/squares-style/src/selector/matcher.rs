//! Selector matching algorithm.

use squares_core::{DomResult, NodeId, NodeTree};

use super::{Combinator, PseudoClass, Selector, SelectorList, SelectorPart, TypeSelector};

/// Element state for selector matching.
#[derive(Debug, Clone, Default)]
pub struct ElementMatchContext<'a> {
    /// Lowercase tag name.
    pub tag: &'a str,
    /// Value of the `id` attribute.
    pub id: Option<&'a str>,
    /// Class list.
    pub classes: Vec<&'a str>,
    /// Attributes in source order.
    pub attributes: &'a [(String, String)],
    /// Sibling information for structural pseudo-classes.
    pub sibling_info: Option<SiblingInfo>,
    /// Number of child nodes (for :empty).
    pub child_count: usize,
}

impl<'a> ElementMatchContext<'a> {
    /// Build a context for an element of `tree`.
    ///
    /// Returns `Ok(None)` for non-element nodes.
    pub fn from_tree(tree: &'a NodeTree, node: NodeId) -> DomResult<Option<Self>> {
        let Some(tag) = tree.tag(node)? else {
            return Ok(None);
        };
        Ok(Some(Self {
            tag,
            id: tree.attribute(node, "id")?,
            classes: tree.class_list(node)?,
            attributes: tree.attributes(node)?,
            sibling_info: tree
                .element_index(node)?
                .map(|(index, count)| SiblingInfo { index, count }),
            child_count: tree.children(node)?.len(),
        }))
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Sibling position information.
#[derive(Debug, Clone, Copy)]
pub struct SiblingInfo {
    /// Zero-based index among element siblings.
    pub index: usize,
    /// Total number of element siblings (including self).
    pub count: usize,
}

impl SiblingInfo {
    /// Returns true if this is the first sibling.
    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    /// Returns true if this is the last sibling.
    pub fn is_last(&self) -> bool {
        self.index + 1 == self.count
    }

    /// Returns true if this is the only child.
    pub fn is_only(&self) -> bool {
        self.count == 1
    }
}

/// Selector matching engine.
pub struct SelectorMatcher;

impl SelectorMatcher {
    /// Check if a selector part matches the element.
    pub fn part_matches(part: &SelectorPart, context: &ElementMatchContext<'_>) -> bool {
        if let Some(TypeSelector::Type(name)) = &part.type_selector {
            if !name.eq_ignore_ascii_case(context.tag) {
                return false;
            }
        }

        if let Some(id) = &part.id {
            if context.id != Some(id.as_str()) {
                return false;
            }
        }

        if !part
            .classes
            .iter()
            .all(|class| context.classes.contains(&class.as_str()))
        {
            return false;
        }

        if !part
            .attributes
            .iter()
            .all(|attribute| attribute.matches(context.attribute(&attribute.name)))
        {
            return false;
        }

        part.pseudo_classes
            .iter()
            .all(|pseudo| Self::pseudo_matches(pseudo, context))
    }

    fn pseudo_matches(pseudo: &PseudoClass, context: &ElementMatchContext<'_>) -> bool {
        match pseudo {
            PseudoClass::FirstChild => context.sibling_info.is_some_and(|s| s.is_first()),
            PseudoClass::LastChild => context.sibling_info.is_some_and(|s| s.is_last()),
            PseudoClass::OnlyChild => context.sibling_info.is_some_and(|s| s.is_only()),
            PseudoClass::NthChild(expr) => context.sibling_info.is_some_and(|s| expr.matches(s.index)),
            PseudoClass::Empty => context.child_count == 0,
            PseudoClass::Not(inner) => !Self::part_matches(inner, context),
        }
    }

    /// Check if `node` matches a full selector, considering combinators.
    ///
    /// Walks the selector from right to left. Descendant and general sibling
    /// combinators backtrack, so `div > p span` is matched correctly even when
    /// the first candidate ancestor is a dead end.
    pub fn matches(selector: &Selector, tree: &NodeTree, node: NodeId) -> DomResult<bool> {
        if selector.parts.is_empty() {
            return Ok(false);
        }
        Self::matches_from(selector, selector.parts.len() - 1, tree, node)
    }

    /// Check if `node` matches any selector of the list.
    pub fn matches_any(list: &SelectorList, tree: &NodeTree, node: NodeId) -> DomResult<bool> {
        for selector in list.selectors() {
            if Self::matches(selector, tree, node)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn matches_from(selector: &Selector, index: usize, tree: &NodeTree, node: NodeId) -> DomResult<bool> {
        let Some(context) = ElementMatchContext::from_tree(tree, node)? else {
            return Ok(false);
        };
        if !Self::part_matches(&selector.parts[index], &context) {
            return Ok(false);
        }
        if index == 0 {
            return Ok(true);
        }

        let next = index - 1;
        match selector.combinators[next] {
            Combinator::Child => match tree.parent(node)? {
                Some(parent) => Self::matches_from(selector, next, tree, parent),
                None => Ok(false),
            },
            Combinator::Descendant => {
                for ancestor in tree.ancestors(node)? {
                    if Self::matches_from(selector, next, tree, ancestor)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Combinator::AdjacentSibling => match tree.previous_element_siblings(node)?.first() {
                Some(&sibling) => Self::matches_from(selector, next, tree, sibling),
                None => Ok(false),
            },
            Combinator::GeneralSibling => {
                for sibling in tree.previous_element_siblings(node)? {
                    if Self::matches_from(selector, next, tree, sibling)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }
}
