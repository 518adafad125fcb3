//! Node model for Squares documents.
//!
//! Provides the arena-backed node tree with:
//! - Stable node identifiers via slotmap storage
//! - Parent-child relationships with ordered children and cascade destroy
//! - Ordered element attributes, class lists and inline styles
//! - Per-node listener bookkeeping
//!
//! # Key Types
//!
//! - [`NodeId`] - Stable identifier for each node
//! - [`NodeKind`] - Document, element or text
//! - [`NodeTree`] - The arena owning every node of one document
//!
//! A [`NodeTree`] is usually accessed through a [`Document`](crate::Document)
//! handle, which wraps it in a lock and adds event dispatch.

use slotmap::{SlotMap, new_key_type};

use crate::error::{DomError, DomResult};
use crate::event::{EventHandler, EventKind, Listener, ListenerId};
use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a node in a [`NodeTree`].
    ///
    /// `NodeId`s remain valid while the node is attached, detached or moved.
    /// They become invalid when the node is destroyed.
    pub struct NodeId;
}

impl NodeId {
    /// Convert the NodeId to a raw u64 value.
    ///
    /// Useful for host bindings that need a numeric handle.
    #[inline]
    pub fn as_raw(self) -> u64 {
        use slotmap::Key;
        self.data().as_ffi()
    }

    /// Create a NodeId from a raw u64 value.
    ///
    /// This does not check that the node exists.
    #[inline]
    pub fn from_raw(raw: u64) -> Self {
        Self::from(slotmap::KeyData::from_ffi(raw))
    }
}

/// The kind of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The document node. Exactly one per tree, never an element.
    Document,
    /// An element with a lowercase tag name.
    Element {
        /// Lowercase tag name.
        tag: String,
    },
    /// A text node.
    Text {
        /// The character data.
        data: String,
    },
}

impl NodeKind {
    /// Returns true for element nodes.
    pub fn is_element(&self) -> bool {
        matches!(self, Self::Element { .. })
    }

    /// The tag name for element nodes.
    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::Element { tag } => Some(tag),
            _ => None,
        }
    }

    /// Short description used in errors and diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Document => "document node",
            Self::Element { .. } => "element",
            Self::Text { .. } => "text node",
        }
    }
}

/// Internal data stored for each node.
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Attributes in insertion order. The `class` attribute holds the class list.
    attributes: Vec<(String, String)>,
    /// Inline style declarations in insertion order.
    style: Vec<(String, String)>,
    /// Listeners bound to this node, in registration order.
    listeners: Vec<ListenerId>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            attributes: Vec::new(),
            style: Vec::new(),
            listeners: Vec::new(),
        }
    }

    fn element_mut(&mut self) -> DomResult<&mut Self> {
        if self.kind.is_element() {
            Ok(self)
        } else {
            Err(DomError::NotAnElement)
        }
    }
}

/// The arena that owns every node of one document.
///
/// A fresh tree contains the document node, the document element (`html`)
/// and `body`.
pub struct NodeTree {
    nodes: SlotMap<NodeId, NodeData>,
    listeners: SlotMap<ListenerId, Listener>,
    document: NodeId,
    document_element: NodeId,
    body: NodeId,
}

impl NodeTree {
    /// Create a tree holding an empty `html > body` document.
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let document = nodes.insert(NodeData::new(NodeKind::Document));
        let document_element = nodes.insert(NodeData::new(NodeKind::Element { tag: "html".into() }));
        let body = nodes.insert(NodeData::new(NodeKind::Element { tag: "body".into() }));

        let mut tree = Self {
            nodes,
            listeners: SlotMap::with_key(),
            document,
            document_element,
            body,
        };
        tree.link(document, document_element);
        tree.link(document_element, body);
        tree
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        if let Some(data) = self.nodes.get_mut(child) {
            data.parent = Some(parent);
        }
        if let Some(data) = self.nodes.get_mut(parent) {
            data.children.push(child);
        }
    }

    fn data(&self, id: NodeId) -> DomResult<&NodeData> {
        self.nodes.get(id).ok_or(DomError::InvalidNodeId)
    }

    fn data_mut(&mut self, id: NodeId) -> DomResult<&mut NodeData> {
        self.nodes.get_mut(id).ok_or(DomError::InvalidNodeId)
    }

    /// The document node.
    pub fn document(&self) -> NodeId {
        self.document
    }

    /// The document element (`html`), which carries root custom properties.
    pub fn document_element(&self) -> NodeId {
        self.document_element
    }

    /// The `body` element.
    pub fn body(&self) -> NodeId {
        self.body
    }

    // =========================================================================
    // Creation / Destruction
    // =========================================================================

    /// Create a detached element. The tag name is stored lowercase.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let tag = tag.to_ascii_lowercase();
        let id = self.nodes.insert(NodeData::new(NodeKind::Element { tag }));
        tracing::trace!(target: targets::TREE, ?id, "created element");
        id
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, data: impl Into<String>) -> NodeId {
        self.nodes.insert(NodeData::new(NodeKind::Text { data: data.into() }))
    }

    /// Create a detached shallow copy of a node.
    ///
    /// Copies the kind, attributes and inline style. Children, parent and
    /// listeners are not copied.
    pub fn clone_node(&mut self, id: NodeId) -> DomResult<NodeId> {
        let source = self.data(id)?;
        if matches!(source.kind, NodeKind::Document) {
            return Err(DomError::HierarchyRequest);
        }
        let mut copy = NodeData::new(source.kind.clone());
        copy.attributes = source.attributes.clone();
        copy.style = source.style.clone();
        Ok(self.nodes.insert(copy))
    }

    /// Remove a node and all its descendants from the tree.
    ///
    /// Listeners bound to any removed node are dropped as well. The document,
    /// document element and body cannot be destroyed.
    #[tracing::instrument(skip(self), target = "squares_core::tree", level = "trace")]
    pub fn destroy(&mut self, id: NodeId) -> DomResult<()> {
        if id == self.document || id == self.document_element || id == self.body {
            return Err(DomError::HierarchyRequest);
        }
        let descendants = self.collect_descendants(id)?;
        tracing::trace!(target: targets::TREE, ?id, descendant_count = descendants.len(), "destroying subtree");

        self.detach(id)?;

        for node in descendants.into_iter().chain(std::iter::once(id)) {
            if let Some(data) = self.nodes.remove(node) {
                for listener in data.listeners {
                    self.listeners.remove(listener);
                }
            }
        }
        Ok(())
    }

    /// Collect all descendant IDs, children before parents.
    fn collect_descendants(&self, id: NodeId) -> DomResult<Vec<NodeId>> {
        let mut result = Vec::new();
        self.collect_descendants_recursive(id, &mut result)?;
        Ok(result)
    }

    fn collect_descendants_recursive(&self, id: NodeId, result: &mut Vec<NodeId>) -> DomResult<()> {
        for &child in &self.data(id)?.children {
            self.collect_descendants_recursive(child, result)?;
            result.push(child);
        }
        Ok(())
    }

    /// Check if a node exists.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of live nodes, including the document skeleton.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// The kind of a node.
    pub fn kind(&self, id: NodeId) -> DomResult<&NodeKind> {
        self.data(id).map(|d| &d.kind)
    }

    /// Returns true if the node exists and is an element.
    pub fn is_element(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(|d| d.kind.is_element())
    }

    /// The lowercase tag name, or `None` for non-elements.
    pub fn tag(&self, id: NodeId) -> DomResult<Option<&str>> {
        self.data(id).map(|d| d.kind.tag())
    }

    /// The parent of a node.
    pub fn parent(&self, id: NodeId) -> DomResult<Option<NodeId>> {
        self.data(id).map(|d| d.parent)
    }

    /// All child nodes in order.
    pub fn children(&self, id: NodeId) -> DomResult<&[NodeId]> {
        self.data(id).map(|d| d.children.as_slice())
    }

    /// Element children in order (text nodes skipped).
    pub fn element_children(&self, id: NodeId) -> DomResult<Vec<NodeId>> {
        Ok(self
            .children(id)?
            .iter()
            .copied()
            .filter(|&child| self.is_element(child))
            .collect())
    }

    /// Append `child` as the last child of `parent`, moving it if attached elsewhere.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        let parent_kind = self.kind(parent)?;
        if matches!(parent_kind, NodeKind::Text { .. }) {
            return Err(DomError::HierarchyRequest);
        }
        if matches!(self.kind(child)?, NodeKind::Document) {
            return Err(DomError::HierarchyRequest);
        }
        if self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::CircularParentage);
        }

        self.detach(child)?;
        self.link(parent, child);
        tracing::trace!(target: targets::TREE, ?parent, ?child, "appended child");
        Ok(())
    }

    /// Remove a node from its parent. The node stays alive and can be reinserted.
    pub fn detach(&mut self, id: NodeId) -> DomResult<()> {
        let parent = self.data(id)?.parent;
        if let Some(parent_id) = parent {
            if let Some(parent_data) = self.nodes.get_mut(parent_id) {
                parent_data.children.retain(|&c| c != id);
            }
            if let Some(data) = self.nodes.get_mut(id) {
                data.parent = None;
            }
        }
        Ok(())
    }

    /// Check if `ancestor` is `id` or one of its ancestors.
    fn is_inclusive_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(current_id) = current {
            if current_id == ancestor {
                return true;
            }
            current = self.nodes.get(current_id).and_then(|d| d.parent);
        }
        false
    }

    /// Whether the node is reachable from the document node.
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.contains(id) && self.is_inclusive_ancestor(self.document, id)
    }

    /// Ancestors from the immediate parent up to the root.
    pub fn ancestors(&self, id: NodeId) -> DomResult<Vec<NodeId>> {
        let mut result = Vec::new();
        let mut current = self.data(id)?.parent;
        while let Some(current_id) = current {
            result.push(current_id);
            current = self.nodes.get(current_id).and_then(|d| d.parent);
        }
        Ok(result)
    }

    /// All descendants in document (pre-order) order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> DomResult<Vec<NodeId>> {
        let mut result = Vec::new();
        for &child in self.children(id)? {
            self.preorder_recursive(child, &mut result)?;
        }
        Ok(result)
    }

    fn preorder_recursive(&self, id: NodeId, result: &mut Vec<NodeId>) -> DomResult<()> {
        result.push(id);
        for &child in &self.data(id)?.children {
            self.preorder_recursive(child, result)?;
        }
        Ok(())
    }

    /// Position of an element among its parent's element children.
    ///
    /// Returns `(index, count)`, or `None` for parentless nodes.
    pub fn element_index(&self, id: NodeId) -> DomResult<Option<(usize, usize)>> {
        let Some(parent) = self.data(id)?.parent else {
            return Ok(None);
        };
        let siblings = self.element_children(parent)?;
        Ok(siblings
            .iter()
            .position(|&s| s == id)
            .map(|index| (index, siblings.len())))
    }

    /// Preceding element siblings, nearest first.
    pub fn previous_element_siblings(&self, id: NodeId) -> DomResult<Vec<NodeId>> {
        let Some(parent) = self.data(id)?.parent else {
            return Ok(Vec::new());
        };
        let siblings = self.element_children(parent)?;
        let position = siblings.iter().position(|&s| s == id).unwrap_or(0);
        Ok(siblings[..position].iter().rev().copied().collect())
    }

    // =========================================================================
    // Attributes / Classes
    // =========================================================================

    /// Get an attribute value.
    pub fn attribute(&self, id: NodeId, name: &str) -> DomResult<Option<&str>> {
        Ok(self
            .data(id)?
            .attributes
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str()))
    }

    /// All attributes in insertion order.
    pub fn attributes(&self, id: NodeId) -> DomResult<&[(String, String)]> {
        self.data(id).map(|d| d.attributes.as_slice())
    }

    /// Set an attribute, replacing any previous value in place.
    pub fn set_attribute(
        &mut self,
        id: NodeId,
        name: &str,
        value: impl Into<String>,
    ) -> DomResult<()> {
        let name = name.to_ascii_lowercase();
        let data = self.data_mut(id)?.element_mut()?;
        let value = value.into();
        match data.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => data.attributes.push((name, value)),
        }
        Ok(())
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> DomResult<Option<String>> {
        let data = self.data_mut(id)?.element_mut()?;
        let position = data
            .attributes
            .iter()
            .position(|(n, _)| n.eq_ignore_ascii_case(name));
        Ok(position.map(|p| data.attributes.remove(p).1))
    }

    /// The class list, split from the `class` attribute.
    pub fn class_list(&self, id: NodeId) -> DomResult<Vec<&str>> {
        Ok(self
            .attribute(id, "class")?
            .map(|classes| classes.split_ascii_whitespace().collect())
            .unwrap_or_default())
    }

    /// Check whether an element has a class.
    pub fn has_class(&self, id: NodeId, class: &str) -> DomResult<bool> {
        Ok(self.class_list(id)?.contains(&class))
    }

    /// Add a class if not already present.
    pub fn add_class(&mut self, id: NodeId, class: &str) -> DomResult<()> {
        let mut classes: Vec<String> = self.class_list(id)?.into_iter().map(String::from).collect();
        if classes.iter().any(|c| c == class) {
            return Ok(());
        }
        classes.push(class.to_string());
        self.set_attribute(id, "class", classes.join(" "))
    }

    /// Remove a class if present.
    pub fn remove_class(&mut self, id: NodeId, class: &str) -> DomResult<()> {
        let classes: Vec<String> = self
            .class_list(id)?
            .into_iter()
            .filter(|&c| c != class)
            .map(String::from)
            .collect();
        if self.attribute(id, "class")?.is_none() {
            return Ok(());
        }
        self.set_attribute(id, "class", classes.join(" "))
    }

    // =========================================================================
    // Inline Style
    // =========================================================================

    /// Get an inline style property.
    pub fn style_property(&self, id: NodeId, property: &str) -> DomResult<Option<&str>> {
        Ok(self
            .data(id)?
            .style
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str()))
    }

    /// All inline style declarations in insertion order.
    pub fn style(&self, id: NodeId) -> DomResult<&[(String, String)]> {
        self.data(id).map(|d| d.style.as_slice())
    }

    /// Set an inline style property. An empty value removes the declaration.
    pub fn set_style_property(
        &mut self,
        id: NodeId,
        property: &str,
        value: impl Into<String>,
    ) -> DomResult<()> {
        let data = self.data_mut(id)?.element_mut()?;
        let value = value.into();
        if value.is_empty() {
            data.style.retain(|(p, _)| p != property);
            return Ok(());
        }
        match data.style.iter_mut().find(|(p, _)| p == property) {
            Some(entry) => entry.1 = value,
            None => data.style.push((property.to_string(), value)),
        }
        Ok(())
    }

    // =========================================================================
    // Listeners
    // =========================================================================

    /// Register a listener on a node.
    pub fn add_listener(
        &mut self,
        node: NodeId,
        kind: EventKind,
        handler: EventHandler,
    ) -> DomResult<ListenerId> {
        if !self.contains(node) {
            return Err(DomError::InvalidNodeId);
        }
        let id = self.listeners.insert(Listener { node, kind, handler });
        self.data_mut(node)?.listeners.push(id);
        tracing::trace!(target: targets::EVENT, ?node, %kind, "added listener");
        Ok(id)
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let Some(listener) = self.listeners.remove(id) else {
            return false;
        };
        if let Some(data) = self.nodes.get_mut(listener.node) {
            data.listeners.retain(|&l| l != id);
        }
        true
    }

    /// Handlers bound to `node` for `kind`, in registration order.
    pub fn handlers_for(&self, node: NodeId, kind: EventKind) -> DomResult<Vec<EventHandler>> {
        Ok(self
            .data(node)?
            .listeners
            .iter()
            .filter_map(|&l| self.listeners.get(l))
            .filter(|l| l.kind == kind)
            .map(|l| l.handler.clone())
            .collect())
    }

    /// Number of listeners bound to a node.
    pub fn listener_count(&self, node: NodeId) -> DomResult<usize> {
        self.data(node).map(|d| d.listeners.len())
    }

    /// Total number of live listeners in the tree.
    pub fn total_listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for NodeTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_fresh_tree_skeleton() {
        let tree = NodeTree::new();
        assert_eq!(tree.children(tree.document()).unwrap(), &[tree.document_element()]);
        assert_eq!(tree.children(tree.document_element()).unwrap(), &[tree.body()]);
        assert_eq!(tree.tag(tree.body()).unwrap(), Some("body"));
        assert_eq!(tree.tag(tree.document()).unwrap(), None);
        assert_eq!(tree.node_count(), 3);
    }

    #[test]
    fn test_append_and_reparent() {
        let mut tree = NodeTree::new();
        let a = tree.create_element("DIV");
        let b = tree.create_element("span");
        tree.append_child(tree.body(), a).unwrap();
        tree.append_child(a, b).unwrap();
        assert_eq!(tree.tag(a).unwrap(), Some("div"));
        assert_eq!(tree.parent(b).unwrap(), Some(a));

        tree.append_child(tree.body(), b).unwrap();
        assert!(tree.children(a).unwrap().is_empty());
        assert_eq!(tree.children(tree.body()).unwrap(), &[a, b]);
    }

    #[test]
    fn test_circular_parentage_rejected() {
        let mut tree = NodeTree::new();
        let a = tree.create_element("div");
        let b = tree.create_element("div");
        tree.append_child(a, b).unwrap();
        assert_eq!(tree.append_child(b, a), Err(DomError::CircularParentage));
        assert_eq!(tree.append_child(a, a), Err(DomError::CircularParentage));
    }

    #[test]
    fn test_text_cannot_have_children() {
        let mut tree = NodeTree::new();
        let text = tree.create_text("hi");
        let div = tree.create_element("div");
        assert_eq!(tree.append_child(text, div), Err(DomError::HierarchyRequest));
        assert_eq!(tree.set_attribute(text, "id", "x"), Err(DomError::NotAnElement));
    }

    #[test]
    fn test_cascade_destroy_drops_listeners() {
        let mut tree = NodeTree::new();
        let table = tree.create_element("table");
        let row = tree.create_element("tr");
        tree.append_child(tree.body(), table).unwrap();
        tree.append_child(table, row).unwrap();
        tree.add_listener(row, EventKind::MouseOver, Arc::new(|_, _| {}))
            .unwrap();
        assert_eq!(tree.total_listener_count(), 1);

        tree.destroy(table).unwrap();
        assert!(!tree.contains(table));
        assert!(!tree.contains(row));
        assert_eq!(tree.total_listener_count(), 0);
        assert!(tree.children(tree.body()).unwrap().is_empty());
        assert_eq!(tree.destroy(tree.body()), Err(DomError::HierarchyRequest));
    }

    #[test]
    fn test_attributes_and_classes() {
        let mut tree = NodeTree::new();
        let button = tree.create_element("button");
        tree.set_attribute(button, "class", "minus row").unwrap();
        tree.set_attribute(button, "aria-label", "Minus row").unwrap();
        assert_eq!(tree.class_list(button).unwrap(), vec!["minus", "row"]);

        tree.add_class(button, "show").unwrap();
        tree.add_class(button, "show").unwrap();
        assert_eq!(tree.attribute(button, "class").unwrap(), Some("minus row show"));

        tree.remove_class(button, "minus").unwrap();
        assert!(!tree.has_class(button, "minus").unwrap());
        assert_eq!(tree.attributes(button).unwrap().len(), 2);
        assert_eq!(
            tree.remove_attribute(button, "aria-label").unwrap(),
            Some("Minus row".into())
        );
    }

    #[test]
    fn test_style_properties() {
        let mut tree = NodeTree::new();
        let el = tree.create_element("button");
        tree.set_style_property(el, "left", "92px").unwrap();
        tree.set_style_property(el, "left", "140px").unwrap();
        assert_eq!(tree.style_property(el, "left").unwrap(), Some("140px"));
        tree.set_style_property(el, "left", "").unwrap();
        assert!(tree.style(el).unwrap().is_empty());
    }

    #[test]
    fn test_clone_is_shallow() {
        let mut tree = NodeTree::new();
        let cell = tree.create_element("td");
        tree.set_attribute(cell, "data-column", "3").unwrap();
        let inner = tree.create_element("span");
        tree.append_child(cell, inner).unwrap();
        tree.add_listener(cell, EventKind::Click, Arc::new(|_, _| {}))
            .unwrap();

        let copy = tree.clone_node(cell).unwrap();
        assert_ne!(copy, cell);
        assert_eq!(tree.attribute(copy, "data-column").unwrap(), Some("3"));
        assert!(tree.children(copy).unwrap().is_empty());
        assert_eq!(tree.listener_count(copy).unwrap(), 0);
        assert_eq!(tree.parent(copy).unwrap(), None);
    }

    #[test]
    fn test_descendants_preorder() {
        let mut tree = NodeTree::new();
        let table = tree.create_element("table");
        let body = tree.create_element("tbody");
        let r1 = tree.create_element("tr");
        let r2 = tree.create_element("tr");
        tree.append_child(table, body).unwrap();
        tree.append_child(body, r1).unwrap();
        tree.append_child(body, r2).unwrap();
        assert_eq!(tree.descendants(table).unwrap(), vec![body, r1, r2]);
        assert_eq!(tree.ancestors(r2).unwrap(), vec![body, table]);
        assert_eq!(tree.element_index(r2).unwrap(), Some((1, 2)));
        assert_eq!(tree.previous_element_siblings(r2).unwrap(), vec![r1]);
        assert!(!tree.is_connected(r1));
    }

    #[test]
    fn test_raw_round_trip() {
        let mut tree = NodeTree::new();
        let el = tree.create_element("div");
        assert_eq!(NodeId::from_raw(el.as_raw()), el);
    }

    #[test]
    fn test_remove_listener() {
        let mut tree = NodeTree::new();
        let el = tree.create_element("button");
        let id = tree
            .add_listener(el, EventKind::Click, Arc::new(|_, _| {}))
            .unwrap();
        assert_eq!(tree.handlers_for(el, EventKind::Click).unwrap().len(), 1);
        assert!(tree.handlers_for(el, EventKind::MouseOver).unwrap().is_empty());
        assert!(tree.remove_listener(id));
        assert!(!tree.remove_listener(id));
        assert_eq!(tree.listener_count(el).unwrap(), 0);
    }
}
