//! Element query and manipulation facade.
//!
//! [`Dom`] wraps zero or more elements of one [`Document`] and exposes
//! selection, creation, attribute/style mutation, traversal, cloning and
//! event subscription. Every multi-element operation applies to each wrapped
//! element in order, so callers never branch on how many elements they hold.
//!
//! Operations documented as "first element" act on the first wrapped element
//! and do nothing (or return `None`) on an empty facade.
//!
//! # Example
//!
//! ```
//! use squares::{Document, Dom};
//!
//! let doc = Document::new();
//! let body = Dom::new(&doc, "body").unwrap();
//! let row = Dom::create(&doc, "tr", [("data-row", "1")]).unwrap();
//! body.append(&row).unwrap();
//!
//! assert_eq!(Dom::new(&doc, "tr[data-row]").unwrap().len(), 1);
//! assert_eq!(row.data("row").unwrap().as_deref(), Some("1"));
//! ```

use std::fmt;
use std::sync::Arc;

use squares_core::{Document, DomError, Event, EventKind, ListenerId, NodeId};
use squares_style::{parse_selector_list, query_selector_all};

use crate::error::Result;

/// Accepted inputs for [`Dom::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomInput<'a> {
    /// A selector resolved against the whole document.
    Selector(&'a str),
    /// A single element.
    Element(NodeId),
    /// An explicit ordered sequence of elements.
    Elements(Vec<NodeId>),
}

impl<'a> From<&'a str> for DomInput<'a> {
    fn from(selector: &'a str) -> Self {
        Self::Selector(selector)
    }
}

impl From<NodeId> for DomInput<'_> {
    fn from(node: NodeId) -> Self {
        Self::Element(node)
    }
}

impl From<Vec<NodeId>> for DomInput<'_> {
    fn from(nodes: Vec<NodeId>) -> Self {
        Self::Elements(nodes)
    }
}

impl From<&[NodeId]> for DomInput<'_> {
    fn from(nodes: &[NodeId]) -> Self {
        Self::Elements(nodes.to_vec())
    }
}

/// A wrapped set of elements.
#[derive(Clone)]
pub struct Dom {
    document: Document,
    elements: Vec<NodeId>,
}

impl Dom {
    /// Wrap the elements described by `input`.
    ///
    /// Selectors are matched against the whole document in document order.
    /// Nodes that are not elements are rejected with
    /// [`DomError::InvalidInputKind`].
    pub fn new<'a>(document: &Document, input: impl Into<DomInput<'a>>) -> Result<Self> {
        let elements = match input.into() {
            DomInput::Selector(selector) => {
                document.with_read(|t| squares_style::query_selector_all_str(t, t.document(), selector))?
            }
            DomInput::Element(node) => {
                ensure_element(document, node)?;
                vec![node]
            }
            DomInput::Elements(nodes) => {
                for &node in &nodes {
                    ensure_element(document, node)?;
                }
                nodes
            }
        };
        Ok(Self::wrap(document.clone(), elements))
    }

    /// Wrap nodes that are already known to be elements.
    pub(crate) fn wrap(document: Document, elements: Vec<NodeId>) -> Self {
        Self { document, elements }
    }

    /// The document the elements belong to.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The wrapped elements in order.
    pub fn elements(&self) -> &[NodeId] {
        &self.elements
    }

    /// The first wrapped element.
    pub fn first(&self) -> Option<NodeId> {
        self.elements.first().copied()
    }

    /// The element at `index`, wrapped on its own.
    pub fn get(&self, index: usize) -> Option<Dom> {
        self.elements
            .get(index)
            .map(|&node| Self::wrap(self.document.clone(), vec![node]))
    }

    /// Number of wrapped elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether no elements are wrapped.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Subscribe every wrapped element to `event_type` ("click", "mouseover",
    /// "mouseleave").
    pub fn on<F>(&self, event_type: &str, handler: F) -> Result<Vec<ListenerId>>
    where
        F: Fn(&DomEvent) + Send + Sync + 'static,
    {
        let kind: EventKind = event_type.parse()?;
        self.on_kind(kind, handler)
    }

    /// Subscribe every wrapped element to `kind`.
    ///
    /// The handler receives a [`DomEvent`] with the target, the bound element
    /// and the related element wrapped as facades.
    pub fn on_kind<F>(&self, kind: EventKind, handler: F) -> Result<Vec<ListenerId>>
    where
        F: Fn(&DomEvent) + Send + Sync + 'static,
    {
        let handler = Arc::new(handler);
        let mut ids = Vec::with_capacity(self.elements.len());
        for &node in &self.elements {
            let handler = Arc::clone(&handler);
            let id = self.document.add_listener(node, kind, move |document, event| {
                (*handler)(&DomEvent::from_native(document, event));
            })?;
            ids.push(id);
        }
        Ok(ids)
    }

    // =========================================================================
    // Traversal
    // =========================================================================

    /// All descendants of every wrapped element matching `selector`,
    /// flattened in order. Duplicates are preserved.
    pub fn find(&self, selector: &str) -> Result<Dom> {
        let list = parse_selector_list(selector)?;
        let found = self.document.with_read(|tree| -> squares_style::Result<Vec<NodeId>> {
            let mut found = Vec::new();
            for &node in &self.elements {
                found.extend(query_selector_all(tree, node, &list)?);
            }
            Ok(found)
        })?;
        Ok(Self::wrap(self.document.clone(), found))
    }

    /// Element children of the first element.
    pub fn children(&self) -> Result<Dom> {
        let children = match self.first() {
            Some(node) => self.document.with_read(|t| t.element_children(node))?,
            None => Vec::new(),
        };
        Ok(Self::wrap(self.document.clone(), children))
    }

    /// Number of element children of the first element.
    pub fn count_children(&self) -> Result<usize> {
        Ok(self.children()?.len())
    }

    /// Lowercase tag name of the first element.
    pub fn name(&self) -> Result<Option<String>> {
        let Some(node) = self.first() else {
            return Ok(None);
        };
        Ok(self.document.with_read(|t| t.tag(node).map(|tag| tag.map(str::to_string)))?)
    }

    /// Call `callback` with each element wrapped individually and its index.
    pub fn each<F>(&self, mut callback: F) -> &Self
    where
        F: FnMut(Dom, usize),
    {
        for (index, &node) in self.elements.iter().enumerate() {
            callback(Self::wrap(self.document.clone(), vec![node]), index);
        }
        self
    }

    /// Like [`each`](Self::each), stopping at the first error.
    pub fn try_each<F, E>(&self, mut callback: F) -> std::result::Result<&Self, E>
    where
        F: FnMut(Dom, usize) -> std::result::Result<(), E>,
    {
        for (index, &node) in self.elements.iter().enumerate() {
            callback(Self::wrap(self.document.clone(), vec![node]), index)?;
        }
        Ok(self)
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Add a class to every element.
    pub fn add_class(&self, class: &str) -> Result<&Self> {
        self.document
            .with_write(|t| self.elements.iter().try_for_each(|&node| t.add_class(node, class)))?;
        Ok(self)
    }

    /// Remove a class from every element.
    pub fn remove_class(&self, class: &str) -> Result<&Self> {
        self.document
            .with_write(|t| self.elements.iter().try_for_each(|&node| t.remove_class(node, class)))?;
        Ok(self)
    }

    /// Set inline style properties on every element.
    pub fn css<K, V>(&self, styles: &[(K, V)]) -> Result<&Self>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.document.with_write(|t| {
            styles.iter().try_for_each(|(property, value)| {
                self.elements
                    .iter()
                    .try_for_each(|&node| t.set_style_property(node, property.as_ref(), value.as_ref()))
            })
        })?;
        Ok(self)
    }

    /// Detach the element at `index` from its parent and drop it from the set.
    ///
    /// The detached element stays alive; destroy it through the document when
    /// it is no longer needed.
    pub fn remove(&mut self, index: usize) -> Result<&mut Self> {
        let Some(&node) = self.elements.get(index) else {
            return Err(DomError::IndexOutOfRange {
                index,
                len: self.elements.len(),
            }
            .into());
        };
        self.document.with_write(|t| t.detach(node))?;
        self.elements.remove(index);
        Ok(self)
    }

    /// Set an attribute on the first element.
    pub fn set_attr(&self, name: &str, value: impl Into<String>) -> Result<()> {
        if let Some(node) = self.first() {
            self.document.with_write(|t| t.set_attribute(node, name, value))?;
        }
        Ok(())
    }

    /// Read a `data-*` attribute of the first element.
    ///
    /// `name` uses dataset naming: `"row"` reads `data-row`, `"squareSize"`
    /// reads `data-square-size`.
    pub fn data(&self, name: &str) -> Result<Option<String>> {
        let Some(node) = self.first() else {
            return Ok(None);
        };
        let attribute = dataset_attribute(name);
        Ok(self
            .document
            .with_read(|t| t.attribute(node, &attribute).map(|v| v.map(str::to_string)))?)
    }

    /// Shallow copy of the first element: attributes and inline style, no
    /// children and no listeners. The copy is detached.
    pub fn clone_node(&self) -> Result<Option<Dom>> {
        let Some(node) = self.first() else {
            return Ok(None);
        };
        let copy = self.document.with_write(|t| t.clone_node(node))?;
        Ok(Some(Self::wrap(self.document.clone(), vec![copy])))
    }

    /// Append `node`'s first element as the last child of this facade's
    /// first element. Returns `node` so appends can be chained downwards.
    pub fn append(&self, node: &Dom) -> Result<Dom> {
        if !self.document.ptr_eq(&node.document) {
            return Err(DomError::HierarchyRequest.into());
        }
        if let (Some(parent), Some(child)) = (self.first(), node.first()) {
            self.document.append_child(parent, child)?;
        }
        Ok(node.clone())
    }

    // =========================================================================
    // Construction helpers
    // =========================================================================

    /// Create a detached element with the given attributes.
    pub fn create<I, K, V>(document: &Document, tag: &str, attributes: I) -> Result<Dom>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let node = document.create_element(tag);
        document.with_write(|t| {
            attributes
                .into_iter()
                .try_for_each(|(name, value)| t.set_attribute(node, name.as_ref(), value))
        })?;
        Ok(Self::wrap(document.clone(), vec![node]))
    }

    /// Read a custom property from the document element.
    ///
    /// Returns an empty string when it is not set.
    pub fn get_css_variable(document: &Document, name: &str) -> String {
        document.root_property(name)
    }
}

impl fmt::Debug for Dom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dom").field("elements", &self.elements).finish()
    }
}

impl PartialEq for Dom {
    fn eq(&self, other: &Self) -> bool {
        self.document.ptr_eq(&other.document) && self.elements == other.elements
    }
}

/// An event as delivered to [`Dom::on`] handlers.
#[derive(Debug, Clone)]
pub struct DomEvent {
    /// The kind of event.
    pub kind: EventKind,
    /// The node the event was dispatched to.
    pub target: Dom,
    /// The element the handler is bound to.
    pub current: Dom,
    /// The other node of a pointer transition, if any.
    pub related: Option<Dom>,
}

impl DomEvent {
    fn from_native(document: &Document, event: &Event) -> Self {
        let wrap = |node: NodeId| Dom::wrap(document.clone(), vec![node]);
        Self {
            kind: event.kind,
            target: wrap(event.target),
            current: wrap(event.current),
            related: event.related.map(wrap),
        }
    }

    /// The document the event was dispatched in.
    pub fn document(&self) -> &Document {
        self.current.document()
    }
}

fn ensure_element(document: &Document, node: NodeId) -> Result<()> {
    document.with_read(|t| -> Result<()> {
        let kind = t.kind(node)?;
        if kind.is_element() {
            Ok(())
        } else {
            Err(DomError::InvalidInputKind {
                found: kind.describe(),
            }
            .into())
        }
    })
}

/// `"squareSize"` -> `"data-square-size"`.
fn dataset_attribute(name: &str) -> String {
    let mut attribute = String::with_capacity(name.len() + 8);
    attribute.push_str("data-");
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            attribute.push('-');
            attribute.push(c.to_ascii_lowercase());
        } else {
            attribute.push(c);
        }
    }
    attribute
}
