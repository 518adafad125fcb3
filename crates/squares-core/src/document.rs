//! Shared document handle, event dispatch and pointer model.
//!
//! [`Document`] wraps a [`NodeTree`] in a `RwLock` behind an `Arc`, so it is
//! cheap to clone and safe to hand to listeners. Dispatch collects the
//! handlers along the propagation path under a read lock, releases the lock,
//! and only then invokes them. Handlers can therefore mutate the document,
//! add listeners, or remove nodes without deadlocking.
//!
//! The pointer model turns "the pointer is now over node X" into the
//! `mouseleave` / `mouseover` sequence a browser would deliver.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::error::{DomError, DomResult};
use crate::event::{Event, EventHandler, EventKind, ListenerId};
use crate::logging::targets;
use crate::node::{NodeId, NodeTree};

struct DocumentInner {
    tree: RwLock<NodeTree>,
    /// Node currently under the pointer.
    pointer: Mutex<Option<NodeId>>,
}

/// A handle to a headless document.
///
/// Clones share the same tree.
#[derive(Clone)]
pub struct Document {
    inner: Arc<DocumentInner>,
}

static_assertions::assert_impl_all!(Document: Send, Sync);

impl Document {
    /// Create an empty `html > body` document.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(DocumentInner {
                tree: RwLock::new(NodeTree::new()),
                pointer: Mutex::new(None),
            }),
        }
    }

    /// Run a closure with shared access to the tree.
    pub fn with_read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&NodeTree) -> R,
    {
        f(&self.inner.tree.read())
    }

    /// Run a closure with exclusive access to the tree.
    ///
    /// Must not be called from inside another `with_read`/`with_write` closure.
    pub fn with_write<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut NodeTree) -> R,
    {
        f(&mut self.inner.tree.write())
    }

    /// Whether two handles refer to the same document.
    pub fn ptr_eq(&self, other: &Document) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// The document node.
    pub fn document_node(&self) -> NodeId {
        self.with_read(|t| t.document())
    }

    /// The document element (`html`).
    pub fn document_element(&self) -> NodeId {
        self.with_read(|t| t.document_element())
    }

    /// The `body` element.
    pub fn body(&self) -> NodeId {
        self.with_read(|t| t.body())
    }

    /// Create a detached element.
    pub fn create_element(&self, tag: &str) -> NodeId {
        self.with_write(|t| t.create_element(tag))
    }

    /// Create a detached text node.
    pub fn create_text(&self, data: impl Into<String>) -> NodeId {
        self.with_write(|t| t.create_text(data))
    }

    /// Append `child` as the last child of `parent`.
    pub fn append_child(&self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.with_write(|t| t.append_child(parent, child))
    }

    /// Destroy a node, its descendants and their listeners.
    pub fn destroy(&self, id: NodeId) -> DomResult<()> {
        self.with_write(|t| t.destroy(id))?;
        let hovered = self.hovered();
        if hovered.is_some_and(|p| !self.with_read(|t| t.contains(p))) {
            *self.inner.pointer.lock() = None;
        }
        Ok(())
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.with_read(|t| t.node_count())
    }

    // =========================================================================
    // Root custom properties
    // =========================================================================

    /// Set a custom property (or any style property) on the document element.
    pub fn set_root_property(&self, name: &str, value: impl Into<String>) {
        self.with_write(|t| {
            let root = t.document_element();
            // The document element is always an element, so this cannot fail.
            let _ = t.set_style_property(root, name, value);
        });
    }

    /// Read a property from the document element.
    ///
    /// Returns an empty string when the property is not set.
    pub fn root_property(&self, name: &str) -> String {
        self.with_read(|t| {
            t.style_property(t.document_element(), name)
                .ok()
                .flatten()
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        })
    }

    // =========================================================================
    // Listeners / Dispatch
    // =========================================================================

    /// Register a listener on a node.
    pub fn add_listener<F>(&self, node: NodeId, kind: EventKind, handler: F) -> DomResult<ListenerId>
    where
        F: Fn(&Document, &Event) + Send + Sync + 'static,
    {
        let handler: EventHandler = Arc::new(handler);
        self.with_write(|t| t.add_listener(node, kind, handler))
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.with_write(|t| t.remove_listener(id))
    }

    /// Dispatch an event to `target`.
    ///
    /// Bubbling kinds are delivered to the target and then each ancestor;
    /// other kinds only to the target. Returns the number of handlers invoked.
    pub fn dispatch(
        &self,
        kind: EventKind,
        target: NodeId,
        related: Option<NodeId>,
    ) -> DomResult<usize> {
        let path = self.with_read(|tree| -> DomResult<Vec<(NodeId, Vec<EventHandler>)>> {
            if !tree.contains(target) {
                return Err(DomError::InvalidNodeId);
            }
            let mut nodes = vec![target];
            if kind.bubbles() {
                nodes.extend(tree.ancestors(target)?);
            }
            nodes
                .into_iter()
                .map(|node| -> DomResult<_> { Ok((node, tree.handlers_for(node, kind)?)) })
                .collect()
        })?;

        let mut invoked = 0;
        for (current, handlers) in path {
            let event = Event {
                kind,
                target,
                current,
                related,
            };
            for handler in handlers {
                handler(self, &event);
                invoked += 1;
            }
        }
        tracing::trace!(target: targets::EVENT, %kind, ?target, invoked, "dispatched event");
        Ok(invoked)
    }

    /// Dispatch a click on `target`.
    pub fn click(&self, target: NodeId) -> DomResult<usize> {
        self.dispatch(EventKind::Click, target, None)
    }

    // =========================================================================
    // Pointer model
    // =========================================================================

    /// The node currently under the pointer.
    pub fn hovered(&self) -> Option<NodeId> {
        *self.inner.pointer.lock()
    }

    /// Move the pointer onto `to` (or off the document with `None`).
    ///
    /// Every connected element the pointer leaves entirely receives a
    /// `mouseleave` (innermost first) whose related node is `to`. Then `to`
    /// receives a bubbling `mouseover` whose related node is the previous
    /// position.
    pub fn move_pointer(&self, to: Option<NodeId>) -> DomResult<()> {
        if let Some(node) = to {
            if !self.with_read(|t| t.contains(node)) {
                return Err(DomError::InvalidNodeId);
            }
        }

        let from = std::mem::replace(&mut *self.inner.pointer.lock(), to);
        if from == to {
            return Ok(());
        }

        let (left, from) = self.with_read(|tree| -> DomResult<_> {
            let from = from.filter(|&f| tree.is_connected(f));
            let old_chain = inclusive_ancestors(tree, from)?;
            let new_chain = inclusive_ancestors(tree, to)?;
            let left: Vec<NodeId> = old_chain
                .into_iter()
                .filter(|n| !new_chain.contains(n) && tree.is_element(*n))
                .collect();
            Ok((left, from))
        })?;

        for node in left {
            self.dispatch(EventKind::MouseLeave, node, to)?;
        }
        if let Some(node) = to {
            self.dispatch(EventKind::MouseOver, node, from)?;
        }
        Ok(())
    }
}

fn inclusive_ancestors(tree: &NodeTree, node: Option<NodeId>) -> DomResult<Vec<NodeId>> {
    let Some(node) = node else {
        return Ok(Vec::new());
    };
    let mut chain = vec![node];
    chain.extend(tree.ancestors(node)?);
    Ok(chain)
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("node_count", &self.node_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn build(doc: &Document) -> (NodeId, NodeId, NodeId) {
        let table = doc.create_element("table");
        let row = doc.create_element("tr");
        let cell = doc.create_element("td");
        doc.append_child(doc.body(), table).unwrap();
        doc.append_child(table, row).unwrap();
        doc.append_child(row, cell).unwrap();
        (table, row, cell)
    }

    #[test]
    fn test_bubbling_reaches_ancestors() {
        let doc = Document::new();
        let (table, row, cell) = build(&doc);
        let seen = Arc::new(Mutex::new(Vec::new()));

        for node in [table, row] {
            let seen = seen.clone();
            doc.add_listener(node, EventKind::MouseOver, move |_, e| {
                seen.lock().push((e.target, e.current));
            })
            .unwrap();
        }

        assert_eq!(doc.dispatch(EventKind::MouseOver, cell, None).unwrap(), 2);
        assert_eq!(*seen.lock(), vec![(cell, row), (cell, table)]);
    }

    #[test]
    fn test_mouseleave_does_not_bubble() {
        let doc = Document::new();
        let (table, _row, cell) = build(&doc);
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        doc.add_listener(table, EventKind::MouseLeave, move |_, _| {
            c.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

        doc.dispatch(EventKind::MouseLeave, cell, None).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_handler_may_mutate_document() {
        let doc = Document::new();
        let (table, row, _cell) = build(&doc);
        doc.add_listener(row, EventKind::Click, |doc, e| {
            let cell = doc.create_element("td");
            doc.append_child(e.current, cell).unwrap();
        })
        .unwrap();

        doc.click(row).unwrap();
        doc.click(row).unwrap();
        assert_eq!(doc.with_read(|t| t.children(row).unwrap().len()), 3);
        assert!(doc.with_read(|t| t.is_connected(table)));
    }

    #[test]
    fn test_pointer_transitions() {
        let doc = Document::new();
        let (table, row, cell) = build(&doc);
        let button = doc.create_element("button");
        doc.append_child(doc.body(), button).unwrap();

        let leaves = Arc::new(Mutex::new(Vec::new()));
        for node in [table, row, cell, button] {
            let leaves = leaves.clone();
            doc.add_listener(node, EventKind::MouseLeave, move |_, e| {
                leaves.lock().push((e.target, e.related));
            })
            .unwrap();
        }

        doc.move_pointer(Some(cell)).unwrap();
        assert!(leaves.lock().is_empty());
        assert_eq!(doc.hovered(), Some(cell));

        doc.move_pointer(Some(button)).unwrap();
        assert_eq!(
            *leaves.lock(),
            vec![(cell, Some(button)), (row, Some(button)), (table, Some(button))]
        );

        leaves.lock().clear();
        doc.move_pointer(None).unwrap();
        assert_eq!(*leaves.lock(), vec![(button, None)]);
    }

    #[test]
    fn test_move_pointer_rejects_unknown_node() {
        let doc = Document::new();
        let el = doc.create_element("div");
        doc.destroy(el).unwrap();
        assert_eq!(doc.move_pointer(Some(el)), Err(DomError::InvalidNodeId));
    }

    #[test]
    fn test_root_property() {
        let doc = Document::new();
        assert_eq!(doc.root_property("--square-size"), "");
        doc.set_root_property("--square-size", " 40px");
        assert_eq!(doc.root_property("--square-size"), "40px");
    }
}
