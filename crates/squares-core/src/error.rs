//! Error types for Squares documents.

use std::fmt;

/// Errors that can occur during node and document operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    /// The node ID is invalid or the node has been destroyed.
    InvalidNodeId,
    /// Attempted to insert a node into itself or one of its descendants.
    CircularParentage,
    /// The parent cannot hold children of this kind (e.g. a text node parent).
    HierarchyRequest,
    /// An element-only operation was applied to a non-element node.
    NotAnElement,
    /// A facade was constructed from an unsupported input shape.
    InvalidInputKind {
        /// Description of the rejected input.
        found: &'static str,
    },
    /// A positional removal was requested beyond the current bounds.
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The number of items available.
        len: usize,
    },
    /// The event type name is not one the document dispatches.
    UnknownEventType(String),
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidNodeId => write!(f, "Invalid or destroyed node ID"),
            Self::CircularParentage => {
                write!(f, "Cannot insert a node into itself or one of its descendants")
            }
            Self::HierarchyRequest => write!(f, "Node cannot be inserted at this position"),
            Self::NotAnElement => write!(f, "Operation requires an element node"),
            Self::InvalidInputKind { found } => {
                write!(f, "Invalid type of elements: {found}")
            }
            Self::IndexOutOfRange { index, len } => {
                write!(f, "Index {index} out of range for {len} elements")
            }
            Self::UnknownEventType(name) => write!(f, "Unknown event type '{name}'"),
        }
    }
}

impl std::error::Error for DomError {}

/// Result type for node and document operations.
pub type DomResult<T> = std::result::Result<T, DomError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_bounds() {
        let err = DomError::IndexOutOfRange { index: 7, len: 4 };
        assert_eq!(err.to_string(), "Index 7 out of range for 4 elements");
    }

    #[test]
    fn display_names_rejected_input() {
        let err = DomError::InvalidInputKind { found: "text node" };
        assert!(err.to_string().contains("text node"));
    }
}
