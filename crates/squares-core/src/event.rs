//! Native pointer events and listener storage.
//!
//! An [`Event`] is the raw shape delivered by [`Document::dispatch`]: plain
//! [`NodeId`]s for the target, the node the listener is bound to, and the
//! related node of a pointer transition. Higher layers translate it into their
//! own payload at the subscription boundary.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use slotmap::new_key_type;

use crate::document::Document;
use crate::error::DomError;
use crate::node::NodeId;

new_key_type! {
    /// Identifier of a registered event listener.
    ///
    /// Returned by [`Document::add_listener`] and accepted by
    /// [`Document::remove_listener`]. Destroying the node a listener is bound
    /// to also removes the listener.
    pub struct ListenerId;
}

/// The kinds of events a document dispatches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Primary button activation.
    Click,
    /// The pointer moved onto a node. Bubbles to every ancestor.
    MouseOver,
    /// The pointer left a node and all of its descendants. Does not bubble.
    MouseLeave,
}

impl EventKind {
    /// Whether the event is delivered to the target's ancestors as well.
    pub fn bubbles(self) -> bool {
        matches!(self, Self::Click | Self::MouseOver)
    }

    /// The platform event type name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::MouseOver => "mouseover",
            Self::MouseLeave => "mouseleave",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = DomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "click" => Ok(Self::Click),
            "mouseover" => Ok(Self::MouseOver),
            "mouseleave" => Ok(Self::MouseLeave),
            _ => Err(DomError::UnknownEventType(s.to_string())),
        }
    }
}

/// A dispatched event as seen by one listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Event {
    /// The kind of event.
    pub kind: EventKind,
    /// The node the event was dispatched to.
    pub target: NodeId,
    /// The node whose listener is being invoked.
    pub current: NodeId,
    /// For pointer transitions, the node on the other side of the move.
    pub related: Option<NodeId>,
}

/// A listener callback.
///
/// The document is passed in rather than captured so listeners never keep
/// their own document alive.
pub type EventHandler = Arc<dyn Fn(&Document, &Event) + Send + Sync>;

/// Storage for a single listener.
pub(crate) struct Listener {
    pub(crate) node: NodeId,
    pub(crate) kind: EventKind,
    pub(crate) handler: EventHandler,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bubbling_kinds() {
        assert!(EventKind::Click.bubbles());
        assert!(EventKind::MouseOver.bubbles());
        assert!(!EventKind::MouseLeave.bubbles());
    }

    #[test]
    fn parse_event_names() {
        assert_eq!("mouseover".parse::<EventKind>(), Ok(EventKind::MouseOver));
        assert_eq!("Click".parse::<EventKind>(), Ok(EventKind::Click));
        assert_eq!(
            "scroll".parse::<EventKind>(),
            Err(DomError::UnknownEventType("scroll".into()))
        );
        assert_eq!(EventKind::MouseLeave.to_string(), "mouseleave");
    }
}
