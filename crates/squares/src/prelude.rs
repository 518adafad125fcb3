//! Prelude module for Squares.
//!
//! ```
//! use squares::prelude::*;
//! ```

// ============================================================================
// Document
// ============================================================================

pub use squares_core::{Document, EventKind, NodeId, TreeDebug};

// ============================================================================
// Style
// ============================================================================

pub use squares_style::RootVariables;

// ============================================================================
// Widget
// ============================================================================

pub use crate::commands::{Command, CommandOutcome};
pub use crate::config::SquaresConfig;
pub use crate::dom::{Dom, DomEvent};
pub use crate::hover::{HoverSelection, MinusVisibility};
pub use crate::widget::{GridShape, Squares};
pub use crate::{Error, Result};
