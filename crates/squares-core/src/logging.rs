//! Logging and debugging facilities for Squares.
//!
//! This module provides:
//! - Target names for filtering `tracing` output by subsystem
//! - Debug visualization for node trees
//!
//! # Tracing Integration
//!
//! Squares uses the `tracing` crate for instrumentation. To see logs, install
//! a subscriber in the host:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("squares=debug,squares_core=trace")
//!     .init();
//! ```
//!
//! # Debug Visualization
//!
//! ```
//! use squares_core::{Document, logging::TreeDebug};
//!
//! let doc = Document::new();
//! let dump = TreeDebug::new().format_subtree(&doc, doc.document_node()).unwrap();
//! assert!(dump.contains("<body>"));
//! ```

use std::fmt::Write as FmtWrite;

use crate::document::Document;
use crate::error::DomResult;
use crate::node::{NodeId, NodeKind, NodeTree};

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Node tree structure changes.
    pub const TREE: &str = "squares_core::tree";
    /// Listener registration and dispatch.
    pub const EVENT: &str = "squares_core::event";
    /// Widget mount/unmount.
    pub const WIDGET: &str = "squares::widget";
    /// Grid mutation commands.
    pub const COMMANDS: &str = "squares::commands";
    /// Hover highlight controller.
    pub const HOVER: &str = "squares::hover";
}

/// Style options for tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Plain indentation.
    Compact,
}

/// Configuration for tree debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// The style of tree visualization.
    pub style: TreeStyle,
    /// Whether to show node IDs.
    pub show_ids: bool,
    /// Whether to show attributes.
    pub show_attributes: bool,
    /// Whether to show inline style declarations.
    pub show_style: bool,
    /// Maximum depth to traverse (None for unlimited).
    pub max_depth: Option<usize>,
    /// Indent size for each level.
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: false,
            show_attributes: true,
            show_style: false,
            max_depth: None,
            indent_size: 2,
        }
    }
}

impl TreeFormatOptions {
    /// Options for detailed debugging output.
    pub fn detailed() -> Self {
        Self {
            show_ids: true,
            show_style: true,
            ..Default::default()
        }
    }

    /// Options for tag names only.
    pub fn minimal() -> Self {
        Self {
            show_attributes: false,
            ..Default::default()
        }
    }
}

/// Debug utility for visualizing node trees.
#[derive(Debug, Clone, Default)]
pub struct TreeDebug {
    options: TreeFormatOptions,
}

impl TreeDebug {
    /// Create a visualizer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a visualizer with custom options.
    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Format the subtree rooted at `root`.
    pub fn format_subtree(&self, doc: &Document, root: NodeId) -> DomResult<String> {
        doc.with_read(|tree| {
            let mut output = String::new();
            self.format_into(tree, root, 0, true, &mut output)?;
            Ok(output)
        })
    }

    fn format_into(
        &self,
        tree: &NodeTree,
        id: NodeId,
        depth: usize,
        is_last: bool,
        output: &mut String,
    ) -> DomResult<()> {
        if self.options.max_depth.is_some_and(|max| depth > max) {
            return Ok(());
        }

        output.push_str(&self.build_prefix(depth, is_last));
        match tree.kind(id)? {
            NodeKind::Document => output.push_str("#document"),
            NodeKind::Text { data } => {
                write!(output, "{data:?}").expect("write to String");
            }
            NodeKind::Element { tag } => {
                output.push('<');
                output.push_str(tag);
                if self.options.show_attributes {
                    for (name, value) in tree.attributes(id)? {
                        write!(output, " {name}=\"{value}\"").expect("write to String");
                    }
                }
                output.push('>');
                if self.options.show_style {
                    let style = tree.style(id)?;
                    if !style.is_empty() {
                        let decls: Vec<String> =
                            style.iter().map(|(p, v)| format!("{p}: {v}")).collect();
                        write!(output, " {{{}}}", decls.join("; ")).expect("write to String");
                    }
                }
            }
        }
        if self.options.show_ids {
            write!(output, " [{id:?}]").expect("write to String");
        }
        output.push('\n');

        let children = tree.children(id)?;
        let count = children.len();
        for (i, &child) in children.iter().enumerate() {
            self.format_into(tree, child, depth + 1, i + 1 == count, output)?;
        }
        Ok(())
    }

    fn build_prefix(&self, depth: usize, is_last: bool) -> String {
        if depth == 0 {
            return String::new();
        }

        let (branch, tee, corner) = match self.options.style {
            TreeStyle::Ascii => ("|", "+-- ", "`-- "),
            TreeStyle::Unicode => ("\u{2502}", "\u{251c}\u{2500}\u{2500} ", "\u{2514}\u{2500}\u{2500} "),
            TreeStyle::Compact => (" ", "", ""),
        };

        let mut prefix = String::new();
        for _ in 0..(depth - 1) {
            prefix.push_str(branch);
            prefix.push_str(&" ".repeat(self.options.indent_size));
        }
        prefix.push_str(if is_last { corner } else { tee });
        prefix
    }
}
