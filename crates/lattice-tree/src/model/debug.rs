//! Text dumps of a tree model for debugging.
//!
//! ```
//! use lattice_tree::TreeFormatOptions;
//! use lattice_tree::model::{ItemData, ItemRole, TreeDebug, TreeModel};
//!
//! let model = TreeModel::new();
//! let node = model.create_node_with(|n| {
//!     n.set_data(0, ItemRole::Display, ItemData::from("Inbox"));
//! });
//! model.add(node, None).unwrap();
//!
//! let dump = TreeDebug::with_options(&model, TreeFormatOptions::minimal()).format_tree();
//! assert!(dump.contains("Inbox"));
//! ```

use std::fmt::{self, Write};

use lattice_tree_core::TreeFormatOptions;

use super::node::NodeId;
use super::role::ItemRole;
use super::traits::ItemModel;
use super::tree_model::TreeModel;

/// Debug formatter for the attached part of a [`TreeModel`].
///
/// Each line shows the column-0 display value of one node, optionally
/// followed by its id and row.
#[derive(Clone)]
pub struct TreeDebug<'a> {
    model: &'a TreeModel,
    options: TreeFormatOptions,
}

impl<'a> TreeDebug<'a> {
    /// Create a formatter with default options.
    pub fn new(model: &'a TreeModel) -> Self {
        Self::with_options(model, TreeFormatOptions::default())
    }

    /// Create a formatter with custom options.
    pub fn with_options(model: &'a TreeModel, options: TreeFormatOptions) -> Self {
        Self { model, options }
    }

    /// Format every node reachable from the root, preceded by a summary line.
    pub fn format_tree(&self) -> String {
        self.to_string()
    }

    /// Format `node` and its descendants, with `node` at depth 0.
    ///
    /// Works for detached subtrees too. Returns an empty string for unknown
    /// ids.
    pub fn format_subtree(&self, node: NodeId) -> String {
        let mut output = String::new();
        if self.model.contains(node) && node != self.model.root() {
            // Writing into a String cannot fail.
            let _ = self.write_node(&mut output, node, 0, true);
        }
        output
    }

    fn write_node<W: Write>(
        &self,
        out: &mut W,
        node: NodeId,
        depth: usize,
        is_last: bool,
    ) -> fmt::Result {
        if self.options.max_depth.is_some_and(|max| depth > max) {
            return Ok(());
        }

        let label = self.model.node_data(node, 0, ItemRole::Display).to_string();
        out.write_str(&self.options.branch_prefix(depth, is_last))?;
        out.write_str(if label.is_empty() { "(unnamed)" } else { &label })?;

        if self.options.show_ids {
            write!(out, " [{node:?}]")?;
        }
        if self.options.show_rows
            && let Some(row) = self.model.row_in_parent(node)
        {
            write!(out, " (row {row})")?;
        }
        out.write_char('\n')?;

        let children = self.model.children(node);
        let count = children.len();
        for (i, child) in children.into_iter().enumerate() {
            self.write_node(out, child, depth + 1, i + 1 == count)?;
        }
        Ok(())
    }

    fn attached_count(&self) -> usize {
        let mut count = 0;
        let mut stack = self.model.children(self.model.root());
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(self.model.children(node));
        }
        count
    }
}

impl fmt::Display for TreeDebug<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let root = self.model.root();
        let columns = self.model.column_count(&super::ModelIndex::invalid());
        writeln!(
            f,
            "TreeModel ({} attached nodes, {} columns):",
            self.attached_count(),
            columns
        )?;

        let top_level = self.model.children(root);
        if top_level.is_empty() {
            return writeln!(f, "  (empty)");
        }
        let count = top_level.len();
        for (i, node) in top_level.into_iter().enumerate() {
            self.write_node(f, node, 0, i + 1 == count)?;
        }
        Ok(())
    }
}

impl fmt::Debug for TreeDebug<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeDebug")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
