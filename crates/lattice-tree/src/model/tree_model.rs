//! Hierarchical tree model implementation.
//!
//! `TreeModel` adapts a tree of [`Node`]s to the coordinate-based
//! [`ItemModel`] interface. Views address items by `(row, column, parent)`;
//! callers build and reshape the tree by [`NodeId`].
//!
//! # Structural changes
//!
//! [`insert`](TreeModel::insert) and [`remove`](TreeModel::remove) are the
//! only ways to change the tree shape. Each one runs as a transaction:
//!
//! 1. announce: `rows_about_to_be_inserted` / `rows_about_to_be_removed`
//!    with the affected row range. The tree is still in its old layout.
//! 2. mutate: the child list and parent link are updated.
//! 3. commit: `rows_inserted` / `rows_removed` with the same range, now
//!    describing the new layout.
//!
//! All preconditions are checked before the announce, so a rejected mutation
//! emits nothing and changes nothing. Changes below a node that is not
//! attached to the root happen silently, since no view can address them.
//!
//! # Stale coordinates
//!
//! A [`ModelIndex`] resolves to a node only while it still describes that
//! node's current position: the node is attached, sits at the index row
//! under the node the index parent resolves to, and the column is in range.
//! Anything else is "not found" and reads as empty data.

use std::cell::{Cell, RefCell};

use lattice_tree_core::PerfSpan;
use lattice_tree_core::logging::targets;

use super::flags::ItemFlags;
use super::index::ModelIndex;
use super::node::{Node, NodeArena, NodeId};
use super::role::{ItemData, ItemRole};
use super::traits::{ItemModel, ModelSignals, Orientation};
use crate::error::{ModelError, ModelResult};

/// A hierarchical, row-oriented item model.
///
/// The model owns an implicit root node that is never addressed by a
/// coordinate; its children are the top-level rows.
///
/// `TreeModel` is single-threaded. Observers connected to [`signals`](ItemModel::signals)
/// run synchronously inside the mutating call and may query the model, but
/// any mutation they attempt fails with [`ModelError::ReentrantMutation`].
///
/// # Example
///
/// ```
/// use lattice_tree::model::{ItemData, ItemModel, ItemRole, ModelIndex, TreeModel};
///
/// let model = TreeModel::with_headers(["Name", "Size"]);
///
/// let docs = model.create_node_with(|node| {
///     node.set_data(0, ItemRole::Display, ItemData::from("Documents"));
/// });
/// model.add(docs, None).unwrap();
///
/// let file = model.create_node_with(|node| {
///     node.set_data(0, ItemRole::Display, ItemData::from("notes.txt"));
///     node.set_data(1, ItemRole::Display, ItemData::from(2048));
/// });
/// model.add(file, Some(docs)).unwrap();
///
/// let docs_index = model.index(0, 0, &ModelIndex::invalid());
/// assert_eq!(model.row_count(&docs_index), 1);
///
/// let size = model.index(0, 1, &docs_index);
/// assert_eq!(model.data(&size, ItemRole::Display).as_int(), Some(2048));
/// ```
pub struct TreeModel {
    arena: RefCell<NodeArena>,
    headers: RefCell<Vec<String>>,
    default_flags: Cell<ItemFlags>,
    signals: ModelSignals,
    in_transaction: Cell<bool>,
}

static_assertions::assert_not_impl_any!(TreeModel: Send, Sync);

/// Marks the model as busy for the lifetime of one mutation.
struct TransactionGuard<'a> {
    flag: &'a Cell<bool>,
}

impl Drop for TransactionGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

impl Default for TreeModel {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeModel {
    /// Creates an empty model with a single unnamed column.
    pub fn new() -> Self {
        Self {
            arena: RefCell::new(NodeArena::new()),
            headers: RefCell::new(Vec::new()),
            default_flags: Cell::new(ItemFlags::editable()),
            signals: ModelSignals::new(),
            in_transaction: Cell::new(false),
        }
    }

    /// Creates an empty model with the given column headers.
    pub fn with_headers<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let model = Self::new();
        *model.headers.borrow_mut() = headers.into_iter().map(Into::into).collect();
        model
    }

    fn begin(&self, operation: &'static str) -> ModelResult<TransactionGuard<'_>> {
        if self.in_transaction.replace(true) {
            tracing::warn!(target: targets::MODEL, operation, "mutation attempted from inside a notification");
            return Err(ModelError::ReentrantMutation(operation));
        }
        Ok(TransactionGuard {
            flag: &self.in_transaction,
        })
    }

    fn rejected(operation: &'static str) -> impl Fn(&ModelError) {
        move |err: &ModelError| tracing::warn!(target: targets::MODEL, operation, %err, "mutation rejected")
    }

    // =========================================================================
    // Headers and flags
    // =========================================================================

    /// Replaces the column header labels.
    ///
    /// Views are told about a change in column count through the column
    /// insert/remove signals, and about the new labels through
    /// `header_data_changed`.
    pub fn set_headers<I, S>(&self, headers: I) -> ModelResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let _tx = self.begin("set headers")?;
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        let old_count = self.column_count_value();
        let new_count = headers.len().max(1);

        let apply = || *self.headers.borrow_mut() = headers;
        if new_count > old_count {
            self.signals
                .around_column_insert(old_count, new_count - 1, apply);
        } else if new_count < old_count {
            self.signals
                .around_column_removal(new_count, old_count - 1, apply);
        } else {
            apply();
        }

        tracing::debug!(target: targets::MODEL, old_count, new_count, "headers replaced");
        self.signals
            .header_data_changed
            .emit((Orientation::Horizontal, 0, new_count - 1));
        Ok(())
    }

    /// The column header labels.
    pub fn headers(&self) -> Vec<String> {
        self.headers.borrow().clone()
    }

    /// Number of columns: one per header, and at least one.
    pub fn column_count_value(&self) -> usize {
        self.headers.borrow().len().max(1)
    }

    /// Sets the flags given to nodes created from now on.
    pub fn set_default_flags(&self, flags: ItemFlags) {
        self.default_flags.set(flags);
    }

    /// The flags given to newly created nodes.
    pub fn default_flags(&self) -> ItemFlags {
        self.default_flags.get()
    }

    /// Replaces the flags of a node.
    pub fn set_flags(&self, node: NodeId, flags: ItemFlags) -> ModelResult<()> {
        let _tx = self.begin("set flags")?;
        self.arena
            .borrow_mut()
            .get_mut(node)
            .ok_or(ModelError::InvalidNode(node))
            .inspect_err(Self::rejected("set flags"))?
            .set_flags(flags);

        let index = self.index_for_node(node, 0);
        if index.is_valid() {
            let last = index.with_column(self.column_count_value() - 1);
            self.signals.data_changed.emit((index, last, Vec::new()));
        }
        Ok(())
    }

    // =========================================================================
    // Node access
    // =========================================================================

    /// The implicit root node. Its children are the top-level rows.
    pub fn root(&self) -> NodeId {
        self.arena.borrow().root()
    }

    /// Allocates a new, detached node with the default flags.
    pub fn create_node(&self) -> NodeId {
        self.create_node_with(|_| {})
    }

    /// Allocates a new, detached node and lets `init` fill in its data.
    pub fn create_node_with<F>(&self, init: F) -> NodeId
    where
        F: FnOnce(&mut Node),
    {
        let mut node = Node::new(self.default_flags.get());
        init(&mut node);
        let id = self.arena.borrow_mut().insert(node);
        tracing::trace!(target: targets::MODEL, ?id, "created node");
        id
    }

    /// Returns `true` if the node exists in this model (attached or not).
    pub fn contains(&self, node: NodeId) -> bool {
        self.arena.borrow().contains(node)
    }

    /// Returns `true` if the node is reachable from the root.
    pub fn is_attached(&self, node: NodeId) -> bool {
        let arena = self.arena.borrow();
        node != arena.root() && arena.is_attached(node)
    }

    /// Number of nodes in the model, attached or not, excluding the root.
    pub fn node_count(&self) -> usize {
        self.arena.borrow().len()
    }

    /// Provides read access to a node.
    pub fn with_node<F, R>(&self, node: NodeId, f: F) -> Option<R>
    where
        F: FnOnce(&Node) -> R,
    {
        self.arena.borrow().get(node).map(f)
    }

    /// The children of a node, in row order.
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.with_node(node, |n| n.children().to_vec())
            .unwrap_or_default()
    }

    /// The parent of a node; the root for top-level nodes.
    pub fn parent_node(&self, node: NodeId) -> Option<NodeId> {
        self.with_node(node, Node::parent).flatten()
    }

    /// The node's current row within its parent.
    ///
    /// `None` for the root and for nodes without a parent.
    pub fn row_in_parent(&self, node: NodeId) -> Option<usize> {
        self.arena.borrow().row_of(node)
    }

    /// The value a node stores under `(column, role)`.
    pub fn node_data(&self, node: NodeId, column: usize, role: ItemRole) -> ItemData {
        self.with_node(node, |n| n.data(column, role).clone())
            .unwrap_or_default()
    }

    /// Sets a value on a node directly, without going through a coordinate.
    ///
    /// Item flags are not consulted. Returns whether the stored value
    /// changed; `data_changed` is emitted only for a change on an attached
    /// node in an existing column.
    pub fn set_node_data(
        &self,
        node: NodeId,
        column: usize,
        role: ItemRole,
        value: ItemData,
    ) -> ModelResult<bool> {
        let _tx = self.begin("set node data")?;
        let changed = self
            .arena
            .borrow_mut()
            .get_mut(node)
            .ok_or(ModelError::InvalidNode(node))
            .inspect_err(Self::rejected("set node data"))?
            .set_data(column, role, value);

        if changed {
            let index = self.index_for_node(node, column);
            if index.is_valid() {
                self.signals.notify_cell_changed(index, vec![role]);
            }
        }
        Ok(changed)
    }

    // =========================================================================
    // Coordinate translation
    // =========================================================================

    /// Resolves a coordinate to the node it currently addresses.
    ///
    /// Returns `None` for invalid, stale or out-of-range coordinates.
    pub fn node_for_index(&self, index: &ModelIndex) -> Option<NodeId> {
        let arena = self.arena.borrow();
        self.resolve(&arena, index)
    }

    /// The coordinate of a node's cell in `column`.
    ///
    /// The row is recomputed from the node's current position. Returns an
    /// invalid index for the root, detached or discarded nodes and
    /// out-of-range columns.
    pub fn index_for_node(&self, node: NodeId, column: usize) -> ModelIndex {
        let arena = self.arena.borrow();
        self.index_in(&arena, node, column)
    }

    fn resolve(&self, arena: &NodeArena, index: &ModelIndex) -> Option<NodeId> {
        if !index.is_valid() || index.column() >= self.column_count_value() {
            return None;
        }
        let id = NodeId::from_raw(index.internal_id());
        if id == arena.root() {
            return None;
        }
        let parent = arena.get(id)?.parent()?;
        let expected_parent = match index.parent_ref() {
            Some(parent_index) => self.resolve(arena, parent_index)?,
            None => arena.root(),
        };
        if parent != expected_parent || arena.child_at(parent, index.row()) != Some(id) {
            return None;
        }
        Some(id)
    }

    /// The column-0 form of an already resolved parent coordinate.
    ///
    /// Reuses `parent` when its whole chain is in column 0, and only rebuilds
    /// it from the arena otherwise.
    fn canonical_parent(&self, arena: &NodeArena, parent: &ModelIndex, parent_id: NodeId) -> ModelIndex {
        if !parent.is_valid() {
            return ModelIndex::invalid();
        }
        let in_first_column = parent.column() == 0 && parent.ancestors().all(|index| index.column() == 0);
        if in_first_column {
            parent.clone()
        } else {
            self.index_in(arena, parent_id, 0)
        }
    }

    fn index_in(&self, arena: &NodeArena, node: NodeId, column: usize) -> ModelIndex {
        if column >= self.column_count_value() || node == arena.root() || !arena.is_attached(node) {
            return ModelIndex::invalid();
        }

        // Ancestors from the node up to (not including) the root.
        let mut chain = Vec::new();
        let mut current = node;
        while current != arena.root() {
            let Some(row) = arena.row_of(current) else {
                return ModelIndex::invalid();
            };
            chain.push((current, row));
            match arena.get(current).and_then(Node::parent) {
                Some(parent) => current = parent,
                None => return ModelIndex::invalid(),
            }
        }

        let mut index = ModelIndex::invalid();
        let last = chain.len() - 1;
        for (depth, (id, row)) in chain.into_iter().rev().enumerate() {
            let col = if depth == last { column } else { 0 };
            index = ModelIndex::with_internal_id(row, col, index, id.as_raw());
        }
        index
    }

    /// The node a parent coordinate stands for: the root when invalid.
    fn parent_target(&self, arena: &NodeArena, parent: &ModelIndex) -> Option<NodeId> {
        if parent.is_valid() {
            self.resolve(arena, parent)
        } else {
            Some(arena.root())
        }
    }

    // =========================================================================
    // Structural mutations
    // =========================================================================

    /// Attaches `node` under `parent` (the root when `None`), immediately
    /// before `before`, or as the last child when `before` is `None` or the
    /// root.
    ///
    /// Returns the node's new column-0 coordinate (invalid when the parent is
    /// not attached).
    ///
    /// # Errors
    ///
    /// - [`ModelError::InvalidNode`] if `node`, `parent` or `before` is unknown
    /// - [`ModelError::RootNode`] if `node` is the root
    /// - [`ModelError::AlreadyAttached`] if `node` already has a parent
    /// - [`ModelError::CircularParentage`] if `parent` lies in `node`'s subtree
    /// - [`ModelError::NotAChild`] if `before` is not a child of `parent`
    #[tracing::instrument(skip(self), target = "lattice_tree::model", level = "trace")]
    pub fn insert(
        &self,
        node: NodeId,
        parent: Option<NodeId>,
        before: Option<NodeId>,
    ) -> ModelResult<ModelIndex> {
        let _tx = self.begin("insert")?;

        let (parent, row, parent_index) = {
            let arena = self.arena.borrow();
            self.check_insert(&arena, node, parent, before)
                .inspect_err(Self::rejected("insert"))?
        };

        let index = match parent_index {
            Some(parent_index) => {
                self.signals.around_row_insert(parent_index.clone(), row, row, || {
                    self.arena.borrow_mut().attach(node, parent, row);
                });
                ModelIndex::with_internal_id(row, 0, parent_index, node.as_raw())
            }
            None => {
                self.arena.borrow_mut().attach(node, parent, row);
                ModelIndex::invalid()
            }
        };

        tracing::debug!(target: targets::MODEL, ?node, ?parent, row, "inserted node");
        Ok(index)
    }

    /// Appends `node` as the last child of `parent` (the root when `None`).
    pub fn add(&self, node: NodeId, parent: Option<NodeId>) -> ModelResult<ModelIndex> {
        self.insert(node, parent, None)
    }

    /// Validates an insert and computes `(parent, row, parent coordinate)`.
    ///
    /// The parent coordinate is `None` when the parent is not attached and
    /// the insert must not be announced.
    fn check_insert(
        &self,
        arena: &NodeArena,
        node: NodeId,
        parent: Option<NodeId>,
        before: Option<NodeId>,
    ) -> ModelResult<(NodeId, usize, Option<ModelIndex>)> {
        let root = arena.root();
        let parent = parent.unwrap_or(root);

        let node_data = arena.get(node).ok_or(ModelError::InvalidNode(node))?;
        let parent_data = arena.get(parent).ok_or(ModelError::InvalidNode(parent))?;
        if node == root {
            return Err(ModelError::RootNode("inserted"));
        }
        if let Some(current) = node_data.parent() {
            return Err(ModelError::AlreadyAttached {
                node,
                parent: current,
            });
        }
        if arena.is_ancestor_of(node, parent) {
            return Err(ModelError::CircularParentage { node, parent });
        }

        let row = match before {
            None => parent_data.child_count(),
            Some(sibling) if sibling == root => parent_data.child_count(),
            Some(sibling) => {
                if !arena.contains(sibling) {
                    return Err(ModelError::InvalidNode(sibling));
                }
                parent_data
                    .children()
                    .iter()
                    .position(|&child| child == sibling)
                    .ok_or(ModelError::NotAChild {
                        node: sibling,
                        parent,
                    })?
            }
        };

        let parent_index = if parent == root {
            Some(ModelIndex::invalid())
        } else if arena.is_attached(parent) {
            Some(self.index_in(arena, parent, 0))
        } else {
            None
        };
        Ok((parent, row, parent_index))
    }

    /// Detaches `node`, together with its subtree, from `parent` (the root
    /// when `None`).
    ///
    /// The node stays alive and detached: it can be inserted again, or freed
    /// with [`discard`](Self::discard). Every coordinate inside the removed
    /// subtree stops resolving once this returns.
    ///
    /// # Errors
    ///
    /// - [`ModelError::InvalidNode`] if `node` or `parent` is unknown
    /// - [`ModelError::RootNode`] if `node` is the root
    /// - [`ModelError::NotAChild`] if `node` is not a child of `parent`
    #[tracing::instrument(skip(self), target = "lattice_tree::model", level = "trace")]
    pub fn remove(&self, node: NodeId, parent: Option<NodeId>) -> ModelResult<()> {
        let _tx = self.begin("remove")?;

        let (parent, row, parent_index) = {
            let arena = self.arena.borrow();
            self.check_remove(&arena, node, parent)
                .inspect_err(Self::rejected("remove"))?
        };

        match parent_index {
            Some(parent_index) => {
                self.signals.around_row_removal(parent_index, row, row, || {
                    self.arena.borrow_mut().detach(node);
                });
            }
            None => {
                self.arena.borrow_mut().detach(node);
            }
        }

        tracing::debug!(target: targets::MODEL, ?node, ?parent, row, "removed node");
        Ok(())
    }

    fn check_remove(
        &self,
        arena: &NodeArena,
        node: NodeId,
        parent: Option<NodeId>,
    ) -> ModelResult<(NodeId, usize, Option<ModelIndex>)> {
        let root = arena.root();
        let parent = parent.unwrap_or(root);

        let node_data = arena.get(node).ok_or(ModelError::InvalidNode(node))?;
        if !arena.contains(parent) {
            return Err(ModelError::InvalidNode(parent));
        }
        if node == root {
            return Err(ModelError::RootNode("removed"));
        }
        if node_data.parent() != Some(parent) {
            return Err(ModelError::NotAChild { node, parent });
        }
        let row = arena
            .row_of(node)
            .ok_or(ModelError::NotAChild { node, parent })?;

        let parent_index = if parent == root {
            Some(ModelIndex::invalid())
        } else if arena.is_attached(parent) {
            Some(self.index_in(arena, parent, 0))
        } else {
            None
        };
        Ok((parent, row, parent_index))
    }

    /// Moves `node` under `new_parent` (the root when `None`), before
    /// `before` or at the end.
    ///
    /// This is a [`remove`](Self::remove) followed by an
    /// [`insert`](Self::insert), each with its own announce/commit pair.
    /// Both are validated up front, so either both happen or neither does.
    /// A node that has no parent is simply inserted.
    pub fn move_node(
        &self,
        node: NodeId,
        new_parent: Option<NodeId>,
        before: Option<NodeId>,
    ) -> ModelResult<ModelIndex> {
        // Only checks for reentrancy; remove and insert open their own guards.
        self.begin("move")?;

        let (old_parent, before) = {
            let arena = self.arena.borrow();
            let old_parent = arena
                .get(node)
                .ok_or(ModelError::InvalidNode(node))
                .inspect_err(Self::rejected("move"))?
                .parent();

            // Moving in front of itself within the same parent keeps the node
            // where it is.
            let same_parent = old_parent.is_some() && old_parent == Some(new_parent.unwrap_or(arena.root()));
            let before = if before == Some(node) && same_parent {
                arena
                    .row_of(node)
                    .and_then(|row| old_parent.and_then(|p| arena.child_at(p, row + 1)))
            } else {
                before
            };

            self.check_move(&arena, node, new_parent, before)
                .inspect_err(Self::rejected("move"))?;
            (old_parent, before)
        };

        if let Some(old_parent) = old_parent {
            self.remove(node, Some(old_parent))?;
        }
        self.insert(node, new_parent, before)
    }

    fn check_move(
        &self,
        arena: &NodeArena,
        node: NodeId,
        new_parent: Option<NodeId>,
        before: Option<NodeId>,
    ) -> ModelResult<()> {
        let root = arena.root();
        let new_parent = new_parent.unwrap_or(root);
        if node == root {
            return Err(ModelError::RootNode("moved"));
        }
        if !arena.contains(new_parent) {
            return Err(ModelError::InvalidNode(new_parent));
        }
        if arena.is_ancestor_of(node, new_parent) {
            return Err(ModelError::CircularParentage {
                node,
                parent: new_parent,
            });
        }
        if let Some(sibling) = before.filter(|&sibling| sibling != root) {
            let is_child = arena
                .get(sibling)
                .ok_or(ModelError::InvalidNode(sibling))?
                .parent()
                == Some(new_parent);
            if !is_child {
                return Err(ModelError::NotAChild {
                    node: sibling,
                    parent: new_parent,
                });
            }
        }
        Ok(())
    }

    /// Frees a detached node and its whole subtree.
    ///
    /// Returns the number of nodes freed. The ids become dead.
    ///
    /// # Errors
    ///
    /// - [`ModelError::InvalidNode`] if `node` is unknown
    /// - [`ModelError::RootNode`] if `node` is the root
    /// - [`ModelError::StillAttached`] if `node` still has a parent
    pub fn discard(&self, node: NodeId) -> ModelResult<usize> {
        let _tx = self.begin("discard")?;
        let _perf = PerfSpan::new("discard");

        let mut arena = self.arena.borrow_mut();
        let check = || {
            let data = arena.get(node).ok_or(ModelError::InvalidNode(node))?;
            if node == arena.root() {
                return Err(ModelError::RootNode("discarded"));
            }
            if data.parent().is_some() {
                return Err(ModelError::StillAttached(node));
            }
            Ok(())
        };
        check().inspect_err(Self::rejected("discard"))?;

        let freed = arena.discard(node);
        tracing::debug!(target: targets::MODEL, ?node, freed, "discarded subtree");
        Ok(freed)
    }

    /// Removes `node` from `parent` and frees it with its subtree.
    pub fn delete(&self, node: NodeId, parent: Option<NodeId>) -> ModelResult<usize> {
        self.remove(node, parent)?;
        self.discard(node)
    }

    /// Frees every node, attached or not, bracketed by the reset signals.
    pub fn clear(&self) -> ModelResult<()> {
        let _tx = self.begin("clear")?;
        let _perf = PerfSpan::new("clear");

        let freed = self
            .signals
            .around_reset(|| self.arena.borrow_mut().clear());
        tracing::debug!(target: targets::MODEL, freed, "model cleared");
        Ok(())
    }

    // =========================================================================
    // Data edits
    // =========================================================================

    /// Sets the value under `role` for the cell at `index`.
    ///
    /// Returns `Ok(true)` if the value changed, in which case `data_changed`
    /// is emitted for exactly that coordinate, and `Ok(false)` if the cell
    /// already held the value.
    ///
    /// # Errors
    ///
    /// - [`ModelError::InvalidIndex`] if `index` does not resolve
    /// - [`ModelError::DataRejected`] if the item is not editable
    pub fn try_set_data(
        &self,
        index: &ModelIndex,
        value: ItemData,
        role: ItemRole,
    ) -> ModelResult<bool> {
        let _tx = self.begin("set data")?;

        let (canonical, changed) = {
            let mut arena = self.arena.borrow_mut();
            let id = self
                .resolve(&arena, index)
                .ok_or(ModelError::InvalidIndex)
                .inspect_err(Self::rejected("set data"))?;
            let node = arena
                .get_mut(id)
                .ok_or(ModelError::InvalidIndex)
                .inspect_err(Self::rejected("set data"))?;
            if !node.flags().allows_edit() {
                let err = ModelError::DataRejected(format!(
                    "item at row {} column {} is not editable",
                    index.row(),
                    index.column()
                ));
                Self::rejected("set data")(&err);
                return Err(err);
            }
            let changed = node.set_data(index.column(), role, value);
            let parent_index = match arena.get(id).and_then(Node::parent) {
                Some(parent) => self.canonical_parent(&arena, &index.parent(), parent),
                None => ModelIndex::invalid(),
            };
            let canonical =
                ModelIndex::with_internal_id(index.row(), index.column(), parent_index, id.as_raw());
            (canonical, changed)
        };

        if changed {
            self.signals.notify_cell_changed(canonical, vec![role]);
        }
        Ok(changed)
    }
}

impl ItemModel for TreeModel {
    fn row_count(&self, parent: &ModelIndex) -> usize {
        let arena = self.arena.borrow();
        self.parent_target(&arena, parent)
            .and_then(|id| arena.get(id))
            .map_or(0, Node::child_count)
    }

    fn column_count(&self, _parent: &ModelIndex) -> usize {
        self.column_count_value()
    }

    fn data(&self, index: &ModelIndex, role: ItemRole) -> ItemData {
        let arena = self.arena.borrow();
        self.resolve(&arena, index)
            .and_then(|id| arena.get(id))
            .map(|node| node.data(index.column(), role).clone())
            .unwrap_or_default()
    }

    fn index(&self, row: usize, column: usize, parent: &ModelIndex) -> ModelIndex {
        if column >= self.column_count_value() {
            return ModelIndex::invalid();
        }
        let arena = self.arena.borrow();
        let Some(parent_id) = self.parent_target(&arena, parent) else {
            return ModelIndex::invalid();
        };
        match arena.child_at(parent_id, row) {
            Some(child) => {
                let parent_index = self.canonical_parent(&arena, parent, parent_id);
                ModelIndex::with_internal_id(row, column, parent_index, child.as_raw())
            }
            None => ModelIndex::invalid(),
        }
    }

    fn parent(&self, index: &ModelIndex) -> ModelIndex {
        let arena = self.arena.borrow();
        let Some(id) = self.resolve(&arena, index) else {
            return ModelIndex::invalid();
        };
        match (arena.get(id).and_then(Node::parent), index.parent_ref()) {
            (Some(parent), Some(parent_index)) => self.canonical_parent(&arena, parent_index, parent),
            _ => ModelIndex::invalid(),
        }
    }

    fn signals(&self) -> &ModelSignals {
        &self.signals
    }

    fn set_data(&self, index: &ModelIndex, value: ItemData, role: ItemRole) -> bool {
        self.try_set_data(index, value, role).is_ok()
    }

    fn flags(&self, index: &ModelIndex) -> ItemFlags {
        let arena = self.arena.borrow();
        self.resolve(&arena, index)
            .and_then(|id| arena.get(id))
            .map_or_else(ItemFlags::disabled, Node::flags)
    }

    fn header_data(&self, section: usize, orientation: Orientation, role: ItemRole) -> ItemData {
        match (orientation, role) {
            (Orientation::Horizontal, ItemRole::Display | ItemRole::Edit) => self
                .headers
                .borrow()
                .get(section)
                .map(|label| ItemData::from(label.as_str()))
                .unwrap_or_default(),
            _ => ItemData::None,
        }
    }
}
