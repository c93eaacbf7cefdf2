//! Tree nodes and the arena that stores them.
//!
//! Nodes live in a [`SlotMap`] owned by the model and refer to each other by
//! [`NodeId`]. A parent lists its children in row order; each child records
//! its parent. Rows are never stored: a node's row is its current position
//! in the parent's child list.

use std::collections::HashMap;

use slotmap::{SlotMap, new_key_type};

use super::role::{ItemData, ItemRole};
use super::flags::ItemFlags;

new_key_type! {
    /// A stable identifier for a node.
    ///
    /// A `NodeId` does not change when the node is moved. It becomes dead
    /// once the node is discarded; a dead id is never reused for another node.
    pub struct NodeId;
}

impl NodeId {
    /// Convert the NodeId to a raw u64 value.
    ///
    /// This is the value stored in [`ModelIndex::internal_id`](super::ModelIndex::internal_id).
    #[inline]
    pub fn as_raw(self) -> u64 {
        use slotmap::Key;
        self.data().as_ffi()
    }

    /// Create a NodeId from a raw u64 value.
    ///
    /// Note: This does not check that the node exists.
    #[inline]
    pub fn from_raw(raw: u64) -> Self {
        Self::from(slotmap::KeyData::from_ffi(raw))
    }
}

static NO_DATA: ItemData = ItemData::None;

/// A unit of the domain tree.
///
/// A node is a passive container: it holds its children (in row order), a
/// link to its parent and one value per (column, role). The tree shape is
/// only ever changed by the owning [`TreeModel`](super::TreeModel).
#[derive(Debug, Clone)]
pub struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    values: HashMap<(usize, ItemRole), ItemData>,
    flags: ItemFlags,
}

impl Node {
    pub(crate) fn new(flags: ItemFlags) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            values: HashMap::new(),
            flags,
        }
    }

    /// The children of this node, in row order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The node whose child list contains this node, if any.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Number of children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Returns `true` if the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// The value stored under `(column, role)`, or `ItemData::None`.
    pub fn data(&self, column: usize, role: ItemRole) -> &ItemData {
        self.values.get(&(column, role)).unwrap_or(&NO_DATA)
    }

    /// Replaces the value stored under `(column, role)`.
    ///
    /// Storing `ItemData::None` clears the entry. Returns `true` if the stored
    /// value actually changed.
    pub fn set_data(&mut self, column: usize, role: ItemRole, value: ItemData) -> bool {
        if value.is_none() {
            return self.values.remove(&(column, role)).is_some();
        }
        match self.values.get(&(column, role)) {
            Some(current) if *current == value => false,
            _ => {
                self.values.insert((column, role), value);
                true
            }
        }
    }

    /// The roles that hold a value in `column`.
    pub fn roles(&self, column: usize) -> Vec<ItemRole> {
        let mut roles: Vec<ItemRole> = self
            .values
            .keys()
            .filter(|(c, _)| *c == column)
            .map(|(_, role)| *role)
            .collect();
        roles.sort();
        roles
    }

    /// The interaction flags of this node.
    pub fn flags(&self) -> ItemFlags {
        self.flags
    }

    /// Replaces the interaction flags of this node.
    pub fn set_flags(&mut self, flags: ItemFlags) {
        self.flags = flags;
    }
}

/// Arena storage for all nodes of one model, including its root.
pub(crate) struct NodeArena {
    nodes: SlotMap<NodeId, Node>,
    root: NodeId,
}

impl NodeArena {
    pub(crate) fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::new(ItemFlags::disabled()));
        Self { nodes, root }
    }

    pub(crate) fn root(&self) -> NodeId {
        self.root
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub(crate) fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of live nodes, excluding the root.
    pub(crate) fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Stores a parentless node and returns its id.
    pub(crate) fn insert(&mut self, node: Node) -> NodeId {
        debug_assert!(node.parent.is_none() && node.children.is_empty());
        self.nodes.insert(node)
    }

    /// The child at `row` under `parent`.
    pub(crate) fn child_at(&self, parent: NodeId, row: usize) -> Option<NodeId> {
        self.nodes.get(parent)?.children.get(row).copied()
    }

    /// The current row of `id` within its parent; `None` when it has no parent.
    pub(crate) fn row_of(&self, id: NodeId) -> Option<usize> {
        let parent = self.nodes.get(id)?.parent?;
        self.nodes
            .get(parent)?
            .children
            .iter()
            .position(|&child| child == id)
    }

    /// Returns `true` if `id` is reachable from the root.
    pub(crate) fn is_attached(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(current_id) = current {
            if current_id == self.root {
                return true;
            }
            current = self.nodes.get(current_id).and_then(|n| n.parent);
        }
        false
    }

    /// Returns `true` if `ancestor` is `id` or lies on its parent chain.
    pub(crate) fn is_ancestor_of(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(current_id) = current {
            if current_id == ancestor {
                return true;
            }
            current = self.nodes.get(current_id).and_then(|n| n.parent);
        }
        false
    }

    /// Links a parentless `id` into `parent` at `row`.
    ///
    /// Callers check the structural preconditions beforehand.
    pub(crate) fn attach(&mut self, id: NodeId, parent: NodeId, row: usize) {
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            let row = row.min(parent_node.children.len());
            parent_node.children.insert(row, id);
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.parent = Some(parent);
        }
    }

    /// Unlinks `id` from its parent. Its own subtree stays intact.
    ///
    /// Returns the row it occupied.
    pub(crate) fn detach(&mut self, id: NodeId) -> Option<usize> {
        let parent = self.nodes.get(id)?.parent?;
        let row = self.row_of(id)?;
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.remove(row);
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.parent = None;
        }
        Some(row)
    }

    /// `id` and all of its descendants, in pre-order.
    pub(crate) fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get(current) {
                result.push(current);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        result
    }

    /// Frees a parentless `id` and its whole subtree. Returns how many nodes
    /// were freed.
    pub(crate) fn discard(&mut self, id: NodeId) -> usize {
        let doomed = self.subtree(id);
        for node in &doomed {
            self.nodes.remove(*node);
        }
        doomed.len()
    }

    /// Frees every node below the root.
    pub(crate) fn clear(&mut self) -> usize {
        let root = self.root;
        let freed = self.nodes.len() - 1;
        self.nodes.retain(|id, _| id == root);
        if let Some(root_node) = self.nodes.get_mut(root) {
            root_node.children.clear();
        }
        freed
    }
}
