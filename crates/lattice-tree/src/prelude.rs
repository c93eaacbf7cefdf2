//! Prelude module for Lattice Tree.
//!
//! This module re-exports the most commonly used types for convenient importing:
//!
//! ```ignore
//! use lattice_tree::prelude::*;
//! ```

// ============================================================================
// Signal/Slot
// ============================================================================

pub use crate::signal::{ConnectionGuard, ConnectionId, Signal};

// ============================================================================
// Model/View
// ============================================================================

pub use crate::model::{
    ItemData, ItemFlags, ItemModel, ItemRole, ModelIndex, ModelSignals, Node, NodeId,
    Orientation, TreeDebug, TreeModel,
};

// ============================================================================
// Errors and configuration
// ============================================================================

pub use crate::config::TreeModelConfig;
pub use crate::{ModelError, ModelResult};
