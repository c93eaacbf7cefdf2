//! Lattice Tree - a row-oriented hierarchical item model.
//!
//! This crate re-exports the core crate (signals, logging helpers) and adds
//! the tree model, its configuration and a log viewer model.
//!
//! A [`TreeModel`](model::TreeModel) owns a tree of nodes and exposes it to
//! views through `(row, column, parent)` coordinates. Every structural change
//! is announced before it happens and committed after, so a view can keep a
//! parallel structure in sync without ever reading the tree mid-change.
//!
//! # Example
//!
//! ```
//! use lattice_tree::prelude::*;
//!
//! let model = TreeModel::with_headers(["Name"]);
//! let fruits = model.create_node_with(|n| {
//!     n.set_data(0, ItemRole::Display, ItemData::from("Fruits"));
//! });
//! model.add(fruits, None)?;
//!
//! let apple = model.create_node_with(|n| {
//!     n.set_data(0, ItemRole::Display, ItemData::from("Apple"));
//! });
//! let index = model.add(apple, Some(fruits))?;
//!
//! assert_eq!(model.node_for_index(&index), Some(apple));
//! assert_eq!(model.parent(&index), model.index_for_node(fruits, 0));
//! # Ok::<(), lattice_tree::ModelError>(())
//! ```

pub use lattice_tree_core::*;

pub mod config;
mod error;
pub mod model;
pub mod prelude;

pub use config::{RoleDefinition, TreeModelConfig};
pub use error::{ConfigError, ConfigResult, ModelError, ModelResult};
