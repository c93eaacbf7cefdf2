//! The tree model and the coordinate interface views use to read it.
//!
//! # Core Types
//!
//! - `ModelIndex`: Identifies an item's position (row, column, parent)
//! - `ItemRole`: Specifies which value of an item to access
//! - `ItemData`: The closed set of display values
//! - `ItemModel`: The read interface views walk
//! - `ModelSignals`: Change notifications
//!
//! # Model Implementations
//!
//! - `TreeModel`: Hierarchical nodes addressed by coordinate or `NodeId`
//! - `LogModel`: Log records as rows of a flat three-column model
//!
//! # Example
//!
//! ```
//! use lattice_tree::model::{ItemData, ItemModel, ItemRole, ModelIndex, TreeModel};
//!
//! let model = TreeModel::new();
//! model.signals().rows_inserted.connect(|(parent, first, last)| {
//!     println!("rows {first}..={last} inserted under {parent:?}");
//! });
//!
//! let node = model.create_node_with(|n| {
//!     n.set_data(0, ItemRole::Display, ItemData::from("Apple"));
//! });
//! model.add(node, None).unwrap();
//!
//! let first = model.index(0, 0, &ModelIndex::invalid());
//! assert_eq!(model.display_text(&first).as_deref(), Some("Apple"));
//! ```
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  TreeModel  │────>│   Signals   │────>│    View     │
//! │ (ItemModel) │     │             │     │             │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!       │                                       │
//!       │         ┌─────────────┐               │
//!       └────────>│ ModelIndex  │<──────────────┘
//!                 │  ItemRole   │
//!                 │  ItemData   │
//!                 └─────────────┘
//! ```

mod debug;
mod flags;
mod index;
pub mod log_model;
mod node;
mod role;
mod traits;
mod tree_model;

pub use debug::TreeDebug;
pub use flags::ItemFlags;
pub use index::ModelIndex;
#[cfg(feature = "log-capture")]
pub use log_model::LogCapture;
pub use log_model::{LogModel, LogRecord};
pub use node::{Node, NodeId};
pub use role::{ItemData, ItemRole};
pub use traits::{DataChangedArgs, ItemModel, ModelSignals, Orientation, RangeArgs};
pub use tree_model::TreeModel;
