//! Error types for the tree model and its configuration.

use std::path::PathBuf;

use crate::model::NodeId;

/// Result type alias for model operations.
pub type ModelResult<T> = std::result::Result<T, ModelError>;

/// Errors that can occur when mutating a model.
///
/// Queries never fail; an unresolvable coordinate is reported as an invalid
/// index or empty data. These errors come from mutations, which are rejected
/// before any tree state changes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// The node id is not (or no longer) part of the model's arena.
    #[error("node {0:?} does not exist")]
    InvalidNode(NodeId),

    /// The model index does not resolve to a node.
    #[error("model index does not address a node")]
    InvalidIndex,

    /// The root node cannot be inserted, removed, moved or discarded.
    #[error("the root node cannot be {0}")]
    RootNode(&'static str),

    /// The node already has a parent and must be removed first.
    #[error("node {node:?} already has parent {parent:?}")]
    AlreadyAttached { node: NodeId, parent: NodeId },

    /// The node is not a child of the given parent.
    #[error("node {node:?} is not a child of {parent:?}")]
    NotAChild { node: NodeId, parent: NodeId },

    /// Inserting the node would make it its own ancestor.
    #[error("node {node:?} cannot be inserted below itself or its descendant {parent:?}")]
    CircularParentage { node: NodeId, parent: NodeId },

    /// The node still has a parent and cannot be discarded.
    #[error("node {0:?} still has a parent and cannot be discarded")]
    StillAttached(NodeId),

    /// A mutation was issued from inside a change notification.
    #[error("cannot {0} while a change notification is being delivered")]
    ReentrantMutation(&'static str),

    /// A data edit was refused.
    #[error("data rejected: {0}")]
    DataRejected(String),
}

impl ModelError {
    /// Returns `true` for errors caused by a violated structural precondition.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::RootNode(_)
                | Self::AlreadyAttached { .. }
                | Self::NotAChild { .. }
                | Self::CircularParentage { .. }
                | Self::StillAttached(_)
        )
    }
}

/// Result type alias for configuration loading.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while loading a model configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("failed to read model config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML parse error.
    #[error("invalid TOML model config: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON parse error.
    #[error("invalid JSON model config: {0}")]
    Json(#[from] serde_json::Error),

    /// The file extension is neither `.toml` nor `.json`.
    #[error("unsupported model config format '{0}'")]
    UnsupportedFormat(PathBuf),

    /// The configuration parsed but is inconsistent.
    #[error("invalid model config: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
