//! Tracing hooks and text-dump options.
//!
//! The crates only emit `tracing` events; installing a subscriber is up to
//! the application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("lattice_tree::model=debug,lattice_tree_core=warn")
//!     .init();
//! ```
//!
//! Rejected mutations log at `warn`, completed ones at `debug`, and signal
//! emission at `trace`.

/// Event targets, usable as `EnvFilter` directives.
pub mod targets {
    pub const CORE: &str = "lattice_tree_core";
    pub const SIGNAL: &str = "lattice_tree_core::signal";
    /// Tree mutations and their rejections.
    pub const MODEL: &str = "lattice_tree::model";
    pub const CONFIG: &str = "lattice_tree::config";
    pub const LOG_MODEL: &str = "lattice_tree::log_model";
    /// Spans opened by [`PerfSpan`](super::PerfSpan).
    pub const PERF: &str = "lattice_tree::perf";
}

/// Characters used to draw branches in a tree dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// `+--`, `` `-- `` and `|`.
    Ascii,
    /// Box-drawing characters.
    #[default]
    Unicode,
    /// A single dash per node and no guide lines.
    Compact,
}

/// What a tree dump shows and how it is drawn.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    pub style: TreeStyle,
    pub show_ids: bool,
    /// Append each node's row within its parent.
    pub show_rows: bool,
    /// Deepest level printed, top level being 0. `None` prints everything.
    pub max_depth: Option<usize>,
    /// Spaces after each guide line.
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: true,
            show_rows: false,
            max_depth: None,
            indent_size: 2,
        }
    }
}

impl TreeFormatOptions {
    /// Labels only.
    pub fn minimal() -> Self {
        Self {
            show_ids: false,
            show_rows: false,
            ..Default::default()
        }
    }

    /// Text written before the label of a node at `depth`.
    ///
    /// `is_last` selects the closing branch for the last child of a parent.
    pub fn branch_prefix(&self, depth: usize, is_last: bool) -> String {
        let (guide, middle, last) = match self.style {
            TreeStyle::Ascii => ("|", "+--", "`--"),
            TreeStyle::Unicode => ("\u{2502}", "\u{251c}\u{2500}\u{2500}", "\u{2514}\u{2500}\u{2500}"),
            TreeStyle::Compact => ("", "-", "-"),
        };

        let step = guide.chars().count() + self.indent_size;
        let mut prefix = String::with_capacity(depth * step + 4);
        for _ in 0..depth {
            prefix.push_str(guide);
            prefix.extend(std::iter::repeat_n(' ', self.indent_size));
        }
        prefix.push_str(if is_last { last } else { middle });
        prefix.push(' ');
        prefix
    }
}

/// Keeps an `info` span on [`targets::PERF`] entered until dropped, so a
/// timing subscriber can measure the enclosed operation.
#[derive(Debug)]
pub struct PerfSpan {
    _entered: tracing::span::EnteredSpan,
}

impl PerfSpan {
    pub fn new(operation: &'static str) -> Self {
        let span = tracing::info_span!(target: "lattice_tree::perf", "perf", operation);
        Self {
            _entered: span.entered(),
        }
    }
}
