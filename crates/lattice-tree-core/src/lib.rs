//! Building blocks shared by the Lattice Tree crates.
//!
//! - [`Signal`]: synchronous change notification with scoped connections
//! - [`SignalError`]: failure of a signal operation
//! - [`logging`]: tracing targets, [`PerfSpan`] and the options
//!   used when dumping a tree as text
//!
//! ```
//! use lattice_tree_core::Signal;
//!
//! let count_changed = Signal::<usize>::new();
//! let id = count_changed.connect(|count| println!("{count} rows"));
//! count_changed.emit(12);
//! count_changed.disconnect(id);
//! ```

mod error;
pub mod logging;
pub mod signal;

pub use error::SignalError;
pub use logging::{PerfSpan, TreeFormatOptions, TreeStyle};
pub use signal::{ConnectionGuard, ConnectionId, Signal};
