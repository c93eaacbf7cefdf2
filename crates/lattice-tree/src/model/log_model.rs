//! A flat model that shows log records as rows.
//!
//! [`LogModel`] is an ordinary consumer of [`TreeModel`]: every record becomes
//! one top-level row with the columns `Level`, `Time` and `Message`. Views
//! watch it like any other model.
//!
//! With the `log-capture` feature, [`LogCapture`] is a `tracing-subscriber`
//! layer that forwards events into a channel. The layer may run on any
//! thread; the model itself stays on its owning thread and picks the records
//! up in [`LogModel::pump`].
//!
//! ```ignore
//! use tracing_subscriber::layer::SubscriberExt;
//! use lattice_tree::model::LogModel;
//!
//! let (log_model, capture) = LogModel::with_capture(1_000);
//! let subscriber = tracing_subscriber::registry().with(capture);
//! tracing::subscriber::set_global_default(subscriber)?;
//!
//! // on the UI thread, once per frame:
//! log_model.pump()?;
//! ```

use std::cell::Cell;

use chrono::{DateTime, Local};
use lattice_tree_core::logging::targets;
use tracing::Level;

use super::flags::ItemFlags;
use super::index::ModelIndex;
use super::role::{ItemData, ItemRole};
use super::traits::{ItemModel, ModelSignals, Orientation};
use super::tree_model::TreeModel;
use crate::error::ModelResult;

/// Column showing the record level.
pub const LEVEL_COLUMN: usize = 0;
/// Column showing the record time.
pub const TIME_COLUMN: usize = 1;
/// Column showing the record message.
pub const MESSAGE_COLUMN: usize = 2;

/// Role under which the level column stores the event target.
pub const TARGET_ROLE: ItemRole = ItemRole::User(0);

/// Rows kept when no explicit limit is given.
pub const DEFAULT_MAX_ROWS: usize = 10_000;

/// One log entry.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub level: Level,
    pub timestamp: DateTime<Local>,
    pub target: String,
    pub message: String,
}

impl LogRecord {
    /// Create a record stamped with the current local time.
    pub fn new(level: Level, target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            timestamp: Local::now(),
            target: target.into(),
            message: message.into(),
        }
    }

    /// Replace the timestamp.
    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Log records as rows of a three-column model.
///
/// Rows are append-only. Once more than `max_rows` rows exist, the oldest
/// rows are removed (with the usual remove notifications).
pub struct LogModel {
    model: TreeModel,
    max_rows: Cell<usize>,
    #[cfg(feature = "log-capture")]
    receiver: Option<crossbeam_channel::Receiver<LogRecord>>,
}

impl LogModel {
    /// Create an empty log model keeping at most `max_rows` rows.
    ///
    /// A limit of zero is treated as one.
    pub fn new(max_rows: usize) -> Self {
        let model = TreeModel::with_headers(["Level", "Time", "Message"]);
        model.set_default_flags(ItemFlags::new());
        Self {
            model,
            max_rows: Cell::new(max_rows.max(1)),
            #[cfg(feature = "log-capture")]
            receiver: None,
        }
    }

    /// Create a log model together with a [`LogCapture`] layer that feeds it.
    #[cfg(feature = "log-capture")]
    pub fn with_capture(max_rows: usize) -> (Self, LogCapture) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        let mut model = Self::new(max_rows);
        model.receiver = Some(receiver);
        (model, LogCapture::new(sender))
    }

    /// The underlying tree model.
    pub fn model(&self) -> &TreeModel {
        &self.model
    }

    /// Maximum number of rows kept.
    pub fn max_rows(&self) -> usize {
        self.max_rows.get()
    }

    /// Change the row limit, dropping the oldest rows if needed.
    pub fn set_max_rows(&self, max_rows: usize) -> ModelResult<()> {
        self.max_rows.set(max_rows.max(1));
        self.trim()
    }

    /// Number of rows currently held.
    pub fn len(&self) -> usize {
        self.model.row_count(&ModelIndex::invalid())
    }

    /// Returns `true` if no rows are held.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append one record as the last row.
    ///
    /// Returns the coordinate of the new row.
    pub fn append(&self, record: LogRecord) -> ModelResult<ModelIndex> {
        let node = self.model.create_node_with(|node| {
            node.set_data(
                LEVEL_COLUMN,
                ItemRole::Display,
                ItemData::from(record.level.as_str()),
            );
            node.set_data(LEVEL_COLUMN, TARGET_ROLE, ItemData::from(record.target));
            node.set_data(
                TIME_COLUMN,
                ItemRole::Display,
                ItemData::from(record.timestamp.format("%H:%M:%S%.3f").to_string()),
            );
            node.set_data(
                TIME_COLUMN,
                ItemRole::Edit,
                ItemData::from(record.timestamp.to_rfc3339()),
            );
            node.set_data(MESSAGE_COLUMN, ItemRole::Display, ItemData::from(record.message));
        });

        if let Err(err) = self.model.add(node, None) {
            // The node never became visible; do not leak it.
            let _ = self.model.discard(node);
            return Err(err);
        }
        self.trim()?;
        Ok(self.model.index_for_node(node, LEVEL_COLUMN))
    }

    /// Move every record waiting in the capture channel into the model.
    ///
    /// Returns the number of records appended. Without a capture this does
    /// nothing.
    #[cfg(feature = "log-capture")]
    pub fn pump(&self) -> ModelResult<usize> {
        let Some(receiver) = &self.receiver else {
            return Ok(0);
        };
        let mut appended = 0;
        for record in receiver.try_iter() {
            self.append(record)?;
            appended += 1;
        }
        if appended > 0 {
            tracing::trace!(target: targets::LOG_MODEL, appended, "pumped log records");
        }
        Ok(appended)
    }

    /// Remove every row.
    pub fn clear(&self) -> ModelResult<()> {
        self.model.clear()
    }

    fn trim(&self) -> ModelResult<()> {
        let root = self.model.root();
        let excess = self.len().saturating_sub(self.max_rows.get());
        for _ in 0..excess {
            if let Some(&oldest) = self.model.children(root).first() {
                self.model.delete(oldest, None)?;
            }
        }
        if excess > 0 {
            tracing::trace!(target: targets::LOG_MODEL, excess, "dropped oldest log rows");
        }
        Ok(())
    }
}

impl Default for LogModel {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ROWS)
    }
}

impl ItemModel for LogModel {
    fn row_count(&self, parent: &ModelIndex) -> usize {
        self.model.row_count(parent)
    }

    fn column_count(&self, parent: &ModelIndex) -> usize {
        self.model.column_count(parent)
    }

    fn data(&self, index: &ModelIndex, role: ItemRole) -> ItemData {
        self.model.data(index, role)
    }

    fn index(&self, row: usize, column: usize, parent: &ModelIndex) -> ModelIndex {
        self.model.index(row, column, parent)
    }

    fn parent(&self, index: &ModelIndex) -> ModelIndex {
        self.model.parent(index)
    }

    fn signals(&self) -> &ModelSignals {
        self.model.signals()
    }

    fn flags(&self, index: &ModelIndex) -> ItemFlags {
        self.model.flags(index)
    }

    fn header_data(&self, section: usize, orientation: Orientation, role: ItemRole) -> ItemData {
        self.model.header_data(section, orientation, role)
    }
}

#[cfg(feature = "log-capture")]
pub use capture::LogCapture;

#[cfg(feature = "log-capture")]
mod capture {
    use std::fmt::Write;

    use tracing::field::{Field, Visit};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::Layer;
    use tracing_subscriber::layer::Context;

    use super::LogRecord;

    /// A `tracing-subscriber` layer that sends events to a [`LogModel`](super::LogModel).
    ///
    /// Events from this library's own targets are skipped unless
    /// [`with_internal_events`](Self::with_internal_events) is set, since
    /// appending a record would log again.
    #[derive(Debug, Clone)]
    pub struct LogCapture {
        sender: crossbeam_channel::Sender<LogRecord>,
        max_level: Level,
        internal_events: bool,
    }

    impl LogCapture {
        pub(super) fn new(sender: crossbeam_channel::Sender<LogRecord>) -> Self {
            Self {
                sender,
                max_level: Level::TRACE,
                internal_events: false,
            }
        }

        /// Only forward events at `level` or more severe.
        pub fn with_max_level(mut self, level: Level) -> Self {
            self.max_level = level;
            self
        }

        /// Also forward events from `lattice_tree*` targets.
        pub fn with_internal_events(mut self, enabled: bool) -> Self {
            self.internal_events = enabled;
            self
        }
    }

    /// Collects the `message` field and appends other fields as `key=value`.
    #[derive(Default)]
    struct MessageVisitor {
        message: String,
        fields: String,
    }

    impl Visit for MessageVisitor {
        fn record_str(&mut self, field: &Field, value: &str) {
            if field.name() == "message" {
                self.message.push_str(value);
            } else {
                let _ = write!(self.fields, " {}={}", field.name(), value);
            }
        }

        fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
            if field.name() == "message" {
                let _ = write!(self.message, "{value:?}");
            } else {
                let _ = write!(self.fields, " {}={:?}", field.name(), value);
            }
        }
    }

    impl<S> Layer<S> for LogCapture
    where
        S: Subscriber,
    {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let metadata = event.metadata();
            if *metadata.level() > self.max_level {
                return;
            }
            if !self.internal_events && metadata.target().starts_with("lattice_tree") {
                return;
            }

            let mut visitor = MessageVisitor::default();
            event.record(&mut visitor);
            let mut message = visitor.message;
            message.push_str(&visitor.fields);

            // A dropped model just means nobody is listening any more.
            self.sender
                .send(LogRecord::new(*metadata.level(), metadata.target(), message))
                .ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn record(message: &str) -> LogRecord {
        let timestamp = Local.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).single().unwrap();
        LogRecord::new(Level::WARN, "app::net", message).with_timestamp(timestamp)
    }

    #[test]
    fn test_append_fills_columns() {
        let log = LogModel::new(10);
        let index = log.append(record("disk almost full")).unwrap();

        assert_eq!(log.len(), 1);
        assert_eq!(log.data(&index, ItemRole::Display).as_string(), Some("WARN"));
        assert_eq!(log.data(&index, TARGET_ROLE).as_string(), Some("app::net"));

        let time = log.index(0, TIME_COLUMN, &ModelIndex::invalid());
        assert_eq!(log.data(&time, ItemRole::Display).as_string(), Some("07:08:09.000"));

        let message = log.sibling(&index, 0, MESSAGE_COLUMN);
        assert_eq!(log.display_text(&message).as_deref(), Some("disk almost full"));
        assert!(!log.flags(&message).editable);
    }

    #[test]
    fn test_headers() {
        let log = LogModel::default();
        assert_eq!(log.column_count(&ModelIndex::invalid()), 3);
        assert_eq!(
            log.header_data(MESSAGE_COLUMN, Orientation::Horizontal, ItemRole::Display)
                .as_string(),
            Some("Message")
        );
    }

    #[test]
    fn test_oldest_rows_dropped() {
        let log = LogModel::new(2);
        let removed = Rc::new(RefCell::new(Vec::new()));
        let sink = removed.clone();
        log.signals()
            .rows_removed
            .connect(move |(_, first, last)| sink.borrow_mut().push((*first, *last)));

        for message in ["one", "two", "three"] {
            log.append(record(message)).unwrap();
        }

        assert_eq!(log.len(), 2);
        assert_eq!(*removed.borrow(), vec![(0, 0)]);
        let first = log.index(0, MESSAGE_COLUMN, &ModelIndex::invalid());
        assert_eq!(log.display_text(&first).as_deref(), Some("two"));
        assert_eq!(log.model().node_count(), 2);

        log.set_max_rows(1).unwrap();
        assert_eq!(log.len(), 1);
    }

    #[cfg(feature = "log-capture")]
    #[test]
    fn test_capture_pump() {
        use tracing_subscriber::layer::SubscriberExt;

        let (log, capture) = LogModel::with_capture(100);
        let subscriber = tracing_subscriber::registry().with(capture.with_max_level(Level::INFO));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "app", user = "ada", "signed in");
            tracing::debug!(target: "app", "too verbose");
            tracing::warn!(target: "lattice_tree::model", "internal");
        });

        assert_eq!(log.pump().unwrap(), 1);
        let index = log.index(0, MESSAGE_COLUMN, &ModelIndex::invalid());
        assert_eq!(
            log.display_text(&index).as_deref(),
            Some("signed in user=ada")
        );
        assert_eq!(log.pump().unwrap(), 0);
    }
}
