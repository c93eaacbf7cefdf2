//! Synchronous signals.
//!
//! A model owns one [`Signal`] per kind of change; views connect closures
//! ("slots") to the ones they care about. [`connect`](Signal::connect) hands
//! back a [`ConnectionId`] for later disconnection, and
//! [`connect_scoped`](Signal::connect_scoped) a [`ConnectionGuard`] that
//! disconnects on drop.
//!
//! # Delivery
//!
//! Delivery is always synchronous: [`Signal::emit`] calls every connected slot
//! in connection order on the emitting thread and returns once the last slot
//! has returned. There is no queued or deferred delivery.
//!
//! Signals are single-threaded (`!Send`, `!Sync`). A slot may connect or
//! disconnect slots on the signal it is invoked from; such changes take effect
//! from the next emission.
//!
//! # Example
//!
//! ```
//! use lattice_tree_core::Signal;
//!
//! let renamed = Signal::<(u64, String)>::new();
//! let id = renamed.connect(|(node, name)| println!("node {node} is now {name}"));
//!
//! renamed.emit((7, "Inbox".to_string()));
//! assert!(renamed.disconnect(id));
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use slotmap::{SlotMap, new_key_type};

use crate::error::SignalError;

new_key_type! {
    /// Identifies one connection on one signal.
    pub struct ConnectionId;
}

type Slot<Args> = Rc<dyn Fn(&Args)>;

/// A slot and its connection sequence number.
///
/// The slot map reuses freed entries, so iteration order says nothing about
/// connection order; the sequence number does.
struct Connection<Args> {
    seq: u64,
    slot: Slot<Args>,
}

/// A list of slots called with `&Args` on every [`emit`](Self::emit).
///
/// Signals without payload use `Args = ()`; several values travel as a tuple.
pub struct Signal<Args> {
    connections: RefCell<SlotMap<ConnectionId, Connection<Args>>>,
    next_seq: Cell<u64>,
    blocked: Cell<bool>,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static> Signal<Args> {
    /// A signal with no slots.
    pub fn new() -> Self {
        Self {
            connections: RefCell::new(SlotMap::with_key()),
            next_seq: Cell::new(0),
            blocked: Cell::new(false),
        }
    }

    /// Add `slot` after the existing slots.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + 'static,
    {
        let seq = self.next_seq.get();
        self.next_seq.set(seq + 1);
        self.connections.borrow_mut().insert(Connection {
            seq,
            slot: Rc::new(slot),
        })
    }

    /// Remove one slot. Returns `false` if `id` was not connected.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.borrow_mut().remove(id).is_some()
    }

    /// Like [`disconnect`](Self::disconnect), but reports a missing connection
    /// as an error.
    pub fn try_disconnect(&self, id: ConnectionId) -> Result<(), SignalError> {
        if self.disconnect(id) {
            Ok(())
        } else {
            Err(SignalError::InvalidConnection)
        }
    }

    /// Remove every slot.
    pub fn disconnect_all(&self) {
        self.connections.borrow_mut().clear();
    }

    pub fn connection_count(&self) -> usize {
        self.connections.borrow().len()
    }

    /// While blocked, [`emit`](Self::emit) returns without calling any slot.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.set(blocked);
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked.get()
    }

    /// Call every slot, oldest connection first.
    #[tracing::instrument(skip_all, target = "lattice_tree_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: "lattice_tree_core::signal", "signal blocked, skipping emit");
            return;
        }

        // Snapshot the slots so a slot may (dis)connect without a borrow conflict.
        let slots: Vec<Slot<Args>> = {
            let connections = self.connections.borrow();
            let mut ordered: Vec<&Connection<Args>> = connections.values().collect();
            ordered.sort_unstable_by_key(|connection| connection.seq);
            ordered.into_iter().map(|connection| connection.slot.clone()).collect()
        };
        tracing::trace!(target: "lattice_tree_core::signal", connection_count = slots.len(), "emitting signal");

        for slot in slots {
            slot(&args);
        }
    }

    /// Like [`connect`](Self::connect), but the connection lives only as long
    /// as the returned guard.
    pub fn connect_scoped<F>(&self, slot: F) -> ConnectionGuard<'_, Args>
    where
        F: Fn(&Args) + 'static,
    {
        let id = self.connect(slot);
        ConnectionGuard { signal: self, id }
    }
}

/// Disconnects its slot when dropped.
///
/// ```
/// use lattice_tree_core::Signal;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let row_count = Signal::<usize>::new();
/// let seen = Rc::new(Cell::new(0));
///
/// {
///     let seen = seen.clone();
///     let _guard = row_count.connect_scoped(move |&rows| seen.set(rows));
///     row_count.emit(3);
/// }
/// row_count.emit(9);
/// assert_eq!(seen.get(), 3);
/// ```
pub struct ConnectionGuard<'a, Args: 'static> {
    signal: &'a Signal<Args>,
    id: ConnectionId,
}

impl<Args: 'static> ConnectionGuard<'_, Args> {
    /// The id of the guarded connection.
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl<Args: 'static> Drop for ConnectionGuard<'_, Args> {
    fn drop(&mut self) {
        self.signal.disconnect(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_emit_reaches_slot() {
        let rows = Signal::<usize>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = seen.clone();
        rows.connect(move |&n| sink.borrow_mut().push(n));

        rows.emit(3);
        rows.emit(0);

        assert_eq!(*seen.borrow(), vec![3, 0]);
    }

    #[test]
    fn test_order_survives_slot_reuse() {
        let signal = Signal::<()>::new();
        let calls = Rc::new(RefCell::new(Vec::new()));

        let sink = calls.clone();
        let first = signal.connect(move |_| sink.borrow_mut().push("first"));
        let sink = calls.clone();
        signal.connect(move |_| sink.borrow_mut().push("second"));
        assert!(signal.disconnect(first));
        let sink = calls.clone();
        signal.connect(move |_| sink.borrow_mut().push("third"));

        signal.emit(());
        assert_eq!(*calls.borrow(), vec!["second", "third"]);
    }

    #[test]
    fn test_signal_disconnect() {
        let signal = Signal::<u8>::new();
        let counter = Rc::new(Cell::new(0));

        let c = counter.clone();
        let id = signal.connect(move |_| c.set(c.get() + 1));

        signal.emit(1);
        assert!(signal.disconnect(id));
        signal.emit(2);

        assert_eq!(counter.get(), 1);
        assert!(!signal.disconnect(id));
        assert_eq!(signal.try_disconnect(id), Err(SignalError::InvalidConnection));
    }

    #[test]
    fn test_signal_blocked() {
        let signal = Signal::<()>::new();
        let counter = Rc::new(Cell::new(0));

        let c = counter.clone();
        signal.connect(move |_| c.set(c.get() + 1));

        signal.set_blocked(true);
        signal.emit(());
        assert!(signal.is_blocked());
        assert_eq!(counter.get(), 0);

        signal.set_blocked(false);
        signal.emit(());
        assert_eq!(counter.get(), 1);
    }

    #[test]
    fn test_slots_run_in_connection_order() {
        let signal = Signal::<&'static str>::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let log = log.clone();
            signal.connect(move |arg| log.borrow_mut().push(format!("{tag}:{arg}")));
        }

        signal.emit("x");
        assert_eq!(*log.borrow(), vec!["first:x", "second:x", "third:x"]);
    }

    #[test]
    fn test_disconnect_all() {
        let signal = Signal::<bool>::new();
        signal.connect(|_| {});
        signal.connect(|_| {});
        assert_eq!(signal.connection_count(), 2);

        signal.disconnect_all();
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_connection_guard() {
        let signal = Signal::<()>::new();
        {
            let _guard = signal.connect_scoped(|_| {});
            assert_eq!(signal.connection_count(), 1);
        }
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_slot_may_connect_during_emit() {
        let signal = Rc::new(Signal::<i32>::new());
        let hits = Rc::new(Cell::new(0));

        let inner_signal = Rc::downgrade(&signal);
        let inner_hits = hits.clone();
        signal.connect(move |_| {
            if let Some(signal) = inner_signal.upgrade() {
                let hits = inner_hits.clone();
                signal.connect(move |_| hits.set(hits.get() + 1));
            }
        });

        signal.emit(1);
        // Slots added during emission only see later emissions.
        assert_eq!(hits.get(), 0);
        signal.emit(2);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_signal_with_multiple_args() {
        let signal = Signal::<(String, usize, usize)>::new();
        let received = Rc::new(RefCell::new(None));

        let r = received.clone();
        signal.connect(move |(name, first, last)| {
            *r.borrow_mut() = Some((name.clone(), *first, *last));
        });

        signal.emit(("rows".to_string(), 2, 4));
        assert_eq!(*received.borrow(), Some(("rows".to_string(), 2, 4)));
    }
}
