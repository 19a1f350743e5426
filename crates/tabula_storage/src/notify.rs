//! Change notification: listeners, batching, and event types.
//!
//! Columns and tables publish events to registered [`Listener`]s. Listener
//! references are held weakly: registering a listener never keeps it alive,
//! so callers own their listeners and drop them to unsubscribe implicitly.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use tabula_foundation::RowRange;
use tracing::warn;

/// Receives change events of type `E`.
///
/// Implemented for any `Fn(&E)` closure.
pub trait Listener<E> {
    /// Called once per published event.
    fn on_change(&self, event: &E);
}

impl<E, F> Listener<E> for F
where
    F: Fn(&E),
{
    fn on_change(&self, event: &E) {
        self(event);
    }
}

/// Handle returned when registering a listener, used to unregister it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Weakly-held list of listeners.
pub struct ListenerList<E: 'static> {
    next_id: u64,
    entries: Vec<(ListenerId, Weak<dyn Listener<E>>)>,
}

impl<E: 'static> Default for ListenerList<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: 'static> fmt::Debug for ListenerList<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerList")
            .field("registered", &self.entries.len())
            .finish()
    }
}

impl<E: 'static> ListenerList<E> {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    /// Registers a listener. The list keeps only a weak reference.
    pub fn add(&mut self, listener: &Rc<dyn Listener<E>>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.prune();
        self.entries.push((id, Rc::downgrade(listener)));
        id
    }

    /// Unregisters a listener. Returns false if the id was unknown.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.prune();
        self.entries.len() != before
    }

    /// Drops entries whose listener no longer exists.
    pub fn prune(&mut self) {
        self.entries.retain(|(_, weak)| weak.strong_count() > 0);
    }

    /// Number of listeners still alive.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, weak)| weak.strong_count() > 0)
            .count()
    }

    /// Returns true if no live listener is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Upgrades every live listener, in registration order.
    #[must_use]
    pub fn live(&self) -> Vec<Rc<dyn Listener<E>>> {
        self.entries
            .iter()
            .filter_map(|(_, weak)| weak.upgrade())
            .collect()
    }

    /// Delivers `event` to every live listener.
    pub fn dispatch(&self, event: &E) {
        for listener in self.live() {
            listener.on_change(event);
        }
    }
}

/// Batching state for a single notifier.
///
/// `disable` and `enable` nest: only the outermost `enable` releases the
/// aggregated range. Outside a batch every recorded change is released
/// immediately.
#[derive(Debug, Default, Clone)]
pub struct ChangeManager {
    depth: usize,
    pending: Option<RowRange>,
    mod_count: u64,
}

impl ChangeManager {
    /// Creates an idle change manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens (or nests) a batch.
    pub fn disable(&mut self) {
        self.depth += 1;
    }

    /// Closes a batch level. Returns the aggregated range when the
    /// outermost batch closes with changes pending.
    pub fn enable(&mut self) -> Option<RowRange> {
        if self.depth == 0 {
            warn!("enable_notify called without a matching disable_notify");
        } else {
            self.depth -= 1;
        }
        if self.depth == 0 {
            self.pending.take()
        } else {
            None
        }
    }

    /// Records a change. Returns the range to publish now, or `None` while
    /// a batch is open.
    pub fn record(&mut self, rows: RowRange) -> Option<RowRange> {
        self.mod_count += 1;
        let merged = match self.pending {
            Some(pending) => pending.union(rows),
            None => rows,
        };
        self.pending = Some(merged);
        if self.depth == 0 {
            self.pending.take()
        } else {
            None
        }
    }

    /// Returns true while a batch is open.
    #[must_use]
    pub const fn is_batching(&self) -> bool {
        self.depth > 0
    }

    /// Current nesting depth.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Number of changes recorded since creation.
    #[must_use]
    pub const fn mod_count(&self) -> u64 {
        self.mod_count
    }
}

/// A change to a range of rows in one column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnEvent {
    /// Name of the column that changed.
    pub column: Arc<str>,
    /// Rows touched, aggregated over a batch.
    pub rows: RowRange,
}

/// What happened to the rows of a table event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// Rows were appended past the previous row count.
    Insert,
    /// Existing rows changed (including holes opened or refilled).
    Update,
    /// The row count shrank.
    Delete,
}

/// Which columns a table event covers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ColumnScope {
    /// Every column.
    All,
    /// A single column, by index.
    Index(usize),
}

/// A table-level change event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableEvent {
    /// Cell contents or row lifecycle changed.
    Rows {
        /// Rows touched.
        rows: RowRange,
        /// Columns touched.
        column: ColumnScope,
        /// Kind of change.
        kind: ChangeKind,
    },
    /// Columns were added, removed, replaced, or the table was cleared.
    Structure,
}

impl TableEvent {
    /// Row-lifecycle event covering every column.
    #[must_use]
    pub const fn rows(rows: RowRange, kind: ChangeKind) -> Self {
        Self::Rows {
            rows,
            column: ColumnScope::All,
            kind,
        }
    }

    /// Cell update in a single column.
    #[must_use]
    pub const fn cells(rows: RowRange, column: usize) -> Self {
        Self::Rows {
            rows,
            column: ColumnScope::Index(column),
            kind: ChangeKind::Update,
        }
    }

    /// Returns the change kind, if this is a row event.
    #[must_use]
    pub const fn kind(&self) -> Option<ChangeKind> {
        match self {
            Self::Rows { kind, .. } => Some(*kind),
            Self::Structure => None,
        }
    }

    /// Returns the row range, if this is a row event.
    #[must_use]
    pub const fn row_range(&self) -> Option<RowRange> {
        match self {
            Self::Rows { rows, .. } => Some(*rows),
            Self::Structure => None,
        }
    }

    /// Folds `next` into `self` if both describe the same kind of change
    /// to the same columns over touching ranges.
    pub(crate) fn try_merge(&mut self, next: &Self) -> bool {
        match (self, next) {
            (Self::Structure, Self::Structure) => true,
            (
                Self::Rows { rows, column, kind },
                Self::Rows {
                    rows: next_rows,
                    column: next_column,
                    kind: next_kind,
                },
            ) if column == next_column
                && kind == next_kind
                && rows.is_adjacent_or_overlapping(*next_rows) =>
            {
                *rows = rows.union(*next_rows);
                true
            }
            _ => false,
        }
    }
}

/// A listener that records every event it sees.
///
/// Handy for caches that invalidate lazily and for tests.
#[derive(Debug)]
pub struct EventLog<E> {
    events: RefCell<Vec<E>>,
}

impl<E> Default for EventLog<E> {
    fn default() -> Self {
        Self {
            events: RefCell::new(Vec::new()),
        }
    }
}

impl<E: Clone> EventLog<E> {
    /// Creates an empty log, ready to be registered.
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Snapshot of recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<E> {
        self.events.borrow().clone()
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Forgets recorded events.
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl<E: Clone> Listener<E> for EventLog<E> {
    fn on_change(&self, event: &E) {
        self.events.borrow_mut().push(event.clone());
    }
}
