//! Table event delivery and column-event forwarding.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{trace, warn};

use crate::notify::{ColumnEvent, Listener, ListenerId, ListenerList, TableEvent};

#[derive(Debug, Default)]
struct ChannelState {
    listeners: ListenerList<TableEvent>,
    depth: usize,
    queued: Vec<TableEvent>,
    /// Slot key of each column, by column index.
    keys: Vec<u64>,
}

/// Shared event channel of one table.
///
/// Column forwarders hold it weakly and publish through it, so it lives
/// behind an `Rc` with interior mutability. The state borrow is never held
/// while listeners run.
#[derive(Debug, Default)]
pub(crate) struct TableChannel {
    state: RefCell<ChannelState>,
}

impl TableChannel {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub(crate) fn add_listener(&self, listener: &Rc<dyn Listener<TableEvent>>) -> ListenerId {
        self.state.borrow_mut().listeners.add(listener)
    }

    pub(crate) fn remove_listener(&self, id: ListenerId) -> bool {
        self.state.borrow_mut().listeners.remove(id)
    }

    pub(crate) fn prune(&self) {
        self.state.borrow_mut().listeners.prune();
    }

    pub(crate) fn has_listeners(&self) -> bool {
        !self.state.borrow().listeners.is_empty()
    }

    pub(crate) fn depth(&self) -> usize {
        self.state.borrow().depth
    }

    pub(crate) fn set_keys(&self, keys: Vec<u64>) {
        self.state.borrow_mut().keys = keys;
    }

    fn index_of_key(&self, key: u64) -> Option<usize> {
        self.state.borrow().keys.iter().position(|&k| k == key)
    }

    /// Delivers `event` now, or queues it while batching.
    pub(crate) fn publish(&self, event: TableEvent) {
        let listeners = {
            let mut state = self.state.borrow_mut();
            if state.depth > 0 {
                let merged = state
                    .queued
                    .last_mut()
                    .is_some_and(|last| last.try_merge(&event));
                if !merged {
                    state.queued.push(event);
                }
                return;
            }
            state.listeners.live()
        };
        trace!(?event, listeners = listeners.len(), "table event");
        for listener in listeners {
            listener.on_change(&event);
        }
    }

    pub(crate) fn disable(&self) {
        self.state.borrow_mut().depth += 1;
    }

    /// Closes a batch level, delivering queued events when the outermost
    /// level closes.
    pub(crate) fn enable(&self) {
        let (queued, listeners) = {
            let mut state = self.state.borrow_mut();
            if state.depth == 0 {
                warn!("table enable_notify called without a matching disable_notify");
                return;
            }
            state.depth -= 1;
            if state.depth > 0 || state.queued.is_empty() {
                return;
            }
            (std::mem::take(&mut state.queued), state.listeners.live())
        };
        for event in &queued {
            trace!(?event, listeners = listeners.len(), "table event (batched)");
            for listener in &listeners {
                listener.on_change(event);
            }
        }
    }
}

/// Listens to one column and republishes its changes as table events.
pub(crate) struct ColumnForwarder {
    channel: Weak<TableChannel>,
    key: u64,
}

impl ColumnForwarder {
    pub(crate) fn new(channel: &Rc<TableChannel>, key: u64) -> Rc<dyn Listener<ColumnEvent>> {
        Rc::new(Self {
            channel: Rc::downgrade(channel),
            key,
        })
    }
}

impl Listener<ColumnEvent> for ColumnForwarder {
    fn on_change(&self, event: &ColumnEvent) {
        let Some(channel) = self.channel.upgrade() else {
            return;
        };
        if let Some(index) = channel.index_of_key(self.key) {
            channel.publish(TableEvent::cells(event.rows, index));
        }
    }
}
