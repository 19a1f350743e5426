//! The ordered column set shared by every table type.

use std::cell::OnceCell;
use std::collections::HashMap;
use std::rc::Rc;

use tabula_foundation::{Error, Result, RowId};
use tracing::{debug, trace};

use super::attributes::Attributes;
use super::channel::{ColumnForwarder, TableChannel};
use super::item::{Item, TableId};
use crate::column::{Column, TypedColumn};
use crate::config::StoreConfig;
use crate::notify::{ColumnEvent, Listener, ListenerId, TableEvent};

/// Name of the internal item cache column.
pub const ITEM_COLUMN: &str = "#items";

struct Slot {
    key: u64,
    column: Box<dyn Column>,
    subscription: Option<(Rc<dyn Listener<ColumnEvent>>, ListenerId)>,
}

impl Slot {
    fn subscribe(&mut self, channel: &Rc<TableChannel>) {
        if self.subscription.is_none() {
            let forwarder = ColumnForwarder::new(channel, self.key);
            let id = self.column.add_change_listener(&forwarder);
            self.subscription = Some((forwarder, id));
        }
    }

    fn unsubscribe(&mut self) {
        if let Some((_, id)) = self.subscription.take() {
            self.column.remove_change_listener(id);
        }
    }
}

/// Ordered, uniquely named columns plus the table's event channel, item
/// cache, metadata and client properties.
///
/// Column change events are forwarded to the table only while the table
/// has listeners. Forwarders left behind by dropped listeners are released
/// on the next mutable access.
pub struct ColumnSet {
    id: TableId,
    slots: Vec<Slot>,
    next_key: u64,
    names: OnceCell<HashMap<String, usize>>,
    channel: Rc<TableChannel>,
    items: Option<TypedColumn<Item>>,
    metadata: Attributes,
    client_properties: Attributes,
    /// Advances whenever rows are dropped from the end of the table.
    epoch: u32,
    /// Largest column size seen at the last mutable access.
    extent: usize,
    config: StoreConfig,
}

impl std::fmt::Debug for ColumnSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnSet")
            .field("id", &self.id)
            .field("columns", &self.slots.iter().map(|s| s.column.name()).collect::<Vec<_>>())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ColumnSet {
    /// Creates an empty set following `config`.
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        let items = config
            .cache_items
            .then(|| TypedColumn::with_capacity(ITEM_COLUMN, config.initial_capacity));
        Self {
            id: TableId::next(),
            slots: Vec::new(),
            next_key: 0,
            names: OnceCell::new(),
            channel: TableChannel::new(),
            items,
            metadata: Attributes::new(),
            client_properties: Attributes::new(),
            epoch: 0,
            extent: 0,
            config,
        }
    }

    /// Identifier of the owning table.
    #[must_use]
    pub const fn table_id(&self) -> TableId {
        self.id
    }

    /// Configuration the set was built with.
    #[must_use]
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if there are no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Column at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&dyn Column> {
        self.slots.get(index).map(|slot| slot.column.as_ref())
    }

    /// Mutable column at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut dyn Column> {
        self.release_stale_forwarders();
        self.observe_extent();
        match self.slots.get_mut(index) {
            Some(slot) => Some(slot.column.as_mut()),
            None => None,
        }
    }

    /// Columns in order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Column> {
        self.slots.iter().map(|slot| slot.column.as_ref())
    }

    /// Index of the column named `name`.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names
            .get_or_init(|| {
                self.slots
                    .iter()
                    .enumerate()
                    .map(|(index, slot)| (slot.column.name().to_string(), index))
                    .collect()
            })
            .get(name)
            .copied()
    }

    /// Largest column size.
    #[must_use]
    pub fn max_size(&self) -> usize {
        self.iter().map(Column::size).max().unwrap_or(0)
    }

    /// The item cache column, if enabled.
    #[must_use]
    pub fn items(&self) -> Option<&TypedColumn<Item>> {
        self.items.as_ref()
    }

    /// Attributes describing the table's data.
    #[must_use]
    pub const fn metadata(&self) -> &Attributes {
        &self.metadata
    }

    /// Mutable metadata.
    pub fn metadata_mut(&mut self) -> &mut Attributes {
        &mut self.metadata
    }

    /// Attributes owned by the table's users.
    #[must_use]
    pub const fn client_properties(&self) -> &Attributes {
        &self.client_properties
    }

    /// Mutable client properties.
    pub fn client_properties_mut(&mut self) -> &mut Attributes {
        &mut self.client_properties
    }

    /// Row epoch. Dense tables use it as the generation of every row.
    ///
    /// A column shrunk and regrown through one `get_mut` borrow is not
    /// noticed.
    #[must_use]
    pub const fn epoch(&self) -> u32 {
        self.epoch
    }

    fn retire_rows(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        debug!(table = %self.id, epoch = self.epoch, "rows retired");
    }

    /// Advances the epoch if the table lost rows since the last call.
    pub(crate) fn observe_extent(&mut self) {
        let size = self.max_size();
        if size < self.extent {
            self.retire_rows();
        }
        self.extent = size;
    }

    /// Drops column subscriptions once every table listener is gone.
    fn release_stale_forwarders(&mut self) {
        if self.channel.has_listeners() {
            return;
        }
        self.channel.prune();
        if self.is_subscribed() {
            trace!(table = %self.id, "releasing column forwarders");
            for slot in &mut self.slots {
                slot.unsubscribe();
            }
        }
    }

    fn structure_changed(&mut self) {
        self.names = OnceCell::new();
        self.channel
            .set_keys(self.slots.iter().map(|slot| slot.key).collect());
        self.channel.publish(TableEvent::Structure);
    }

    fn check_unique(&self, name: &str, except: Option<usize>) -> Result<()> {
        match self.index_of(name) {
            Some(existing) if Some(existing) != except => Err(Error::duplicate_column(name)),
            _ => Ok(()),
        }
    }

    fn make_slot(&mut self, mut column: Box<dyn Column>) -> Slot {
        for _ in 0..self.channel.depth() {
            column.disable_notify();
        }
        let mut slot = Slot {
            key: self.next_key,
            column,
            subscription: None,
        };
        self.next_key += 1;
        if self.channel.has_listeners() {
            slot.subscribe(&self.channel);
        }
        slot
    }

    fn release(&self, mut slot: Slot) -> Box<dyn Column> {
        slot.unsubscribe();
        for _ in 0..self.channel.depth() {
            slot.column.enable_notify();
        }
        slot.column
    }

    /// Appends a column and returns its index.
    ///
    /// # Errors
    ///
    /// Returns a duplicate column error if the name is taken.
    pub fn push(&mut self, column: Box<dyn Column>) -> Result<usize> {
        self.check_unique(column.name(), None)?;
        self.observe_extent();
        debug!(table = %self.id, column = column.name(), kind = %column.kind(), "column added");
        let slot = self.make_slot(column);
        self.slots.push(slot);
        self.structure_changed();
        Ok(self.slots.len() - 1)
    }

    /// Removes and returns the column at `index`.
    ///
    /// # Errors
    ///
    /// Returns a column not found error if `index` is out of range.
    pub fn remove(&mut self, index: usize) -> Result<Box<dyn Column>> {
        if index >= self.slots.len() {
            return Err(Error::column_not_found(format!("#{index}")));
        }
        self.observe_extent();
        let slot = self.slots.remove(index);
        debug!(table = %self.id, column = slot.column.name(), "column removed");
        let column = self.release(slot);
        self.observe_extent();
        self.structure_changed();
        Ok(column)
    }

    /// Replaces the column at `index`, returning the old one.
    ///
    /// # Errors
    ///
    /// Returns a column not found error if `index` is out of range, or a
    /// duplicate column error if another column has the new name.
    pub fn replace(&mut self, index: usize, column: Box<dyn Column>) -> Result<Box<dyn Column>> {
        if index >= self.slots.len() {
            return Err(Error::column_not_found(format!("#{index}")));
        }
        self.check_unique(column.name(), Some(index))?;
        debug!(table = %self.id, index, column = column.name(), "column replaced");
        self.observe_extent();
        let slot = self.make_slot(column);
        let old = std::mem::replace(&mut self.slots[index], slot);
        let old = self.release(old);
        self.observe_extent();
        self.structure_changed();
        Ok(old)
    }

    /// Clears every column, the item cache, metadata and client
    /// properties.
    pub fn clear(&mut self) {
        debug!(table = %self.id, "table cleared");
        self.release_stale_forwarders();
        for slot in &mut self.slots {
            slot.column.clear();
        }
        if let Some(items) = &mut self.items {
            items.clear();
        }
        self.metadata.clear();
        self.client_properties.clear();
        self.retire_rows();
        self.extent = 0;
        self.channel.publish(TableEvent::Structure);
    }

    /// Silently marks `row` undefined in every column and the item cache.
    pub(crate) fn forget_row(&mut self, row: RowId) {
        for slot in &mut self.slots {
            slot.column.forget_row(row);
        }
        if let Some(items) = &mut self.items {
            items.forget_row(row);
        }
    }

    /// Returns the handle for `row`, reusing the cached one if it is still
    /// at `generation`.
    pub(crate) fn item(&mut self, row: RowId, generation: u32) -> Item {
        let fresh = Item::new(self.id, row, generation);
        let Some(items) = &mut self.items else {
            return fresh;
        };
        if let Ok(Some(cached)) = items.get(row) {
            if cached.generation() == generation {
                return *cached;
            }
        }
        items.set_extend(row, fresh);
        fresh
    }

    pub(crate) fn publish(&mut self, event: TableEvent) {
        self.release_stale_forwarders();
        self.channel.publish(event);
    }

    /// Registers a table listener, subscribing to columns on the first one.
    pub fn add_listener(&mut self, listener: &Rc<dyn Listener<TableEvent>>) -> ListenerId {
        self.channel.prune();
        let id = self.channel.add_listener(listener);
        for slot in &mut self.slots {
            slot.subscribe(&self.channel);
        }
        id
    }

    /// Unregisters a table listener, dropping column subscriptions once
    /// none remain.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let removed = self.channel.remove_listener(id);
        self.release_stale_forwarders();
        removed
    }

    /// Returns true while any column forwards its events to the table.
    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.slots.iter().any(|slot| slot.subscription.is_some())
    }

    /// Opens a batch on the table and every column.
    pub fn disable_notify(&mut self) {
        self.channel.disable();
        for slot in &mut self.slots {
            slot.column.disable_notify();
        }
    }

    /// Closes a batch level. Columns flush into the table first, then the
    /// table delivers its queued events.
    pub fn enable_notify(&mut self) {
        for slot in &mut self.slots {
            slot.column.enable_notify();
        }
        self.channel.enable();
    }
}
