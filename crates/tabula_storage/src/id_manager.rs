//! Row id allocation with a free list and per-id generations.
//!
//! The `IdManager` hands out the smallest free id first, so the id space
//! stays bounded by the historical high-water mark. Each id carries a
//! generation counter that advances whenever the id is freed, which lets
//! row handles detect that their row was removed or reused.

use im::OrdSet;
use tabula_foundation::{Error, Result, RowId};
use tracing::warn;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::iter::{Direction, RowIterator, RowRemover, Stamped};

/// Free-list allocator for row ids.
///
/// Allocated ids are `[0, max_id]` minus the free set. The free set is a
/// persistent ordered set, so iterators snapshot it in O(1).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IdManager {
    /// Highest id in the structural domain, `None` when empty.
    max_id: Option<RowId>,
    /// Ids inside `[0, max_id]` that are not allocated.
    free: OrdSet<RowId>,
    /// Generation counter per id, bumped on every free.
    generations: Vec<u32>,
    /// Whether freeing `max_id` pulls the high-water mark back down.
    shrink_trailing: bool,
    /// Structural modification stamp.
    stamp: u64,
}

impl Default for IdManager {
    fn default() -> Self {
        Self::new()
    }
}

impl IdManager {
    /// Creates an empty manager that shrinks on trailing frees.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_id: None,
            free: OrdSet::new(),
            generations: Vec::new(),
            shrink_trailing: true,
            stamp: 0,
        }
    }

    /// Creates an empty manager whose `max_id` never decreases.
    #[must_use]
    pub fn monotonic() -> Self {
        Self::new().with_shrink_trailing(false)
    }

    /// Sets the trailing-free policy.
    #[must_use]
    pub fn with_shrink_trailing(mut self, shrink: bool) -> Self {
        self.shrink_trailing = shrink;
        self
    }

    /// Creates a manager with ids `0..count` already allocated.
    #[must_use]
    pub fn with_allocated(count: usize) -> Self {
        let mut ids = Self::new();
        ids.preallocate(count);
        ids
    }

    /// Allocates ids `0..count` on an empty manager, reserving capacity.
    pub(crate) fn preallocate(&mut self, count: usize) {
        if count > 0 {
            self.max_id = Some(count - 1);
            self.generations.resize(count, 0);
            self.stamp += 1;
        }
    }

    /// Reserves generation storage for `additional` more ids.
    pub fn reserve(&mut self, additional: usize) {
        self.generations.reserve(additional);
    }

    /// Returns true if trailing frees shrink `max_id`.
    #[must_use]
    pub const fn shrinks_trailing(&self) -> bool {
        self.shrink_trailing
    }

    /// Allocates an id.
    ///
    /// Reuses the smallest free id when one exists, otherwise extends the
    /// domain by one.
    pub fn new_id(&mut self) -> RowId {
        self.stamp += 1;

        if let Some(&id) = self.free.get_min() {
            self.free.remove(&id);
            return id;
        }

        let id = self.max_id.map_or(0, |max| max + 1);
        self.max_id = Some(id);
        if self.generations.len() <= id {
            self.generations.resize(id + 1, 0);
        }
        id
    }

    /// Allocates a specific id.
    ///
    /// Ids skipped over when extending the domain are marked free.
    /// Returns false if `id` is already allocated.
    pub fn claim(&mut self, id: RowId) -> bool {
        match self.max_id {
            Some(max) if id <= max => {
                if self.free.remove(&id).is_none() {
                    return false;
                }
            }
            _ => {
                let start = self.max_id.map_or(0, |max| max + 1);
                for skipped in start..id {
                    self.free.insert(skipped);
                }
                self.max_id = Some(id);
                if self.generations.len() <= id {
                    self.generations.resize(id + 1, 0);
                }
            }
        }
        self.stamp += 1;
        true
    }

    /// Frees an id.
    ///
    /// Returns `Ok(false)` (and logs a warning) if the id was already free.
    ///
    /// # Errors
    ///
    /// Returns an invalid argument error if `id` lies beyond `max_id`.
    pub fn free(&mut self, id: RowId) -> Result<bool> {
        let max = match self.max_id {
            Some(max) if id <= max => max,
            _ => {
                return Err(Error::invalid_argument(format!(
                    "cannot free id {id}: highest id is {:?}",
                    self.max_id
                )));
            }
        };

        if self.free.contains(&id) {
            warn!(id, "id freed twice");
            return Ok(false);
        }

        self.stamp += 1;
        self.generations[id] = self.generations[id].wrapping_add(1);

        if id == max && self.shrink_trailing {
            self.shrink_from(id);
        } else {
            self.free.insert(id);
        }
        Ok(true)
    }

    /// Pulls `max_id` below `top` and past every free id beneath it.
    fn shrink_from(&mut self, mut top: RowId) {
        loop {
            if top == 0 {
                self.max_id = None;
                return;
            }
            top -= 1;
            if self.free.remove(&top).is_none() {
                self.max_id = Some(top);
                return;
            }
        }
    }

    /// Frees every id and resets the domain.
    ///
    /// Generations of previously allocated ids advance so outstanding
    /// handles become stale.
    pub fn clear(&mut self) {
        if let Some(max) = self.max_id {
            for id in 0..=max {
                if !self.free.contains(&id) {
                    self.generations[id] = self.generations[id].wrapping_add(1);
                }
            }
        }
        self.free.clear();
        self.max_id = None;
        self.stamp += 1;
    }

    /// Number of allocated ids.
    #[must_use]
    pub fn id_count(&self) -> usize {
        self.max_id.map_or(0, |max| max + 1) - self.free.len()
    }

    /// Number of free ids inside the domain.
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Returns true if no id is allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.id_count() == 0
    }

    /// Returns true if `id` is not allocated.
    #[must_use]
    pub fn is_free(&self, id: RowId) -> bool {
        match self.max_id {
            Some(max) => id > max || self.free.contains(&id),
            None => true,
        }
    }

    /// Returns true if `id` is allocated.
    #[must_use]
    pub fn is_allocated(&self, id: RowId) -> bool {
        !self.is_free(id)
    }

    /// Highest id of the domain. With a monotonic policy this id may be free.
    #[must_use]
    pub const fn max_id(&self) -> Option<RowId> {
        self.max_id
    }

    /// Lowest allocated id.
    #[must_use]
    pub fn min_id(&self) -> Option<RowId> {
        let max = self.max_id?;
        (0..=max).find(|id| !self.free.contains(id))
    }

    /// Highest allocated id.
    #[must_use]
    pub fn max_allocated_id(&self) -> Option<RowId> {
        let max = self.max_id?;
        (0..=max).rev().find(|id| !self.free.contains(id))
    }

    /// Generation counter for `id`, if the id was ever allocated.
    #[must_use]
    pub fn generation(&self, id: RowId) -> Option<u32> {
        self.generations.get(id).copied()
    }

    /// Returns true if `id` is allocated and still at `generation`.
    #[must_use]
    pub fn is_generation_current(&self, id: RowId, generation: u32) -> bool {
        self.is_allocated(id) && self.generation(id) == Some(generation)
    }

    /// Iterates allocated ids in ascending order.
    #[must_use]
    pub fn iter(&self) -> RowIterator {
        self.iter_directed(Direction::Ascending)
    }

    /// Iterates allocated ids in descending order.
    #[must_use]
    pub fn iter_rev(&self) -> RowIterator {
        self.iter_directed(Direction::Descending)
    }

    fn iter_directed(&self, direction: Direction) -> RowIterator {
        let end = self.max_id.map_or(0, |max| max + 1);
        RowIterator::allocated(self.free.clone(), end, direction).with_stamp(self.stamp)
    }
}

impl Stamped for IdManager {
    fn modification_stamp(&self) -> u64 {
        self.stamp
    }
}

impl RowRemover for IdManager {
    fn remove_row(&mut self, row: RowId) -> Result<()> {
        self.free(row).map(|_| ())
    }
}
