//! Configuration for tables and their row-id domains.

use crate::id_manager::IdManager;

/// Configuration shared by [`BasicTable`](crate::table::BasicTable) and
/// [`DynamicTable`](crate::table::DynamicTable).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    /// Whether `item(row)` handles are cached in an internal `#items` column.
    pub cache_items: bool,

    /// Whether freeing the highest id pulls the id high-water mark back down.
    pub shrink_trailing_ids: bool,

    /// Rows to reserve up front in new id managers and item caches.
    pub initial_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            cache_items: true,
            shrink_trailing_ids: true,
            initial_capacity: 0,
        }
    }
}

impl StoreConfig {
    /// Creates a configuration with no item cache.
    #[must_use]
    pub fn compact() -> Self {
        Self {
            cache_items: false,
            ..Self::default()
        }
    }

    /// Creates a configuration whose id high-water mark never decreases.
    #[must_use]
    pub fn monotonic() -> Self {
        Self {
            shrink_trailing_ids: false,
            ..Self::default()
        }
    }

    /// Builder method to enable/disable the item cache.
    #[must_use]
    pub fn with_cache_items(mut self, cache: bool) -> Self {
        self.cache_items = cache;
        self
    }

    /// Builder method to set the trailing-id policy.
    #[must_use]
    pub fn with_shrink_trailing_ids(mut self, shrink: bool) -> Self {
        self.shrink_trailing_ids = shrink;
        self
    }

    /// Builder method to set the initial capacity.
    #[must_use]
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Builds an empty id manager following this configuration.
    #[must_use]
    pub fn id_manager(&self) -> IdManager {
        let mut ids = IdManager::new().with_shrink_trailing(self.shrink_trailing_ids);
        ids.reserve(self.initial_capacity);
        ids
    }
}
