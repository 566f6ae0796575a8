//! Thread-safe HAMT map.

use archery::ArcK;

use crate::map::HamtMap;

/// Persistent HAMT map backed by atomically reference-counted nodes.
///
/// Identical API to [`HamtMap`]; `Send + Sync` when `K` and `V` are. Versions
/// can be handed to other threads and read concurrently without locking.
pub type HamtMapSync<K, V> = HamtMap<K, V, ArcK>;

impl<K, V> HamtMapSync<K, V> {
    /// Creates an empty thread-safe map.
    #[must_use]
    pub const fn new_sync() -> Self {
        Self::new_with_ptr_kind()
    }
}
