use crate::core::geo::TileCoord;
use fxhash::FxHashMap;
use std::sync::Arc;

/// Lifecycle of one cached tile resource
#[derive(Debug, Clone)]
pub enum TileState {
    /// Fetch issued, resource not yet available; the tile is simply not
    /// drawn until it resolves
    Loading,
    /// Resource ready to draw
    Ready(Arc<Vec<u8>>),
    /// Fetch failed; the tile stays undrawn and is never refetched
    Failed,
}

/// Unbounded store mapping tile coordinates to their resources.
///
/// A coordinate is inserted as `Loading` the moment its fetch is issued so
/// concurrent frames never duplicate a request. All access happens on the
/// render tick's thread; completed fetches are written back through the
/// loader's channel, so no locking is needed.
#[derive(Debug, Default)]
pub struct TileCache {
    entries: FxHashMap<TileCoord, TileState>,
}

impl TileCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, coord: &TileCoord) -> Option<&TileState> {
        self.entries.get(coord)
    }

    /// The resource for `coord` if its fetch has resolved
    pub fn ready(&self, coord: &TileCoord) -> Option<Arc<Vec<u8>>> {
        match self.entries.get(coord) {
            Some(TileState::Ready(data)) => Some(Arc::clone(data)),
            _ => None,
        }
    }

    pub fn contains(&self, coord: &TileCoord) -> bool {
        self.entries.contains_key(coord)
    }

    /// Records that a fetch for `coord` has been issued. Returns `false` if
    /// the coordinate was already known, in which case the caller must not
    /// issue another fetch.
    pub fn mark_loading(&mut self, coord: TileCoord) -> bool {
        match self.entries.entry(coord) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(entry) => {
                entry.insert(TileState::Loading);
                true
            }
        }
    }

    pub fn put(&mut self, coord: TileCoord, data: Arc<Vec<u8>>) {
        self.entries.insert(coord, TileState::Ready(data));
    }

    pub fn mark_failed(&mut self, coord: TileCoord) {
        self.entries.insert(coord, TileState::Failed);
    }

    /// Releases every held resource and empties the store. Idempotent.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let mut cache = TileCache::new();
        let coord = TileCoord::new(1, 2, -3);

        assert!(cache.is_empty());
        assert!(cache.get(&coord).is_none());

        cache.put(coord, Arc::new(vec![1, 2, 3]));
        assert_eq!(cache.len(), 1);
        assert_eq!(*cache.ready(&coord).unwrap(), vec![1, 2, 3]);

        cache.clear();
        assert!(cache.is_empty());
        // Clearing twice is fine
        cache.clear();
    }

    #[test]
    fn test_mark_loading_deduplicates_fetches() {
        let mut cache = TileCache::new();
        let coord = TileCoord::new(0, 0, 0);

        assert!(cache.mark_loading(coord));
        // A second frame asking before the fetch resolves issues nothing
        assert!(!cache.mark_loading(coord));
        assert!(cache.ready(&coord).is_none());

        cache.put(coord, Arc::new(vec![7]));
        assert!(!cache.mark_loading(coord));
        assert!(cache.ready(&coord).is_some());
    }

    #[test]
    fn test_failed_tiles_stay_undrawn() {
        let mut cache = TileCache::new();
        let coord = TileCoord::new(4, 4, -1);

        cache.mark_loading(coord);
        cache.mark_failed(coord);

        assert!(cache.ready(&coord).is_none());
        assert!(matches!(cache.get(&coord), Some(TileState::Failed)));
        // Failure is sticky: no new fetch is issued
        assert!(!cache.mark_loading(coord));
    }
}
