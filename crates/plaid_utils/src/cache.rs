use core::fmt::Debug;
use core::hash::Hash;

use dashmap::DashMap;

use crate::hash::FixedHashState;

/// A read-through cache shared between threads.
///
/// Values are computed outside of any lock. When two callers race on the
/// same missing key both compute, the first stored value wins and the other
/// result is dropped, so every caller observes the same value afterwards.
///
/// # Examples
///
/// ```
/// use plaid_utils::ConcurrentCache;
///
/// let cache: ConcurrentCache<u32, String> = ConcurrentCache::new();
/// let a = cache.get_or_compute(1, || String::from("one"));
/// let b = cache.get_or_compute(1, || String::from("uno"));
/// assert_eq!(a, "one");
/// assert_eq!(b, "one");
/// ```
pub struct ConcurrentCache<K, V> {
    map: DashMap<K, V, FixedHashState>,
}

impl<K: Eq + Hash, V: Clone> ConcurrentCache<K, V> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            map: DashMap::with_hasher(FixedHashState),
        }
    }

    /// Returns a clone of the cached value, if present.
    #[inline]
    pub fn get(&self, key: &K) -> Option<V> {
        self.map.get(key).map(|v| v.value().clone())
    }

    /// Returns the cached value, computing and storing it first if absent.
    ///
    /// `f` runs without holding a shard lock, so it may itself read the cache.
    pub fn get_or_compute(&self, key: K, f: impl FnOnce() -> V) -> V {
        if let Some(v) = self.get(&key) {
            return v;
        }
        let computed = f();
        self.map.entry(key).or_insert(computed).value().clone()
    }

    /// Returns the number of cached entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if nothing is cached.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Drops every cached entry.
    pub fn clear(&self) {
        self.map.clear();
    }
}

impl<K: Eq + Hash, V: Clone> Default for ConcurrentCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash + Debug, V: Debug> Debug for ConcurrentCache<K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ConcurrentCache")
            .field("len", &self.map.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;
    use core::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    use super::ConcurrentCache;

    #[test]
    fn first_value_wins() {
        let cache = ConcurrentCache::new();
        assert_eq!(cache.get_or_compute("k", || 1), 1);
        assert_eq!(cache.get_or_compute("k", || 2), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn racing_threads_agree() {
        let cache = Arc::new(ConcurrentCache::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                let calls = Arc::clone(&calls);
                thread::spawn(move || {
                    cache.get_or_compute(0_u32, || {
                        calls.fetch_add(1, Ordering::Relaxed);
                        i
                    })
                })
            })
            .collect();

        let results: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(results.windows(2).all(|w| w[0] == w[1]));
        assert!(calls.load(Ordering::Relaxed) >= 1);
        assert_eq!(cache.len(), 1);
    }
}
