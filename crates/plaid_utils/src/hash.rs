//! Provide hash containers, re-exports *hashbrown* and *foldhash*.
//!
//! `FixedHashState` is based on `foldhash` with a fixed seed, so hash results
//! only depend on the input. `NoOpHashState` passes `u64` writes through,
//! which suits keys that are already well distributed such as `TypeId`.

use core::hash::{BuildHasher, Hasher};

use foldhash::fast::{FixedState, FoldHasher};

// -----------------------------------------------------------------------------
// FixedHasher

const FIXED_HASH_STATE: FixedState = FixedState::with_seed(0x5A17_D00D_93C4_E1B7);

/// A hasher whose results only depend on the input.
pub type FixedHasher = FoldHasher<'static>;

/// Hash state with a fixed seed, see [`FixedHasher`].
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FixedHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        FIXED_HASH_STATE.build_hasher()
    }
}

// -----------------------------------------------------------------------------
// NoOpHasher

/// A hasher that directly passes `u64` writes through.
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHasher {
    hash: u64,
}

impl Hasher for NoOpHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.hash
    }

    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes.iter().rev() {
            self.hash = self.hash.rotate_left(8).wrapping_add(*byte as u64);
        }
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.hash = i;
    }
}

/// Hash state producing [`NoOpHasher`]s.
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHashState;

impl BuildHasher for NoOpHashState {
    type Hasher = NoOpHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        NoOpHasher::default()
    }
}

// -----------------------------------------------------------------------------
// Aliases

/// A `hashbrown` map using [`FixedHashState`].
pub type HashMap<K, V> = hashbrown::HashMap<K, V, FixedHashState>;

/// A `hashbrown` set using [`FixedHashState`].
pub type HashSet<T> = hashbrown::HashSet<T, FixedHashState>;

// -----------------------------------------------------------------------------
// Re-export crates

pub use foldhash;
pub use hashbrown;

#[cfg(test)]
mod tests {
    use core::hash::{BuildHasher, Hash, Hasher};

    use super::{FixedHashState, HashMap, NoOpHashState};

    #[test]
    fn fixed_state_is_stable() {
        let hash = |v: &str| {
            let mut hasher = FixedHashState.build_hasher();
            v.hash(&mut hasher);
            hasher.finish()
        };
        assert_eq!(hash("member"), hash("member"));
        assert_ne!(hash("member"), hash("marker"));
    }

    #[test]
    fn noop_passes_u64() {
        let mut hasher = NoOpHashState.build_hasher();
        hasher.write_u64(42);
        assert_eq!(hasher.finish(), 42);
    }

    #[test]
    fn alias_map() {
        let mut map: HashMap<&str, i32> = HashMap::default();
        map.insert("a", 1);
        assert_eq!(map.get("a"), Some(&1));
    }
}
