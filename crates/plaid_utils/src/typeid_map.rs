use core::any::TypeId;
use core::fmt;

use hashbrown::HashMap;

use crate::hash::NoOpHashState;

/// A map keyed by [`TypeId`].
///
/// A `TypeId` is already a hash, so keys go through [`NoOpHashState`]
/// instead of being hashed again. `new` is `const`, which lets the map sit
/// in statics and constant marker tables.
///
/// ```
/// use plaid_utils::TypeIdMap;
///
/// let mut map = TypeIdMap::new();
/// map.insert_type::<u8>("byte");
/// assert_eq!(map.get_type::<u8>(), Some(&"byte"));
/// assert!(!map.contains_type::<u16>());
/// ```
pub struct TypeIdMap<V>(HashMap<TypeId, V, NoOpHashState>);

impl<V> TypeIdMap<V> {
    #[inline]
    pub const fn new() -> Self {
        Self(HashMap::with_hasher(NoOpHashState))
    }

    #[inline]
    pub fn get(&self, type_id: &TypeId) -> Option<&V> {
        self.0.get(type_id)
    }

    #[inline]
    pub fn get_type<T: ?Sized + 'static>(&self) -> Option<&V> {
        self.get(&TypeId::of::<T>())
    }

    /// Returns the value for `type_id`; `f` only runs when it is absent.
    pub fn get_or_insert(&mut self, type_id: TypeId, f: impl FnOnce() -> V) -> &mut V {
        self.0.entry(type_id).or_insert_with(f)
    }

    /// Returns the replaced value, if any.
    #[inline]
    pub fn insert(&mut self, type_id: TypeId, value: V) -> Option<V> {
        self.0.insert(type_id, value)
    }

    #[inline]
    pub fn insert_type<T: ?Sized + 'static>(&mut self, value: V) -> Option<V> {
        self.insert(TypeId::of::<T>(), value)
    }

    #[inline]
    pub fn contains(&self, type_id: &TypeId) -> bool {
        self.0.contains_key(type_id)
    }

    #[inline]
    pub fn contains_type<T: ?Sized + 'static>(&self) -> bool {
        self.contains(&TypeId::of::<T>())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Values in arbitrary order.
    #[inline]
    pub fn values(&self) -> impl ExactSizeIterator<Item = &V> {
        self.0.values()
    }
}

impl<V> Default for TypeIdMap<V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for TypeIdMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use core::any::TypeId;

    use super::TypeIdMap;

    #[test]
    fn get_or_insert_keeps_the_first_value() {
        let mut map = TypeIdMap::new();
        *map.get_or_insert(TypeId::of::<u8>(), || 10) += 1;
        map.get_or_insert(TypeId::of::<u8>(), || unreachable!());
        assert_eq!(map.get_type::<u8>(), Some(&11));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn replaced_values_are_returned() {
        let mut map = TypeIdMap::new();
        assert_eq!(map.insert_type::<str>('a'), None);
        assert_eq!(map.insert_type::<str>('b'), Some('a'));
        assert!(map.contains(&TypeId::of::<str>()));
        assert_eq!(map.values().copied().collect::<Vec<_>>(), ['b']);
    }
}
