use alloc::boxed::Box;

use crate::Reflect;

/// Index-based access to a reflected sequence.
///
/// Element type checks happen here; growth policy (fixed, growable) is
/// described by the collection's `ListInfo` and enforced by
/// [`collections`](crate::collections).
pub trait List: Reflect {
    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, index: usize) -> Option<&dyn Reflect>;

    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect>;

    /// Replaces the element at `index < len`.
    ///
    /// Hands the value back if the index is out of range or its type does
    /// not match the element type.
    fn set(&mut self, index: usize, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;

    /// Appends an element. Fixed-size sequences always hand the value back.
    fn push(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;

    /// Removes all elements. Fixed-size sequences keep their length.
    fn clear(&mut self);

    fn iter(&self) -> ListIter<'_>;
}

/// Iterator over the elements of a [`List`].
pub struct ListIter<'a> {
    list: &'a dyn List,
    index: usize,
}

impl<'a> ListIter<'a> {
    #[inline]
    pub fn new(list: &'a dyn List) -> Self {
        Self { list, index: 0 }
    }
}

impl<'a> Iterator for ListIter<'a> {
    type Item = &'a dyn Reflect;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.list.get(self.index)?;
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.list.len().saturating_sub(self.index);
        (rest, Some(rest))
    }
}

/// Key-based access to a reflected mapping.
pub trait Map: Reflect {
    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries in the mapping's own iteration order.
    fn iter(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_>;

    /// Inserts an entry, replacing an existing value for the same key.
    ///
    /// Hands both parts back if either has the wrong type.
    fn insert(
        &mut self,
        key: Box<dyn Reflect>,
        value: Box<dyn Reflect>,
    ) -> Result<(), (Box<dyn Reflect>, Box<dyn Reflect>)>;

    fn clear(&mut self);
}
