use alloc::boxed::Box;

use crate::Reflect;

/// Type info of a fieldless enum, mapped by variant name.
pub struct EnumInfo {
    variants: &'static [&'static str],
    index_of: fn(&dyn Reflect) -> Option<usize>,
    from_index: fn(usize) -> Option<Box<dyn Reflect>>,
}

impl EnumInfo {
    #[inline]
    pub const fn new(
        variants: &'static [&'static str],
        index_of: fn(&dyn Reflect) -> Option<usize>,
        from_index: fn(usize) -> Option<Box<dyn Reflect>>,
    ) -> Self {
        Self {
            variants,
            index_of,
            from_index,
        }
    }

    /// Mapped variant names in declaration order.
    #[inline]
    pub const fn variants(&self) -> &'static [&'static str] {
        self.variants
    }

    /// The mapped name of the variant `value` holds.
    pub fn name_of(&self, value: &dyn Reflect) -> Option<&'static str> {
        (self.index_of)(value).and_then(|index| self.variants.get(index).copied())
    }

    #[inline]
    pub fn from_index(&self, index: usize) -> Option<Box<dyn Reflect>> {
        (self.from_index)(index)
    }

    /// Instantiates the variant mapped as `name`.
    pub fn from_name(&self, name: &str) -> Option<Box<dyn Reflect>> {
        let index = self.variants.iter().position(|v| *v == name)?;
        self.from_index(index)
    }
}
