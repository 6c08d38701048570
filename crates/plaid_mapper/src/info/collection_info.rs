use alloc::boxed::Box;
use core::any::TypeId;

use crate::info::TypeInfo;
use crate::{Reflect, Value};

/// Growth policy of a reflected sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backing {
    /// Grows on insertion past the end.
    Growable,
    /// Has exactly this many slots.
    Fixed(usize),
    /// Rejects every insertion, e.g. `Arc<[T]>`.
    ReadOnly,
}

/// What a collection accepts as elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementConstraint {
    /// Elements must convert to the element type.
    Typed,
    /// Elements are plain [`Value`]s and anything is accepted.
    Unconstrained,
}

fn constraint_of(item: &TypeInfo) -> ElementConstraint {
    if item.type_id() == TypeId::of::<Value>() {
        ElementConstraint::Unconstrained
    } else {
        ElementConstraint::Typed
    }
}

/// Type info of a sequence (`Vec`, `VecDeque`, arrays, `Arc<[T]>`).
pub struct ListInfo {
    item: fn() -> &'static TypeInfo,
    backing: Backing,
}

impl ListInfo {
    #[inline]
    pub const fn new(item: fn() -> &'static TypeInfo, backing: Backing) -> Self {
        Self { item, backing }
    }

    #[inline]
    pub fn item(&self) -> &'static TypeInfo {
        (self.item)()
    }

    #[inline]
    pub const fn backing(&self) -> Backing {
        self.backing
    }

    #[inline]
    pub fn constraint(&self) -> ElementConstraint {
        constraint_of(self.item())
    }
}

/// Type info of a keyed mapping (`HashMap`, `BTreeMap`, `IndexMap`).
pub struct MapInfo {
    key: fn() -> &'static TypeInfo,
    value: fn() -> &'static TypeInfo,
}

impl MapInfo {
    #[inline]
    pub const fn new(key: fn() -> &'static TypeInfo, value: fn() -> &'static TypeInfo) -> Self {
        Self { key, value }
    }

    #[inline]
    pub fn key(&self) -> &'static TypeInfo {
        (self.key)()
    }

    #[inline]
    pub fn value(&self) -> &'static TypeInfo {
        (self.value)()
    }

    #[inline]
    pub fn constraint(&self) -> ElementConstraint {
        constraint_of(self.value())
    }
}

/// Type info of `Option<T>`.
pub struct OptionalInfo {
    some: fn() -> &'static TypeInfo,
    wrap: fn(Option<Box<dyn Reflect>>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>>,
}

impl OptionalInfo {
    #[inline]
    pub const fn new(
        some: fn() -> &'static TypeInfo,
        wrap: fn(Option<Box<dyn Reflect>>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>>,
    ) -> Self {
        Self { some, wrap }
    }

    /// The info of the wrapped type.
    #[inline]
    pub fn some(&self) -> &'static TypeInfo {
        (self.some)()
    }

    /// Builds the option from an optional inner value of the wrapped type.
    #[inline]
    pub fn wrap(&self, inner: Option<Box<dyn Reflect>>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>> {
        (self.wrap)(inner)
    }
}

/// Type info of a polymorphic slot, [`Poly<B>`](crate::impls::Poly).
pub struct PolyInfo {
    base: fn() -> &'static TypeInfo,
    wrap: fn(Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>>,
}

impl PolyInfo {
    #[inline]
    pub const fn new(
        base: fn() -> &'static TypeInfo,
        wrap: fn(Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>>,
    ) -> Self {
        Self { base, wrap }
    }

    /// The most general type the slot accepts.
    #[inline]
    pub fn base(&self) -> &'static TypeInfo {
        (self.base)()
    }

    /// Places a concrete value in a new slot, handing it back if it is not
    /// assignable to the base.
    #[inline]
    pub fn wrap(&self, value: Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>> {
        (self.wrap)(value)
    }
}
