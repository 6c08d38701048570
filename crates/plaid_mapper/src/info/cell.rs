use alloc::boxed::Box;
use core::any::{Any, TypeId};
use std::sync::{OnceLock, PoisonError, RwLock};

use plaid_utils::TypeIdMap;

use crate::info::TypeInfo;

/// Lazily initialized storage for the [`TypeInfo`] of a non-generic type.
///
/// ```
/// use plaid_mapper::info::{NonGenericTypeInfoCell, Type, TypeInfo, TypeKind};
///
/// static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
/// let info = CELL.get_or_init(|| TypeInfo::new(Type::of::<u8>(), TypeKind::Plain));
/// assert!(core::ptr::eq(info, CELL.get_or_init(|| unreachable!())));
/// ```
pub struct NonGenericTypeInfoCell(OnceLock<TypeInfo>);

impl NonGenericTypeInfoCell {
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    #[inline]
    pub fn get_or_init(&'static self, f: impl FnOnce() -> TypeInfo) -> &'static TypeInfo {
        self.0.get_or_init(f)
    }
}

/// Storage for the [`TypeInfo`]s of every instantiation of a generic type.
///
/// A single `static` inside a generic function is shared by all
/// instantiations, so infos are keyed by the [`TypeId`] of `T`.
pub struct GenericTypeInfoCell(RwLock<TypeIdMap<&'static TypeInfo>>);

impl GenericTypeInfoCell {
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(TypeIdMap::new()))
    }

    /// Returns the info of `T`, building and leaking it on first access.
    ///
    /// `f` runs without the lock held.
    pub fn get_or_insert<T: Any + ?Sized>(&'static self, f: impl FnOnce() -> TypeInfo) -> &'static TypeInfo {
        let type_id = TypeId::of::<T>();
        if let Some(info) = self
            .0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
        {
            return *info;
        }

        let info = f();
        let mut map = self.0.write().unwrap_or_else(PoisonError::into_inner);
        *map.get_or_insert(type_id, || &*Box::leak(Box::new(info)))
    }
}
