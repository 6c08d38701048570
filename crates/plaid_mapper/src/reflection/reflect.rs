use alloc::boxed::Box;
use core::any::{Any, TypeId};

use crate::info::TypeInfo;
use crate::{ReflectMut, ReflectRef};

/// A dynamically inspectable value.
///
/// Implemented by `#[derive(Mapped)]` and by the built-in scalars,
/// collections and [`Value`](crate::Value). The casting methods exist so
/// that `dyn Reflect` can be turned back into `dyn Any` without upcasting.
pub trait Reflect: Any + Send + Sync {
    /// The static descriptor of the value's concrete type.
    fn reflect_type_info(&self) -> &'static TypeInfo;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    fn as_reflect(&self) -> &dyn Reflect;

    fn as_reflect_mut(&mut self) -> &mut dyn Reflect;

    fn into_reflect(self: Box<Self>) -> Box<dyn Reflect>;

    /// Replaces `self` with `value`, handing it back if the types differ.
    fn assign(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;

    /// A borrowed, kind-specific view of the value.
    fn reflect_ref(&self) -> ReflectRef<'_>;

    /// A mutable, kind-specific view of the value.
    fn reflect_mut(&mut self) -> ReflectMut<'_>;
}

/// Types with a statically known [`TypeInfo`].
pub trait Typed: Reflect + Sized {
    fn type_info() -> &'static TypeInfo;
}

/// Construction of an instance without running user initialization.
///
/// Derived types fill every mapped field with its own blank and every
/// skipped field with [`Default`]. A user `Default` impl is never called.
pub trait Blank: Sized {
    fn blank() -> Self;
}

impl dyn Reflect {
    /// Returns `true` if the concrete type is `T`.
    #[inline]
    pub fn is<T: Reflect>(&self) -> bool {
        self.as_any().type_id() == TypeId::of::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: Reflect>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    #[inline]
    pub fn downcast_mut<T: Reflect>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut()
    }

    /// Downcasts a boxed value, handing it back on mismatch.
    pub fn downcast<T: Reflect>(self: Box<Self>) -> Result<Box<T>, Box<dyn Reflect>> {
        if self.is::<T>() {
            match self.into_any().downcast::<T>() {
                Ok(value) => Ok(value),
                // `is` already checked the type id.
                Err(_) => unreachable!(),
            }
        } else {
            Err(self)
        }
    }

    /// Unboxes a value of type `T`, handing it back on mismatch.
    #[inline]
    pub fn take<T: Reflect>(self: Box<Self>) -> Result<T, Box<dyn Reflect>> {
        self.downcast::<T>().map(|value| *value)
    }

    /// The path of the concrete type, for diagnostics.
    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.reflect_type_info().type_path()
    }
}

impl core::fmt::Debug for dyn Reflect {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "dyn Reflect<{}>", self.type_path())
    }
}

/// Projects `value` onto the sub-object of its hierarchy whose type is `target`.
///
/// Walks the chain of base members: a value of a derived type contains its
/// base as an embedded field, and so on up to the root. Returns `None` if
/// `target` is not an ancestor (or the type itself).
pub fn upcast(mut value: &dyn Reflect, target: TypeId) -> Option<&dyn Reflect> {
    loop {
        let info = value.reflect_type_info();
        if info.type_id() == target {
            return Some(value);
        }
        let base = info.as_object()?.base()?;
        value = base.get(value)?;
    }
}

/// Mutable version of [`upcast`].
pub fn upcast_mut(mut value: &mut dyn Reflect, target: TypeId) -> Option<&mut dyn Reflect> {
    loop {
        let info = value.reflect_type_info();
        if info.type_id() == target {
            return Some(value);
        }
        let base = info.as_object()?.base()?;
        value = base.get_mut(value)?;
    }
}

/// Implements the casting methods of [`Reflect`].
macro_rules! impl_reflect_cast_fn {
    () => {
        #[inline]
        fn as_any(&self) -> &dyn ::core::any::Any {
            self
        }

        #[inline]
        fn as_any_mut(&mut self) -> &mut dyn ::core::any::Any {
            self
        }

        #[inline]
        fn into_any(self: ::alloc::boxed::Box<Self>) -> ::alloc::boxed::Box<dyn ::core::any::Any> {
            self
        }

        #[inline]
        fn as_reflect(&self) -> &dyn $crate::Reflect {
            self
        }

        #[inline]
        fn as_reflect_mut(&mut self) -> &mut dyn $crate::Reflect {
            self
        }

        #[inline]
        fn into_reflect(self: ::alloc::boxed::Box<Self>) -> ::alloc::boxed::Box<dyn $crate::Reflect> {
            self
        }

        fn assign(
            &mut self,
            value: ::alloc::boxed::Box<dyn $crate::Reflect>,
        ) -> Result<(), ::alloc::boxed::Box<dyn $crate::Reflect>> {
            *self = value.take::<Self>()?;
            Ok(())
        }
    };
}

pub(crate) use impl_reflect_cast_fn;
