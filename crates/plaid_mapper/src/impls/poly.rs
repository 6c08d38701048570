use alloc::boxed::Box;
use core::any::TypeId;
use core::fmt;
use core::marker::PhantomData;

use crate::info::{GenericTypeInfoCell, PolyInfo, Type, TypeInfo, TypeKind};
use crate::reflection::impl_reflect_cast_fn;
use crate::{Blank, Reflect, ReflectMut, ReflectRef, Typed, upcast, upcast_mut};

/// A slot holding any value whose type is `B` or derives from `B`.
///
/// Derived types embed their base through `#[mapping(base)]`; a `Poly<B>`
/// holds the concrete value and projects it back onto `B` on demand.
/// Deserializing into a `Poly<B>` resolves the concrete type from the
/// discriminators present in the data.
///
/// ```
/// use plaid_mapper::derive::Mapped;
/// use plaid_mapper::impls::Poly;
///
/// #[derive(Mapped, Debug, PartialEq)]
/// struct Animal {
///     name: String,
/// }
///
/// #[derive(Mapped, Debug, PartialEq)]
/// struct Dog {
///     #[mapping(base)]
///     animal: Animal,
///     good: bool,
/// }
///
/// let pet = Poly::<Animal>::new(Dog {
///     animal: Animal { name: "Rex".into() },
///     good: true,
/// })
/// .unwrap();
///
/// assert_eq!(pet.base().map(|a| a.name.as_str()), Some("Rex"));
/// assert!(pet.downcast_ref::<Dog>().is_some_and(|d| d.good));
/// ```
pub struct Poly<B> {
    value: Box<dyn Reflect>,
    _base: PhantomData<fn() -> B>,
}

impl<B: Typed> Poly<B> {
    /// Places `value` in a slot, handing it back if it does not derive from `B`.
    pub fn new<T: Typed>(value: T) -> Result<Self, T> {
        if B::type_info().is_assignable_from(T::type_info()) {
            Ok(Self {
                value: Box::new(value),
                _base: PhantomData,
            })
        } else {
            Err(value)
        }
    }

    /// Like [`new`](Self::new) for an already boxed value.
    pub fn from_boxed(value: Box<dyn Reflect>) -> Result<Self, Box<dyn Reflect>> {
        if B::type_info().is_assignable_from(value.reflect_type_info()) {
            Ok(Self {
                value,
                _base: PhantomData,
            })
        } else {
            Err(value)
        }
    }

    /// The concrete value.
    #[inline]
    pub fn get(&self) -> &dyn Reflect {
        &*self.value
    }

    #[inline]
    pub fn get_mut(&mut self) -> &mut dyn Reflect {
        &mut *self.value
    }

    #[inline]
    pub fn into_inner(self) -> Box<dyn Reflect> {
        self.value
    }

    /// The info of the concrete value's type.
    #[inline]
    pub fn concrete_type_info(&self) -> &'static TypeInfo {
        self.value.reflect_type_info()
    }

    /// The base part of the concrete value.
    #[inline]
    pub fn base(&self) -> Option<&B> {
        upcast(&*self.value, TypeId::of::<B>())?.downcast_ref()
    }

    #[inline]
    pub fn base_mut(&mut self) -> Option<&mut B> {
        upcast_mut(&mut *self.value, TypeId::of::<B>())?.downcast_mut()
    }

    #[inline]
    pub fn is<T: Reflect>(&self) -> bool {
        self.value.is::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: Reflect>(&self) -> Option<&T> {
        self.value.downcast_ref()
    }

    #[inline]
    pub fn downcast_mut<T: Reflect>(&mut self) -> Option<&mut T> {
        self.value.downcast_mut()
    }
}

impl<B> fmt::Debug for Poly<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Poly").field(&self.value).finish()
    }
}

fn wrap<B: Typed + Blank>(value: Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>> {
    Poly::<B>::from_boxed(value).map(|poly| Box::new(poly) as Box<dyn Reflect>)
}

impl<B: Typed + Blank> Typed for Poly<B> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::new(
                Type::of::<Self>(),
                TypeKind::Polymorphic(PolyInfo::new(B::type_info, wrap::<B>)),
            )
            .with_blank(|| Box::new(<Poly<B> as Blank>::blank()))
        })
    }
}

impl<B: Typed + Blank> Reflect for Poly<B> {
    #[inline]
    fn reflect_type_info(&self) -> &'static TypeInfo {
        <Self as Typed>::type_info()
    }

    impl_reflect_cast_fn!();

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Polymorphic(&*self.value)
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Opaque(self)
    }
}

impl<B: Typed + Blank> Blank for Poly<B> {
    /// A slot holding a blank `B`.
    #[inline]
    fn blank() -> Self {
        Self {
            value: Box::new(B::blank()),
            _base: PhantomData,
        }
    }
}
