use alloc::boxed::Box;
use core::any::{Any, TypeId};

use crate::info::markers::{Marker, Markers};
use crate::info::{Type, TypeInfo};
use crate::{Reflect, Typed};

type Getter = fn(&dyn Reflect) -> Option<&dyn Reflect>;
type GetterMut = fn(&mut dyn Reflect) -> Option<&mut dyn Reflect>;
type Setter = fn(&mut dyn Reflect, Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;

/// A mapped data member of an object.
///
/// Accessors take the declaring type's instance, so callers acting on a
/// derived value first project it with [`upcast`](crate::upcast). A member
/// without an accessor is still listed; the processors warn and substitute
/// a type default when they need the missing direction.
pub struct MemberInfo {
    name: &'static str,
    declaring: Type,
    ty: fn() -> &'static TypeInfo,
    markers: Markers,
    getter: Option<Getter>,
    getter_mut: Option<GetterMut>,
    setter: Option<Setter>,
}

impl MemberInfo {
    /// A member named `name` of type `T`, declared on `Owner`.
    #[inline]
    pub fn new<Owner: Any, T: Typed>(name: &'static str) -> Self {
        Self {
            name,
            declaring: Type::of::<Owner>(),
            ty: T::type_info,
            markers: Markers::new(),
            getter: None,
            getter_mut: None,
            setter: None,
        }
    }

    #[inline]
    pub fn with_marker<M: Marker>(mut self, marker: M) -> Self {
        self.markers.insert(marker);
        self
    }

    #[inline]
    pub fn with_getter(mut self, getter: Getter) -> Self {
        self.getter = Some(getter);
        self
    }

    #[inline]
    pub fn with_getter_mut(mut self, getter: GetterMut) -> Self {
        self.getter_mut = Some(getter);
        self
    }

    #[inline]
    pub fn with_setter(mut self, setter: Setter) -> Self {
        self.setter = Some(setter);
        self
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The type that declares the member.
    #[inline]
    pub const fn declaring(&self) -> &Type {
        &self.declaring
    }

    #[inline]
    pub const fn declaring_id(&self) -> TypeId {
        self.declaring.id()
    }

    /// The info of the member's own type.
    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        (self.ty)()
    }

    #[inline]
    pub const fn markers(&self) -> &Markers {
        &self.markers
    }

    #[inline]
    pub fn marker<M: Marker>(&self) -> Option<&M> {
        self.markers.get::<M>()
    }

    #[inline]
    pub const fn is_readable(&self) -> bool {
        self.getter.is_some()
    }

    #[inline]
    pub const fn is_writable(&self) -> bool {
        self.setter.is_some()
    }

    /// Reads the member from an instance of the declaring type.
    #[inline]
    pub fn get<'a>(&self, owner: &'a dyn Reflect) -> Option<&'a dyn Reflect> {
        (self.getter?)(owner)
    }

    #[inline]
    pub fn get_mut<'a>(&self, owner: &'a mut dyn Reflect) -> Option<&'a mut dyn Reflect> {
        (self.getter_mut?)(owner)
    }

    /// Writes the member on an instance of the declaring type.
    ///
    /// Hands the value back if the member is read-only or the value has the
    /// wrong type.
    pub fn set(&self, owner: &mut dyn Reflect, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        match self.setter {
            Some(setter) => setter(owner, value),
            None => Err(value),
        }
    }
}

impl core::fmt::Debug for MemberInfo {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MemberInfo")
            .field("name", &self.name)
            .field("declaring", &self.declaring)
            .field("markers", &self.markers)
            .finish_non_exhaustive()
    }
}
