use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::fmt;

use crate::Reflect;
use crate::info::{EnumInfo, ListInfo, MapInfo, ObjectInfo, OptionalInfo, PolyInfo, ScalarInfo};

// -----------------------------------------------------------------------------
// Type

/// Identity of a reflected type: its [`TypeId`], full path and short name.
#[derive(Clone, Copy)]
pub struct Type {
    id: TypeId,
    path: &'static str,
    name: &'static str,
}

impl Type {
    /// Describes `T`, taking the short name from the last path segment.
    pub fn of<T: Any + ?Sized>() -> Self {
        let path = core::any::type_name::<T>();
        Self {
            id: TypeId::of::<T>(),
            path,
            name: short_name(path),
        }
    }

    #[inline]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// The full path, e.g. `my_crate::pets::Dog`.
    #[inline]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    /// The short name, e.g. `Dog` or `Vec<i32>`.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn is<T: Any + ?Sized>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

fn short_name(path: &'static str) -> &'static str {
    let head = path.find('<').unwrap_or(path.len());
    match path[..head].rfind("::") {
        Some(pos) => &path[pos + 2..],
        None => path,
    }
}

impl PartialEq for Type {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Type {}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}

// -----------------------------------------------------------------------------
// TypeKind

/// Kind-specific part of a [`TypeInfo`].
pub enum TypeKind {
    Scalar(ScalarInfo),
    Enum(EnumInfo),
    Object(ObjectInfo),
    Sequence(ListInfo),
    Lookup(MapInfo),
    Optional(OptionalInfo),
    Polymorphic(PolyInfo),
    /// [`Value`](crate::Value) itself: anything goes.
    Plain,
}

impl TypeKind {
    pub const fn name(&self) -> &'static str {
        match self {
            TypeKind::Scalar(_) => "scalar",
            TypeKind::Enum(_) => "enum",
            TypeKind::Object(_) => "object",
            TypeKind::Sequence(_) => "sequence",
            TypeKind::Lookup(_) => "lookup",
            TypeKind::Optional(_) => "optional",
            TypeKind::Polymorphic(_) => "polymorphic",
            TypeKind::Plain => "plain",
        }
    }
}

// -----------------------------------------------------------------------------
// TypeInfo

/// Compile-time information about a reflected type.
///
/// Obtained through [`Typed::type_info`](crate::Typed::type_info) or
/// [`Reflect::reflect_type_info`]. Infos are leaked and live for the rest of
/// the program, which lets members and caches hold `&'static` references.
pub struct TypeInfo {
    ty: Type,
    kind: TypeKind,
    blank: Option<fn() -> Box<dyn Reflect>>,
}

macro_rules! impl_cast_method {
    ($name:ident : $kind:ident => $info:ident) => {
        /// Returns the kind-specific info if the type has that kind.
        #[inline]
        pub const fn $name(&self) -> Option<&$info> {
            match &self.kind {
                TypeKind::$kind(info) => Some(info),
                _ => None,
            }
        }
    };
}

impl TypeInfo {
    #[inline]
    pub const fn new(ty: Type, kind: TypeKind) -> Self {
        Self {
            ty,
            kind,
            blank: None,
        }
    }

    /// Makes the type instantiable through `blank`.
    #[inline]
    pub fn with_blank(mut self, blank: fn() -> Box<dyn Reflect>) -> Self {
        self.blank = Some(blank);
        self
    }

    impl_cast_method!(as_scalar: Scalar => ScalarInfo);
    impl_cast_method!(as_enum: Enum => EnumInfo);
    impl_cast_method!(as_object: Object => ObjectInfo);
    impl_cast_method!(as_list: Sequence => ListInfo);
    impl_cast_method!(as_map: Lookup => MapInfo);
    impl_cast_method!(as_optional: Optional => OptionalInfo);
    impl_cast_method!(as_poly: Polymorphic => PolyInfo);

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub const fn type_id(&self) -> TypeId {
        self.ty.id
    }

    #[inline]
    pub const fn type_path(&self) -> &'static str {
        self.ty.path
    }

    #[inline]
    pub const fn type_name(&self) -> &'static str {
        self.ty.name
    }

    #[inline]
    pub const fn kind(&self) -> &TypeKind {
        &self.kind
    }

    #[inline]
    pub const fn is_plain(&self) -> bool {
        matches!(self.kind, TypeKind::Plain)
    }

    /// Returns `true` if [`blank`](Self::blank) can allocate an instance.
    #[inline]
    pub const fn is_instantiable(&self) -> bool {
        self.blank.is_some()
    }

    /// Allocates an instance without running user initialization.
    #[inline]
    pub fn blank(&self) -> Option<Box<dyn Reflect>> {
        self.blank.map(|f| f())
    }

    /// The embedded base type of an object, if any.
    #[inline]
    pub fn base(&self) -> Option<&'static TypeInfo> {
        self.as_object()?.base().map(|link| link.info())
    }

    /// This type followed by its base, the base's base and so on.
    #[inline]
    pub fn ancestors(&'static self) -> Ancestors {
        Ancestors { next: Some(self) }
    }

    /// The topmost ancestor.
    pub fn root(&'static self) -> &'static TypeInfo {
        let mut root = self;
        while let Some(base) = root.base() {
            root = base;
        }
        root
    }

    /// Returns `true` if a value of type `other` can stand in for this type,
    /// i.e. this type is `other` or one of its ancestors.
    pub fn is_assignable_from(&self, other: &'static TypeInfo) -> bool {
        other.ancestors().any(|info| info.type_id() == self.type_id())
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("ty", &self.ty)
            .field("kind", &self.kind.name())
            .field("instantiable", &self.is_instantiable())
            .finish()
    }
}

/// Iterator returned by [`TypeInfo::ancestors`].
pub struct Ancestors {
    next: Option<&'static TypeInfo>,
}

impl Iterator for Ancestors {
    type Item = &'static TypeInfo;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.base();
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::{Type, short_name};

    #[test]
    fn short_names() {
        assert_eq!(short_name("a::b::Dog"), "Dog");
        assert_eq!(short_name("alloc::vec::Vec<a::b::C>"), "Vec<a::b::C>");
        assert_eq!(short_name("i32"), "i32");
        assert_eq!(Type::of::<u8>().name(), "u8");
        assert!(Type::of::<u8>().is::<u8>());
    }
}
