use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::{Any, TypeId};

use crate::Reflect;
use crate::info::markers::{Marker, Markers};
use crate::info::{MemberInfo, TypeInfo};

// -----------------------------------------------------------------------------
// BaseLink

/// The embedded base of a derived object.
///
/// Inheritance is expressed by composition: the derived type holds its base
/// in a field marked `#[mapping(base)]`, and the link projects onto it.
pub struct BaseLink {
    member: &'static str,
    info: fn() -> &'static TypeInfo,
    get: fn(&dyn Reflect) -> Option<&dyn Reflect>,
    get_mut: fn(&mut dyn Reflect) -> Option<&mut dyn Reflect>,
}

impl BaseLink {
    #[inline]
    pub const fn new(
        member: &'static str,
        info: fn() -> &'static TypeInfo,
        get: fn(&dyn Reflect) -> Option<&dyn Reflect>,
        get_mut: fn(&mut dyn Reflect) -> Option<&mut dyn Reflect>,
    ) -> Self {
        Self {
            member,
            info,
            get,
            get_mut,
        }
    }

    /// Name of the field holding the base.
    #[inline]
    pub const fn member(&self) -> &'static str {
        self.member
    }

    #[inline]
    pub fn info(&self) -> &'static TypeInfo {
        (self.info)()
    }

    #[inline]
    pub fn get<'a>(&self, derived: &'a dyn Reflect) -> Option<&'a dyn Reflect> {
        (self.get)(derived)
    }

    #[inline]
    pub fn get_mut<'a>(&self, derived: &'a mut dyn Reflect) -> Option<&'a mut dyn Reflect> {
        (self.get_mut)(derived)
    }
}

// -----------------------------------------------------------------------------
// Resolution

/// A discriminator entry of a polymorphic hierarchy.
///
/// Declares that data carrying `value` under `key` (or at `index` in the
/// sequence layout) denotes `target`. Unset parts fall back to the
/// definition's discriminator key/index and the target's short name.
pub struct Resolution {
    target: fn() -> &'static TypeInfo,
    declared_on: TypeId,
    key: Option<&'static str>,
    index: Option<usize>,
    value: Option<&'static str>,
}

impl Resolution {
    #[inline]
    pub fn new<Owner: Any>(target: fn() -> &'static TypeInfo) -> Self {
        Self {
            target,
            declared_on: TypeId::of::<Owner>(),
            key: None,
            index: None,
            value: None,
        }
    }

    #[inline]
    pub const fn with_key(mut self, key: &'static str) -> Self {
        self.key = Some(key);
        self
    }

    #[inline]
    pub const fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    #[inline]
    pub const fn with_value(mut self, value: &'static str) -> Self {
        self.value = Some(value);
        self
    }

    #[inline]
    pub fn target(&self) -> &'static TypeInfo {
        (self.target)()
    }

    #[inline]
    pub const fn declared_on(&self) -> TypeId {
        self.declared_on
    }

    /// The discriminator key, if overridden.
    #[inline]
    pub const fn key(&self) -> Option<&'static str> {
        self.key
    }

    /// The discriminator index in the sequence layout, if overridden.
    #[inline]
    pub const fn index(&self) -> Option<usize> {
        self.index
    }

    /// The discriminator value, defaulting to the target's short name.
    #[inline]
    pub fn value(&self) -> &'static str {
        match self.value {
            Some(value) => value,
            None => self.target().type_name(),
        }
    }
}

impl core::fmt::Debug for Resolution {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Resolution")
            .field("target", &self.target().type_path())
            .field("key", &self.key)
            .field("index", &self.index)
            .field("value", &self.value())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Hooks

/// The lifecycle event a hook observes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HookKind {
    BeforeSerialize,
    AfterSerialize,
    BeforeDeserialize,
    AfterDeserialize,
}

impl HookKind {
    #[inline]
    pub const fn is_serialize(self) -> bool {
        matches!(self, HookKind::BeforeSerialize | HookKind::AfterSerialize)
    }
}

#[derive(Clone, Copy)]
enum HookCall {
    Ref(fn(&dyn Reflect)),
    Mut(fn(&mut dyn Reflect)),
}

/// A named lifecycle method of an object.
///
/// Hooks of the same name on a base and a derived type are one logical hook:
/// only the most derived declaration runs.
pub struct HookInfo {
    kind: HookKind,
    name: &'static str,
    declaring: TypeId,
    call: HookCall,
}

impl HookInfo {
    /// A serialization hook; it sees the value immutably.
    #[inline]
    pub fn on_serialize<Owner: Any>(kind: HookKind, name: &'static str, f: fn(&dyn Reflect)) -> Self {
        debug_assert!(kind.is_serialize());
        Self {
            kind,
            name,
            declaring: TypeId::of::<Owner>(),
            call: HookCall::Ref(f),
        }
    }

    /// A deserialization hook; it may mutate the value.
    #[inline]
    pub fn on_deserialize<Owner: Any>(kind: HookKind, name: &'static str, f: fn(&mut dyn Reflect)) -> Self {
        debug_assert!(!kind.is_serialize());
        Self {
            kind,
            name,
            declaring: TypeId::of::<Owner>(),
            call: HookCall::Mut(f),
        }
    }

    #[inline]
    pub const fn kind(&self) -> HookKind {
        self.kind
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn declaring_id(&self) -> TypeId {
        self.declaring
    }

    /// Runs a serialization hook on an instance of the declaring type.
    pub fn invoke(&self, owner: &dyn Reflect) {
        if let HookCall::Ref(f) = self.call {
            f(owner);
        }
    }

    /// Runs a deserialization hook on an instance of the declaring type.
    pub fn invoke_mut(&self, owner: &mut dyn Reflect) {
        match self.call {
            HookCall::Ref(f) => f(owner),
            HookCall::Mut(f) => f(owner),
        }
    }
}

impl core::fmt::Debug for HookInfo {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HookInfo")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// ObjectInfo

/// Type info of a derived object.
///
/// Holds only the members declared by the type itself. Inherited members
/// are reached through [`base`](Self::base) and merged by the
/// [`TypeRegistry`](crate::registry::TypeRegistry)'s member cache.
pub struct ObjectInfo {
    members: Box<[MemberInfo]>,
    base: Option<BaseLink>,
    markers: Markers,
    resolutions: Box<[Resolution]>,
    hooks: Box<[HookInfo]>,
}

impl ObjectInfo {
    #[inline]
    pub fn new(members: Vec<MemberInfo>) -> Self {
        Self {
            members: members.into_boxed_slice(),
            base: None,
            markers: Markers::new(),
            resolutions: Box::new([]),
            hooks: Box::new([]),
        }
    }

    #[inline]
    pub fn with_base(mut self, base: BaseLink) -> Self {
        self.base = Some(base);
        self
    }

    #[inline]
    pub fn with_marker<M: Marker>(mut self, marker: M) -> Self {
        self.markers.insert(marker);
        self
    }

    #[inline]
    pub fn with_resolutions(mut self, resolutions: Vec<Resolution>) -> Self {
        self.resolutions = resolutions.into_boxed_slice();
        self
    }

    #[inline]
    pub fn with_hooks(mut self, hooks: Vec<HookInfo>) -> Self {
        self.hooks = hooks.into_boxed_slice();
        self
    }

    /// Members declared by this type, in declaration order.
    #[inline]
    pub fn members(&self) -> &[MemberInfo] {
        &self.members
    }

    /// A member declared by this type.
    pub fn member(&self, name: &str) -> Option<&MemberInfo> {
        self.members.iter().find(|m| m.name() == name)
    }

    #[inline]
    pub const fn base(&self) -> Option<&BaseLink> {
        self.base.as_ref()
    }

    /// Type-level markers.
    #[inline]
    pub const fn markers(&self) -> &Markers {
        &self.markers
    }

    #[inline]
    pub fn marker<M: Marker>(&self) -> Option<&M> {
        self.markers.get::<M>()
    }

    /// Discriminator entries declared on this type.
    #[inline]
    pub fn resolutions(&self) -> &[Resolution] {
        &self.resolutions
    }

    /// Lifecycle hooks declared on this type.
    #[inline]
    pub fn hooks(&self) -> &[HookInfo] {
        &self.hooks
    }
}
