//! Declarative metadata attached to types and members.
//!
//! A marker is any `'static` value implementing [`Marker`]. The engine's own
//! markers are [`Role`], [`Required`], [`Participant`] and [`XmlRoot`];
//! user markers are attached with `#[mapping(@expr)]` and must be registered
//! with [`TypeRegistry::register_marker`](crate::registry::TypeRegistry::register_marker)
//! before they can drive a member query.

use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::fmt::Debug;

use plaid_utils::TypeIdMap;

/// Metadata that can be attached to a type or a member.
pub trait Marker: Any + Send + Sync + Debug {}

impl dyn Marker {
    #[inline]
    pub fn is<M: Marker>(&self) -> bool {
        (self as &dyn Any).is::<M>()
    }

    #[inline]
    pub fn downcast_ref<M: Marker>(&self) -> Option<&M> {
        (self as &dyn Any).downcast_ref()
    }
}

// -----------------------------------------------------------------------------
// Markers

/// A set of markers, at most one per marker type.
#[derive(Default)]
pub struct Markers(TypeIdMap<Box<dyn Marker>>);

impl Markers {
    pub const EMPTY: &'static Self = &Self(TypeIdMap::new());

    #[inline]
    pub const fn new() -> Self {
        Self(TypeIdMap::new())
    }

    /// Adds `marker`, replacing a previous marker of the same type.
    #[inline]
    pub fn with<M: Marker>(mut self, marker: M) -> Self {
        self.insert(marker);
        self
    }

    #[inline]
    pub fn insert<M: Marker>(&mut self, marker: M) {
        self.0.insert(TypeId::of::<M>(), Box::new(marker));
    }

    #[inline]
    pub fn get<M: Marker>(&self) -> Option<&M> {
        self.0.get(&TypeId::of::<M>())?.downcast_ref()
    }

    #[inline]
    pub fn get_by_id(&self, type_id: TypeId) -> Option<&dyn Marker> {
        self.0.get(&type_id).map(|m| &**m)
    }

    #[inline]
    pub fn contains<M: Marker>(&self) -> bool {
        self.0.contains_type::<M>()
    }

    #[inline]
    pub fn contains_id(&self, type_id: TypeId) -> bool {
        self.0.contains(&type_id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &dyn Marker> {
        self.0.values().map(|m| &**m)
    }
}

impl Debug for Markers {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

// -----------------------------------------------------------------------------
// Role

/// How a member appears on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RoleKind {
    /// An XML attribute; a plain lookup entry elsewhere.
    Attribute,
    /// A child element or lookup entry. The default for mapped fields.
    Element,
    /// Character data in a child element; a plain lookup entry elsewhere.
    CData,
    /// A container whose items repeat as `entry` elements.
    ListEntry { entry: Option<&'static str> },
}

/// The wire role of a member, with optional key and sequence index overrides.
///
/// ```
/// use plaid_mapper::info::markers::{Role, RoleKind};
///
/// let role = Role::attribute().with_key("id");
/// assert_eq!(role.kind, RoleKind::Attribute);
/// assert_eq!(role.key_or("ident"), "id");
/// assert_eq!(Role::element().key_or("ident"), "ident");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Role {
    pub kind: RoleKind,
    pub key: Option<&'static str>,
    pub index: Option<usize>,
}

impl Role {
    #[inline]
    pub const fn new(kind: RoleKind) -> Self {
        Self {
            kind,
            key: None,
            index: None,
        }
    }

    #[inline]
    pub const fn attribute() -> Self {
        Self::new(RoleKind::Attribute)
    }

    #[inline]
    pub const fn element() -> Self {
        Self::new(RoleKind::Element)
    }

    #[inline]
    pub const fn cdata() -> Self {
        Self::new(RoleKind::CData)
    }

    #[inline]
    pub const fn list(entry: Option<&'static str>) -> Self {
        Self::new(RoleKind::ListEntry { entry })
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

    /// The wire key, falling back to the member name.
    #[inline]
    pub const fn key_or(&self, name: &'static str) -> &'static str {
        match self.key {
            Some(key) => key,
            None => name,
        }
    }
}

impl Marker for Role {}

// -----------------------------------------------------------------------------
// Others

/// Fails deserialization when the member is absent, or null if `null_check` is set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Required {
    pub null_check: bool,
}

impl Marker for Required {}

/// Carried by every derived object type: the type takes part in mapping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Participant;

impl Marker for Participant {}

/// The element name used when a type is the XML document root.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct XmlRoot(pub &'static str);

impl Marker for XmlRoot {}

#[cfg(test)]
mod tests {
    use super::{Markers, Required, Role, RoleKind, XmlRoot};

    #[test]
    fn lookup_by_type() {
        let markers = Markers::new()
            .with(Role::list(Some("item")).with_index(2))
            .with(Required { null_check: true });

        assert_eq!(markers.len(), 2);
        assert!(markers.contains::<Required>());
        assert!(!markers.contains::<XmlRoot>());
        let role = markers.get::<Role>().unwrap();
        assert_eq!(role.kind, RoleKind::ListEntry { entry: Some("item") });
        assert_eq!(role.index, Some(2));
    }

    #[test]
    fn replace_same_type() {
        let markers = Markers::new().with(XmlRoot("a")).with(XmlRoot("b"));
        assert_eq!(markers.len(), 1);
        assert_eq!(markers.get::<XmlRoot>(), Some(&XmlRoot("b")));
    }
}
