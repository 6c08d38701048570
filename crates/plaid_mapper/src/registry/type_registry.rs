use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::TypeId;

use plaid_utils::TypeIdMap;
use plaid_utils::hash::{HashMap, HashSet};

use crate::error::ReflectionCacheError;
use crate::info::markers::{Marker, Participant, Required, Role, XmlRoot};
use crate::info::{HookInfo, HookKind, MemberInfo, Resolution, TypeInfo, TypeKind};
use crate::registry::member_cache::MemberCache;
use crate::registry::{CacheEntry, CachedMember};
use crate::{Typed, Value};

// -----------------------------------------------------------------------------
// TypeRegistry

/// A registry of mapped types.
///
/// Registration records a type together with everything it depends on:
/// member types, its base, collection element types and the targets of its
/// discriminator entries. Polymorphic resolution only considers registered
/// types, so every concrete type that can appear in a `Poly<B>` slot must be
/// reachable from a registration.
///
/// The registry also owns the member cache. Queries take `&self` and may
/// run from any number of threads; registering new types clears the cache.
///
/// # Example
///
/// ```
/// use plaid_mapper::derive::Mapped;
/// use plaid_mapper::info::markers::Role;
/// use plaid_mapper::registry::TypeRegistry;
/// use plaid_mapper::Typed;
///
/// #[derive(Mapped)]
/// struct User {
///     #[mapping(attribute)]
///     id: u32,
///     name: String,
///     #[mapping(skip)]
///     session: Option<String>,
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<User>();
///
/// let names: Vec<_> = registry
///     .members::<Role>(User::type_info())
///     .iter()
///     .map(|(member, _)| member.name())
///     .collect();
/// assert_eq!(names, ["id", "name"]);
/// ```
pub struct TypeRegistry {
    type_info_table: TypeIdMap<&'static TypeInfo>,
    type_path_to_id: HashMap<&'static str, TypeId>,
    type_name_to_id: HashMap<&'static str, TypeId>,
    ambiguous_names: HashSet<&'static str>,
    markers: HashSet<TypeId>,
    cache: MemberCache,
    pub(super) auto_register_available: bool,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Creates a registry knowing only the built-in marker types.
    pub fn empty() -> Self {
        let mut registry = Self {
            type_info_table: TypeIdMap::new(),
            type_path_to_id: HashMap::default(),
            type_name_to_id: HashMap::default(),
            ambiguous_names: HashSet::default(),
            markers: HashSet::default(),
            cache: MemberCache::new(),
            auto_register_available: false,
        };
        registry.register_marker::<Role>();
        registry.register_marker::<Required>();
        registry.register_marker::<Participant>();
        registry.register_marker::<XmlRoot>();
        registry
    }

    /// Creates a registry with the scalar types and [`Value`] registered.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register::<bool>();
        registry.register::<char>();
        registry.register::<u8>();
        registry.register::<u16>();
        registry.register::<u32>();
        registry.register::<u64>();
        registry.register::<usize>();
        registry.register::<i8>();
        registry.register::<i16>();
        registry.register::<i32>();
        registry.register::<i64>();
        registry.register::<isize>();
        registry.register::<f32>();
        registry.register::<f64>();
        registry.register::<String>();
        registry.register::<Value>();
        registry
    }

    fn add_new_type_indices(&mut self, info: &'static TypeInfo) {
        let ty = info.ty();
        let type_name = ty.name();

        if !self.ambiguous_names.contains(type_name) {
            if self.type_name_to_id.contains_key(type_name) {
                self.type_name_to_id.remove(type_name);
                self.ambiguous_names.insert(type_name);
            } else {
                self.type_name_to_id.insert(type_name, ty.id());
            }
        }

        self.type_path_to_id.insert(ty.path(), ty.id());
    }

    /// Registers `T` and its dependencies if not yet registered.
    #[inline]
    pub fn register<T: Typed>(&mut self) {
        self.register_info(T::type_info());
    }

    /// Registers a type by its info, together with its dependencies.
    ///
    /// Returns `false` if the type was already registered.
    pub fn register_info(&mut self, info: &'static TypeInfo) -> bool {
        if self.type_info_table.contains(&info.type_id()) {
            return false;
        }
        self.type_info_table.insert(info.type_id(), info);
        self.add_new_type_indices(info);
        self.cache.clear();

        match info.kind() {
            TypeKind::Object(object) => {
                for member in object.members() {
                    self.register_info(member.type_info());
                }
                if let Some(base) = object.base() {
                    self.register_info(base.info());
                }
                for resolution in object.resolutions() {
                    self.register_info(resolution.target());
                }
            }
            TypeKind::Sequence(list) => {
                self.register_info(list.item());
            }
            TypeKind::Lookup(map) => {
                self.register_info(map.key());
                self.register_info(map.value());
            }
            TypeKind::Optional(option) => {
                self.register_info(option.some());
            }
            TypeKind::Polymorphic(poly) => {
                self.register_info(poly.base());
            }
            TypeKind::Scalar(_) | TypeKind::Enum(_) | TypeKind::Plain => {}
        }
        true
    }

    /// Automatically registers every type marked `#[mapping(auto_register)]`.
    ///
    /// Returns `true` if static collection works on the current platform.
    /// Without the `auto_register` feature this does nothing and returns `false`.
    ///
    /// ```no_run
    /// use plaid_mapper::derive::Mapped;
    /// use plaid_mapper::registry::TypeRegistry;
    /// use plaid_mapper::Typed;
    ///
    /// #[derive(Mapped)]
    /// #[mapping(auto_register)]
    /// struct Foo {
    ///     value: i32,
    /// }
    ///
    /// let mut registry = TypeRegistry::empty();
    /// assert!(registry.auto_register());
    /// assert!(registry.contains(Foo::type_info().type_id()));
    /// ```
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            super::auto_register::register_all(self)
        }
        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }

    /// Declares `M` as a marker type usable in dynamic member queries.
    pub fn register_marker<M: Marker>(&mut self) {
        self.markers.insert(TypeId::of::<M>());
    }

    #[inline]
    pub fn is_marker(&self, type_id: TypeId) -> bool {
        self.markers.contains(&type_id)
    }

    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.type_info_table.contains(&type_id)
    }

    #[inline]
    pub fn get_type_info(&self, type_id: TypeId) -> Option<&'static TypeInfo> {
        self.type_info_table.get(&type_id).copied()
    }

    pub fn get_with_type_path(&self, type_path: &str) -> Option<&'static TypeInfo> {
        self.get_type_info(*self.type_path_to_id.get(type_path)?)
    }

    /// Looks a type up by short name; ambiguous names yield `None`.
    pub fn get_with_type_name(&self, type_name: &str) -> Option<&'static TypeInfo> {
        self.get_type_info(*self.type_name_to_id.get(type_name)?)
    }

    #[inline]
    pub fn is_ambiguous(&self, type_name: &str) -> bool {
        self.ambiguous_names.contains(type_name)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &'static TypeInfo> + '_ {
        self.type_info_table.values().copied()
    }

    /// Registered types that are `info` or derive from it.
    pub fn descendants(&self, info: &'static TypeInfo) -> impl Iterator<Item = &'static TypeInfo> + '_ {
        self.iter().filter(move |other| info.is_assignable_from(other))
    }

    // -------------------------------------------------------------------------
    // Member queries

    fn check_marker(&self, marker: TypeId) -> Result<(), ReflectionCacheError> {
        if self.is_marker(marker) {
            Ok(())
        } else {
            Err(ReflectionCacheError::NotAMarker { type_id: marker })
        }
    }

    /// The entry of members `info` itself declares with the marker `marker`.
    ///
    /// Non-object types yield an empty entry.
    pub fn declared(&self, info: &'static TypeInfo, marker: TypeId) -> Result<Arc<CacheEntry>, ReflectionCacheError> {
        self.check_marker(marker)?;
        Ok(self.cache.declared(info, marker))
    }

    /// Members of `info` and its ancestors carrying `marker`, base members
    /// first, each logical member once.
    pub fn members_dyn(&self, info: &'static TypeInfo, marker: TypeId) -> Result<Arc<[CachedMember]>, ReflectionCacheError> {
        self.check_marker(marker)?;
        Ok(self.cache.unique(info, marker))
    }

    /// Typed version of [`members_dyn`](Self::members_dyn).
    ///
    /// Any [`Marker`] type is accepted here, registered or not.
    pub fn members<M: Marker>(&self, info: &'static TypeInfo) -> Vec<(&'static MemberInfo, &'static M)> {
        self.cache
            .unique(info, TypeId::of::<M>())
            .iter()
            .filter_map(|m| Some((m.member(), m.marker_as::<M>()?)))
            .collect()
    }

    /// Members carrying [`Role`]: the members every processor maps.
    #[inline]
    pub fn mapped_members(&self, info: &'static TypeInfo) -> Arc<[CachedMember]> {
        self.cache.unique(info, TypeId::of::<Role>())
    }

    fn ensure_in_hierarchy(&self, info: &'static TypeInfo, member: &MemberInfo) -> Result<(), ReflectionCacheError> {
        if info.ancestors().any(|a| a.type_id() == member.declaring_id()) {
            Ok(())
        } else {
            Err(ReflectionCacheError::MemberNotInHierarchy {
                member: member.name(),
                declaring: member.declaring().path(),
                owner: info.type_path(),
            })
        }
    }

    /// Whether `member`, looked up on `info`, carries the marker `marker`.
    pub fn is_marker_defined_on_member(
        &self,
        info: &'static TypeInfo,
        member: &MemberInfo,
        marker: TypeId,
    ) -> Result<bool, ReflectionCacheError> {
        self.check_marker(marker)?;
        self.ensure_in_hierarchy(info, member)?;
        let entry = self.cache.declared(info, marker);
        let found = entry
            .chain()
            .find(|level| level.owner().type_id() == member.declaring_id())
            .is_some_and(|level| level.members().iter().any(|m| core::ptr::eq(m.member(), member)));
        Ok(found)
    }

    /// The marker `M` on `member`, looked up on `info`.
    pub fn get_marker_on_member<M: Marker>(
        &self,
        info: &'static TypeInfo,
        member: &'static MemberInfo,
    ) -> Result<Option<&'static M>, ReflectionCacheError> {
        self.ensure_in_hierarchy(info, member)?;
        Ok(member.marker::<M>())
    }

    /// Hooks of `kind` for `info`, base declarations first, one per name.
    #[inline]
    pub fn hooks(&self, info: &'static TypeInfo, kind: HookKind) -> Arc<[&'static HookInfo]> {
        self.cache.hooks(info, kind)
    }

    /// Every discriminator entry of the hierarchy `info` belongs to.
    ///
    /// Collects the entries declared on the hierarchy root and on every
    /// registered type deriving from it, least derived targets first. The
    /// table is computed once per root.
    pub fn resolution_table(&self, info: &'static TypeInfo) -> Arc<[&'static Resolution]> {
        let root = info.root();
        self.cache.resolutions(root, || {
            let mut owners: Vec<&'static TypeInfo> = self.descendants(root).collect();
            for ancestor in info.ancestors() {
                if !owners.iter().any(|o| o.type_id() == ancestor.type_id()) {
                    owners.push(ancestor);
                }
            }

            let mut table: Vec<&'static Resolution> = owners
                .into_iter()
                .filter_map(TypeInfo::as_object)
                .flat_map(|object| object.resolutions())
                .collect();
            table.sort_by_cached_key(|entry| {
                let target = entry.target();
                (target.ancestors().count(), target.type_path())
            });
            table.into()
        })
    }
}

impl core::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter().map(TypeInfo::type_path)).finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;
    use alloc::vec::Vec;
    use core::any::TypeId;

    use crate::derive::Mapped;
    use crate::error::ReflectionCacheError;
    use crate::info::HookKind;
    use crate::info::markers::{Marker, Required, Role, RoleKind};
    use crate::registry::TypeRegistry;
    use crate::Typed;

    #[derive(Debug)]
    struct Sensitive;

    impl Marker for Sensitive {}

    #[derive(Mapped)]
    #[mapping(before_serialize = touch)]
    struct Base {
        #[mapping(attribute)]
        id: u32,
        #[mapping(@Sensitive)]
        secret: String,
        label: String,
    }

    impl Base {
        fn touch(&self) {}
    }

    #[derive(Mapped)]
    #[mapping(before_serialize = touch, after_serialize = done)]
    struct Derived {
        #[mapping(base)]
        base: Base,
        #[mapping(required)]
        label: String,
        extra: Vec<i32>,
    }

    impl Derived {
        fn touch(&self) {}
        fn done(&self) {}
    }

    #[derive(Mapped)]
    struct Unrelated {
        value: i32,
    }

    #[test]
    fn registers_dependencies() {
        let mut registry = TypeRegistry::empty();
        registry.register::<Derived>();
        assert!(registry.contains(TypeId::of::<Base>()));
        assert!(registry.contains(TypeId::of::<Vec<i32>>()));
        assert!(registry.contains(TypeId::of::<i32>()));
        assert_eq!(
            registry.get_with_type_name("Derived").map(|i| i.type_id()),
            Some(TypeId::of::<Derived>())
        );
    }

    #[test]
    fn unique_members_are_base_first_and_shadowed() {
        let registry = TypeRegistry::new();
        let members = registry.members::<Role>(Derived::type_info());
        let names: Vec<_> = members.iter().map(|(m, _)| m.name()).collect();
        assert_eq!(names, ["id", "secret", "label", "extra"]);

        // `label` is the derived declaration.
        let (label, _) = members[2];
        assert_eq!(label.declaring_id(), TypeId::of::<Derived>());

        let (id, role) = members[0];
        assert_eq!(id.name(), "id");
        assert_eq!(role.kind, RoleKind::Attribute);
    }

    #[test]
    fn cache_is_idempotent() {
        let registry = TypeRegistry::new();
        let info = Derived::type_info();
        let a = registry.declared(info, TypeId::of::<Role>()).unwrap();
        let b = registry.declared(info, TypeId::of::<Role>()).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(a.base().unwrap(), &registry.declared(Base::type_info(), TypeId::of::<Role>()).unwrap()));

        let first = registry.mapped_members(info);
        let second = registry.mapped_members(info);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn custom_markers_need_registration() {
        let mut registry = TypeRegistry::new();
        let info = Derived::type_info();
        assert_eq!(
            registry.members_dyn(info, TypeId::of::<Sensitive>()).unwrap_err(),
            ReflectionCacheError::NotAMarker {
                type_id: TypeId::of::<Sensitive>()
            }
        );
        registry.register_marker::<Sensitive>();
        let sensitive = registry.members_dyn(info, TypeId::of::<Sensitive>()).unwrap();
        assert_eq!(sensitive.len(), 1);
        assert_eq!(sensitive[0].name(), "secret");
        assert!(registry.members_dyn(info, TypeId::of::<u8>()).is_err());
    }

    #[test]
    fn marker_on_member() {
        let registry = TypeRegistry::new();
        let derived = Derived::type_info();
        let label = derived.as_object().unwrap().member("label").unwrap();
        let required = registry.get_marker_on_member::<Required>(derived, label).unwrap();
        assert_eq!(required, Some(&Required { null_check: false }));
        assert!(registry
            .is_marker_defined_on_member(derived, label, TypeId::of::<Required>())
            .unwrap());

        let base_id = Base::type_info().as_object().unwrap().member("id").unwrap();
        assert!(!registry
            .is_marker_defined_on_member(derived, base_id, TypeId::of::<Required>())
            .unwrap());

        let err = registry
            .get_marker_on_member::<Required>(Unrelated::type_info(), label)
            .unwrap_err();
        assert!(matches!(err, ReflectionCacheError::MemberNotInHierarchy { member: "label", .. }));
    }

    #[test]
    fn hooks_are_base_first_and_deduplicated() {
        let registry = TypeRegistry::new();
        let hooks = registry.hooks(Derived::type_info(), HookKind::BeforeSerialize);
        assert_eq!(hooks.len(), 1);
        assert_eq!(hooks[0].declaring_id(), TypeId::of::<Derived>());
        assert_eq!(registry.hooks(Derived::type_info(), HookKind::AfterSerialize).len(), 1);
        assert!(registry.hooks(Base::type_info(), HookKind::AfterSerialize).is_empty());
    }
}
