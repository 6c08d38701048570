use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;

use plaid_utils::ConcurrentCache;

use crate::info::markers::Marker;
use crate::info::{HookInfo, HookKind, MemberInfo, Resolution, TypeInfo};

/// A member paired with the marker it was selected by.
#[derive(Clone, Copy)]
pub struct CachedMember {
    member: &'static MemberInfo,
    marker: &'static dyn Marker,
}

impl CachedMember {
    #[inline]
    pub const fn member(&self) -> &'static MemberInfo {
        self.member
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.member.name()
    }

    #[inline]
    pub const fn marker(&self) -> &'static dyn Marker {
        self.marker
    }

    /// The selecting marker as its concrete type.
    #[inline]
    pub fn marker_as<M: Marker>(&self) -> Option<&'static M> {
        self.marker.downcast_ref()
    }
}

impl fmt::Debug for CachedMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedMember")
            .field("member", &self.member.name())
            .field("marker", &self.marker)
            .finish()
    }
}

/// The members one type declares with one marker.
///
/// Inherited members are not copied in; they live in the [`base`](Self::base)
/// entry, which is shared with every other type deriving from the same base.
pub struct CacheEntry {
    owner: &'static TypeInfo,
    members: Box<[CachedMember]>,
    base: Option<Arc<CacheEntry>>,
}

impl CacheEntry {
    #[inline]
    pub const fn owner(&self) -> &'static TypeInfo {
        self.owner
    }

    /// Members declared by [`owner`](Self::owner) itself.
    #[inline]
    pub fn members(&self) -> &[CachedMember] {
        &self.members
    }

    #[inline]
    pub fn base(&self) -> Option<&Arc<CacheEntry>> {
        self.base.as_ref()
    }

    /// This entry followed by its base entries.
    pub fn chain(&self) -> impl Iterator<Item = &CacheEntry> {
        core::iter::successors(Some(self), |entry| entry.base.as_deref())
    }
}

impl fmt::Debug for CacheEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("owner", &self.owner.type_path())
            .field("members", &self.members)
            .field("base", &self.base)
            .finish()
    }
}

type MarkerKey = (TypeId, TypeId);

/// Read-through caches over the static type infos.
///
/// Every computation is idempotent, so racing first computations are
/// harmless; see [`ConcurrentCache`].
pub(crate) struct MemberCache {
    declared: ConcurrentCache<MarkerKey, Arc<CacheEntry>>,
    unique: ConcurrentCache<MarkerKey, Arc<[CachedMember]>>,
    hooks: ConcurrentCache<(TypeId, HookKind), Arc<[&'static HookInfo]>>,
    resolutions: ConcurrentCache<TypeId, Arc<[&'static Resolution]>>,
}

impl MemberCache {
    pub(crate) fn new() -> Self {
        Self {
            declared: ConcurrentCache::new(),
            unique: ConcurrentCache::new(),
            hooks: ConcurrentCache::new(),
            resolutions: ConcurrentCache::new(),
        }
    }

    pub(crate) fn clear(&self) {
        self.declared.clear();
        self.unique.clear();
        self.hooks.clear();
        self.resolutions.clear();
    }

    pub(crate) fn declared(&self, info: &'static TypeInfo, marker: TypeId) -> Arc<CacheEntry> {
        self.declared.get_or_compute((info.type_id(), marker), || {
            let Some(object) = info.as_object() else {
                return Arc::new(CacheEntry {
                    owner: info,
                    members: Box::new([]),
                    base: None,
                });
            };
            let members = object
                .members()
                .iter()
                .filter_map(|member| {
                    let found = member.markers().get_by_id(marker)?;
                    Some(CachedMember { member, marker: found })
                })
                .collect();
            let base = object.base().map(|link| self.declared(link.info(), marker));
            Arc::new(CacheEntry {
                owner: info,
                members,
                base,
            })
        })
    }

    /// Flattens the chain base-first; a derived member shadows a base member
    /// of the same name.
    pub(crate) fn unique(&self, info: &'static TypeInfo, marker: TypeId) -> Arc<[CachedMember]> {
        self.unique.get_or_compute((info.type_id(), marker), || {
            let entry = self.declared(info, marker);
            let mut seen: Vec<&'static str> = Vec::new();
            let mut levels: Vec<Vec<CachedMember>> = Vec::new();
            for level in entry.chain() {
                let kept: Vec<CachedMember> = level
                    .members()
                    .iter()
                    .filter(|m| !seen.contains(&m.name()))
                    .copied()
                    .collect();
                seen.extend(kept.iter().map(CachedMember::name));
                levels.push(kept);
            }
            levels.into_iter().rev().flatten().collect()
        })
    }

    pub(crate) fn hooks(&self, info: &'static TypeInfo, kind: HookKind) -> Arc<[&'static HookInfo]> {
        self.hooks.get_or_compute((info.type_id(), kind), || {
            let mut chain: Vec<&'static TypeInfo> = info.ancestors().collect();
            chain.reverse();

            let mut hooks: Vec<&'static HookInfo> = Vec::new();
            let declared = chain
                .into_iter()
                .filter_map(TypeInfo::as_object)
                .flat_map(|object| object.hooks())
                .filter(|hook| hook.kind() == kind);
            for hook in declared {
                match hooks.iter_mut().find(|h| h.name() == hook.name()) {
                    Some(slot) => *slot = hook,
                    None => hooks.push(hook),
                }
            }
            hooks.into()
        })
    }

    pub(crate) fn resolutions(
        &self,
        root: &'static TypeInfo,
        compute: impl FnOnce() -> Arc<[&'static Resolution]>,
    ) -> Arc<[&'static Resolution]> {
        self.resolutions.get_or_compute(root.type_id(), compute)
    }
}
