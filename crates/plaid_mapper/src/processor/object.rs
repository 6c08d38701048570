use alloc::boxed::Box;
use alloc::format;
use alloc::vec::Vec;

use super::{Mapper, ObjectLayout, Populate, Processor};
use crate::error::{ReflectionCacheError, TypeResolutionError};
use crate::features::{lifecycle, required};
use crate::info::markers::{Participant, Required, Role};
use crate::info::{HookKind, MemberInfo, TypeInfo, TypeKind};
use crate::registry::CachedMember;
use crate::value::{Lookup, Value};
use crate::{MapError, Reflect, ReflectRef, upcast, upcast_mut};

/// Maps derived objects member by member.
///
/// Every member carrying a [`Role`] is mapped, base members first. In the
/// lookup layout a member is stored under its role key (default: its name),
/// in the sequence layout at its role index (default: its position). Types
/// taking part in type resolution get their discriminators added.
///
/// Deserialization never narrows the target type; that happens in
/// [`Poly`](crate::impls::Poly) slots or through
/// [`Mapper::deserialize_resolved`]. It starts from the blank instance, so
/// lifecycle hooks see type defaults, not user-constructed state.
///
/// The reader follows the shape of the data: lookup data is read by key and
/// sequence data by index, whatever the definition's layout.
#[derive(Clone, Copy, Debug, Default)]
pub struct ObjectProcessor;

/// Objects without [`Participant`] are left to other processors.
#[inline]
fn is_participant(info: &'static TypeInfo) -> bool {
    info.as_object().is_some_and(|object| object.marker::<Participant>().is_some())
}

#[inline]
fn role_of(cached: &CachedMember) -> Role {
    cached.marker_as::<Role>().copied().unwrap_or(Role::element())
}

fn not_in_hierarchy(member: &MemberInfo, owner: &'static TypeInfo) -> MapError {
    ReflectionCacheError::MemberNotInHierarchy {
        member: member.name(),
        declaring: member.declaring().path(),
        owner: owner.type_path(),
    }
    .into()
}

impl ObjectProcessor {
    fn read_member(value: &dyn Reflect, cached: &CachedMember, mapper: &Mapper<'_>) -> Result<Value, MapError> {
        let member = cached.member();
        let info = value.reflect_type_info();
        let owner = upcast(value, member.declaring_id()).ok_or_else(|| not_in_hierarchy(member, info))?;
        match member.get(owner) {
            Some(field) => mapper.serialize(field),
            None => {
                log::warn!(
                    "member `{}` of `{}` has no getter, writing its blank value",
                    member.name(),
                    info.type_path()
                );
                match member.type_info().blank() {
                    Some(blank) => mapper.serialize(&*blank),
                    None => Ok(Value::Null),
                }
            }
        }
    }

    fn source<'v>(data: &'v Value, role: &Role, member: &MemberInfo, position: usize) -> Option<&'v Value> {
        match data {
            Value::Lookup(map) => map.get(role.key_or(member.name())),
            Value::Sequence(items) => items.get(role.index.unwrap_or(position)),
            _ => None,
        }
    }

    /// The new value of a member, `None` when the data leaves it untouched.
    fn convert_member(
        owner: &'static TypeInfo,
        cached: &CachedMember,
        position: usize,
        data: &Value,
        mapper: &Mapper<'_>,
    ) -> Result<Option<Box<dyn Reflect>>, MapError> {
        let member = cached.member();
        let source = Self::source(data, &role_of(cached), member, position);
        required::check(owner, member, member.marker::<Required>(), source)?;

        let Some(source) = source else {
            return Ok(None);
        };
        let ty = member.type_info();
        if source.is_null() && !matches!(ty.kind(), TypeKind::Optional(_) | TypeKind::Plain) {
            return Ok(None);
        }
        mapper.deserialize(ty, source).map(Some)
    }

    fn write_member(target: &mut dyn Reflect, member: &MemberInfo, value: Box<dyn Reflect>) -> Result<(), MapError> {
        let info = target.reflect_type_info();
        let owner = upcast_mut(target, member.declaring_id()).ok_or_else(|| not_in_hierarchy(member, info))?;
        if !member.is_writable() {
            log::warn!(
                "member `{}` of `{}` has no setter, keeping its value",
                member.name(),
                info.type_path()
            );
            return Ok(());
        }
        member
            .set(owner, value)
            .map_err(|value| MapError::conversion(format!("`{}`", value.type_path()), member.type_info().type_path()))
    }

    fn to_lookup(info: &'static TypeInfo, members: &[CachedMember], values: Vec<Result<Value, MapError>>, mapper: &Mapper<'_>) -> Result<Value, MapError> {
        let mut data = Lookup::with_capacity(members.len() + 1);
        for (cached, value) in members.iter().zip(values) {
            let key = role_of(cached).key_or(cached.name());
            if data.insert(key.into(), value?).is_some() {
                log::warn!("two members of `{}` use the key `{key}`, keeping the last", info.type_path());
            }
        }
        mapper.resolver().insert_lookup(info, &mut data);
        Ok(Value::Lookup(data))
    }

    fn to_sequence(info: &'static TypeInfo, members: &[CachedMember], values: Vec<Result<Value, MapError>>, mapper: &Mapper<'_>) -> Result<Value, MapError> {
        let offset = mapper.sequence_offset(info);
        let mut data: Vec<Value> = Vec::with_capacity(members.len() + offset);
        let mut taken: Vec<bool> = Vec::with_capacity(members.len() + offset);
        for (position, (cached, value)) in members.iter().zip(values).enumerate() {
            let index = role_of(cached).index.unwrap_or(position + offset);
            if data.len() <= index {
                data.resize(index + 1, Value::Null);
                taken.resize(index + 1, false);
            }
            if taken[index] {
                log::warn!("two members of `{}` use the index {index}, keeping the last", info.type_path());
            }
            data[index] = value?;
            taken[index] = true;
        }
        mapper.resolver().insert_sequence(info, &mut data);
        Ok(Value::Sequence(data))
    }
}

impl Processor for ObjectProcessor {
    #[inline]
    fn name(&self) -> &'static str {
        "object"
    }

    fn can_serialize(&self, value: &dyn Reflect, _mapper: &Mapper<'_>) -> bool {
        matches!(value.reflect_ref(), ReflectRef::Object(_)) && is_participant(value.reflect_type_info())
    }

    fn serialize(&self, value: &dyn Reflect, mapper: &Mapper<'_>) -> Result<Value, MapError> {
        let info = value.reflect_type_info();
        let registry = mapper.registry();
        lifecycle::invoke(registry, value, HookKind::BeforeSerialize);

        let members = registry.mapped_members(info);
        let values = mapper.map_all(&members, |_, cached| Self::read_member(value, cached, mapper));
        let data = match mapper.definition().layout() {
            ObjectLayout::Lookup => Self::to_lookup(info, &members, values, mapper)?,
            ObjectLayout::Sequence => Self::to_sequence(info, &members, values, mapper)?,
        };

        lifecycle::invoke(registry, value, HookKind::AfterSerialize);
        Ok(data)
    }

    fn can_deserialize(&self, target: &'static TypeInfo, data: &Value, _mapper: &Mapper<'_>) -> bool {
        is_participant(target) && matches!(data, Value::Lookup(_) | Value::Sequence(_))
    }

    fn deserialize(&self, target: &'static TypeInfo, data: &Value, mapper: &Mapper<'_>) -> Result<Box<dyn Reflect>, MapError> {
        let mut object = target.blank().ok_or(TypeResolutionError::NotInstantiable {
            type_path: target.type_path(),
        })?;
        self.populate(&mut *object, data, mapper)?;
        Ok(object)
    }

    #[inline]
    fn as_populate(&self) -> Option<&dyn Populate> {
        Some(self)
    }
}

impl Populate for ObjectProcessor {
    fn can_populate(&self, target: &'static TypeInfo, data: &Value, mapper: &Mapper<'_>) -> bool {
        self.can_deserialize(target, data, mapper)
    }

    /// Writes every member present in `data`; absent members keep their values.
    ///
    /// A failing member leaves the target as it was.
    fn populate(&self, target: &mut dyn Reflect, data: &Value, mapper: &Mapper<'_>) -> Result<(), MapError> {
        let info = target.reflect_type_info();
        let registry = mapper.registry();
        lifecycle::invoke_mut(registry, target, HookKind::BeforeDeserialize);

        let members = registry.mapped_members(info);
        let offset = match data {
            Value::Sequence(_) => mapper.sequence_offset(info),
            _ => 0,
        };
        // Every member converts before the first write.
        let converted = mapper
            .map_all(&members, |position, cached| {
                Self::convert_member(info, cached, position + offset, data, mapper)
            })
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;
        for (cached, value) in members.iter().zip(converted) {
            if let Some(value) = value {
                Self::write_member(target, cached.member(), value)?;
            }
        }

        lifecycle::invoke_mut(registry, target, HookKind::AfterDeserialize);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::sync::atomic::{AtomicUsize, Ordering};

    use crate::derive::Mapped;
    use crate::info::markers::{Participant, Role};
    use crate::info::{MemberInfo, NonGenericTypeInfoCell, ObjectInfo, Type, TypeInfo, TypeKind};
    use crate::processor::{Definition, Mapper};
    use crate::reflection::impl_reflect_cast_fn;
    use crate::registry::TypeRegistry;
    use crate::value::{Lookup, Value};
    use crate::{MapError, Reflect, ReflectMut, ReflectRef, Typed};

    #[derive(Mapped, Debug, PartialEq)]
    enum Level {
        Low,
        High,
    }

    #[derive(Mapped, Debug, PartialEq)]
    struct Settings {
        #[mapping(attribute(key = "v"))]
        volume: u8,
        level: Level,
        tags: Vec<String>,
        note: Option<String>,
        extra: Value,
    }

    #[derive(Mapped, Debug, PartialEq)]
    struct Profile {
        #[mapping(required(null_check))]
        name: String,
        #[mapping(required)]
        age: u32,
        settings: Settings,
        #[mapping(skip)]
        cache: u64,
    }

    static SERIALIZED: AtomicUsize = AtomicUsize::new(0);

    #[derive(Mapped, Debug, Default)]
    #[mapping(before_serialize = count, before_deserialize = remember, after_deserialize = finish)]
    struct Tracked {
        value: i32,
        #[mapping(skip)]
        previous: i32,
        #[mapping(skip)]
        finished: bool,
    }

    impl Tracked {
        fn count(&self) {
            SERIALIZED.fetch_add(1, Ordering::Relaxed);
        }

        fn remember(&mut self) {
            self.previous = self.value;
        }

        fn finish(&mut self) {
            self.finished = true;
        }
    }

    fn registry() -> Arc<TypeRegistry> {
        let mut registry = TypeRegistry::new();
        registry.register::<Profile>();
        registry.register::<Tracked>();
        Arc::new(registry)
    }

    fn profile() -> Profile {
        Profile {
            name: "ada".into(),
            age: 36,
            settings: Settings {
                volume: 7,
                level: Level::High,
                tags: vec!["a".into(), "b".into()],
                note: None,
                extra: Value::from(vec![Value::from(1.5), Value::Null]),
            },
            cache: 0,
        }
    }

    #[test]
    fn round_trip() {
        let definition = Definition::json(registry());
        let mapper = Mapper::new(&definition);

        let data = mapper.to_value(&profile()).unwrap();
        assert_eq!(data.get("name"), Some(&Value::from("ada")));
        assert!(data.get("cache").is_none());
        let settings = data.get("settings").unwrap();
        assert_eq!(settings.get("v"), Some(&Value::from(7)));
        assert_eq!(settings.get("level"), Some(&Value::from("High")));
        assert_eq!(settings.get("note"), Some(&Value::Null));

        let back: Profile = mapper.from_value(&data).unwrap();
        assert_eq!(back, profile());
    }

    #[test]
    fn required_members() {
        let definition = Definition::json(registry());
        let mapper = Mapper::new(&definition);
        let mut data = mapper.to_value(&profile()).unwrap();

        let lookup = data.as_lookup_mut().unwrap();
        lookup.insert("name".into(), Value::Null);
        let err = mapper.from_value::<Profile>(&data).unwrap_err();
        assert!(matches!(
            err,
            MapError::RequiredMemberMissing { member: "name", reason: "null", .. }
        ));

        let lookup = data.as_lookup_mut().unwrap();
        lookup.insert("name".into(), Value::from("bob"));
        lookup.shift_remove("age");
        let err = mapper.from_value::<Profile>(&data).unwrap_err();
        assert!(matches!(
            err,
            MapError::RequiredMemberMissing { member: "age", reason: "missing", .. }
        ));

        // Null without a null check keeps the blank value.
        let lookup = data.as_lookup_mut().unwrap();
        lookup.insert("age".into(), Value::Null);
        assert_eq!(mapper.from_value::<Profile>(&data).unwrap().age, 0);
    }

    #[test]
    fn missing_members_keep_blanks() {
        let definition = Definition::json(registry());
        let mapper = Mapper::new(&definition);

        let mut data = Lookup::new();
        data.insert("name".into(), Value::from("x"));
        data.insert("age".into(), Value::from("12"));
        let profile: Profile = mapper.from_value(&Value::Lookup(data)).unwrap();
        assert_eq!(profile.age, 12);
        assert_eq!(profile.settings.level, Level::Low);
        assert!(profile.settings.tags.is_empty());
    }

    #[test]
    fn populate_merges() {
        let definition = Definition::json(registry());
        let mapper = Mapper::new(&definition);

        let mut tracked = Tracked {
            value: 4,
            ..Tracked::default()
        };
        mapper.apply(&mut tracked, &Value::Lookup(Lookup::new())).unwrap();
        assert_eq!(tracked.value, 4);
        assert_eq!(tracked.previous, 4);
        assert!(tracked.finished);

        let mut body = Lookup::new();
        body.insert("value".into(), Value::from(9));
        mapper.apply(&mut tracked, &Value::Lookup(body)).unwrap();
        assert_eq!(tracked.value, 9);
        assert_eq!(tracked.previous, 4);
    }

    #[test]
    fn hooks_fire() {
        let definition = Definition::json(registry());
        let mapper = Mapper::new(&definition);

        let before = SERIALIZED.load(Ordering::Relaxed);
        let data = mapper.to_value(&Tracked::default()).unwrap();
        assert!(SERIALIZED.load(Ordering::Relaxed) > before);

        let tracked: Tracked = mapper.from_value(&data).unwrap();
        assert!(tracked.finished);
        assert_eq!(tracked.previous, 0);
    }

    #[test]
    fn sequence_layout() {
        let definition = Definition::sequence(registry());
        let mapper = Mapper::new(&definition);

        let data = mapper.to_value(&profile()).unwrap();
        let items = data.as_sequence().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0], Value::from("ada"));
        assert_eq!(items[1], Value::from(36));
        assert_eq!(items[2].get_index(0), Some(&Value::from(7)));

        let back: Profile = mapper.from_value(&data).unwrap();
        assert_eq!(back, profile());

        // Lookup data is still readable through a sequence definition.
        let json = Definition::json(registry());
        let lookup = Mapper::new(&json).to_value(&profile()).unwrap();
        assert_eq!(mapper.from_value::<Profile>(&lookup).unwrap(), profile());
    }

    #[derive(Mapped, Debug, PartialEq)]
    struct Clash {
        a: i32,
        #[mapping(element(key = "a"))]
        b: i32,
    }

    #[test]
    fn duplicate_keys_keep_the_last() {
        let definition = Definition::json(Arc::new(TypeRegistry::new()));
        let mapper = Mapper::new(&definition);

        let data = mapper.to_value(&Clash { a: 1, b: 2 }).unwrap();
        assert_eq!(data.as_lookup().map(Lookup::len), Some(1));
        assert_eq!(data.get("a"), Some(&Value::from(2)));
    }

    #[derive(Mapped, Debug, PartialEq)]
    struct Pair {
        a: i32,
        #[mapping(required)]
        b: i32,
    }

    #[test]
    fn failed_populate_leaves_the_target() {
        let definition = Definition::json(Arc::new(TypeRegistry::new()));
        let mapper = Mapper::new(&definition);

        let mut pair = Pair { a: 1, b: 2 };
        let mut body = Lookup::new();
        body.insert("a".into(), Value::from(5));
        let err = mapper.apply(&mut pair, &Value::Lookup(body)).unwrap_err();
        assert!(matches!(err, MapError::RequiredMemberMissing { member: "b", .. }));
        assert_eq!(pair, Pair { a: 1, b: 2 });

        let mut body = Lookup::new();
        body.insert("a".into(), Value::from(5));
        body.insert("b".into(), Value::from("not a number"));
        assert!(mapper.apply(&mut pair, &Value::Lookup(body)).is_err());
        assert_eq!(pair, Pair { a: 1, b: 2 });
    }

    /// Written by hand: `hidden` has no getter and `fixed` no setter.
    #[derive(Debug, PartialEq)]
    struct Sealed {
        open: u8,
        hidden: u8,
        fixed: u8,
    }

    impl Typed for Sealed {
        fn type_info() -> &'static TypeInfo {
            static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
            CELL.get_or_init(|| {
                let object = ObjectInfo::new(vec![
                    MemberInfo::new::<Sealed, u8>("open")
                        .with_marker(Role::element())
                        .with_getter(|owner| owner.downcast_ref::<Sealed>().map(|s| &s.open as &dyn Reflect))
                        .with_setter(|owner, value| {
                            let Some(owner) = owner.downcast_mut::<Sealed>() else {
                                return Err(value);
                            };
                            owner.open = value.take::<u8>()?;
                            Ok(())
                        }),
                    MemberInfo::new::<Sealed, u8>("hidden")
                        .with_marker(Role::element())
                        .with_setter(|owner, value| {
                            let Some(owner) = owner.downcast_mut::<Sealed>() else {
                                return Err(value);
                            };
                            owner.hidden = value.take::<u8>()?;
                            Ok(())
                        }),
                    MemberInfo::new::<Sealed, u8>("fixed")
                        .with_marker(Role::element())
                        .with_getter(|owner| owner.downcast_ref::<Sealed>().map(|s| &s.fixed as &dyn Reflect)),
                ])
                .with_marker(Participant);
                TypeInfo::new(Type::of::<Sealed>(), TypeKind::Object(object)).with_blank(|| {
                    Box::new(Sealed {
                        open: 0,
                        hidden: 0,
                        fixed: 0,
                    })
                })
            })
        }
    }

    impl Reflect for Sealed {
        #[inline]
        fn reflect_type_info(&self) -> &'static TypeInfo {
            <Self as Typed>::type_info()
        }

        impl_reflect_cast_fn!();

        #[inline]
        fn reflect_ref(&self) -> ReflectRef<'_> {
            ReflectRef::Object(self)
        }

        #[inline]
        fn reflect_mut(&mut self) -> ReflectMut<'_> {
            ReflectMut::Object(self)
        }
    }

    #[test]
    fn missing_accessors_fall_back() {
        let definition = Definition::json(Arc::new(TypeRegistry::new()));
        let mapper = Mapper::new(&definition);

        let data = mapper.to_value(&Sealed { open: 1, hidden: 2, fixed: 3 }).unwrap();
        assert_eq!(data.get("open"), Some(&Value::from(1)));
        assert_eq!(data.get("hidden"), Some(&Value::from(0)));
        assert_eq!(data.get("fixed"), Some(&Value::from(3)));

        let mut sealed = Sealed { open: 0, hidden: 0, fixed: 7 };
        let mut body = Lookup::new();
        body.insert("open".into(), Value::from(4));
        body.insert("hidden".into(), Value::from(5));
        body.insert("fixed".into(), Value::from(6));
        mapper.apply(&mut sealed, &Value::Lookup(body)).unwrap();
        assert_eq!(sealed, Sealed { open: 4, hidden: 5, fixed: 7 });
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_definitions_keep_order() {
        let definition = Definition::builder(registry())
            .with_default_processors()
            .parallel(true)
            .build()
            .unwrap();
        assert!(definition.is_parallel());
        let mapper = Mapper::new(&definition);

        let profiles: Vec<Profile> = (0..64)
            .map(|age| Profile { age, ..profile() })
            .collect();
        let data = mapper.to_value(&profiles).unwrap();
        let back: Vec<Profile> = mapper.from_value(&data).unwrap();
        assert_eq!(back, profiles);

        let mut broken = data.clone();
        if let Value::Sequence(items) = &mut broken {
            items[40].as_lookup_mut().unwrap().shift_remove("age");
        }
        let err = mapper.from_value::<Vec<Profile>>(&broken).unwrap_err();
        assert!(matches!(
            err,
            MapError::RequiredMemberMissing { member: "age", reason: "missing", .. }
        ));
    }
}
