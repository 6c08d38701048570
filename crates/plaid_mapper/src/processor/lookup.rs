use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;

use super::{Mapper, Populate, Processor};
use crate::collections::insert_entry;
use crate::info::TypeInfo;
use crate::value::{Lookup, Value};
use crate::{MapError, Reflect, ReflectMut, ReflectRef};

/// Maps reflected maps to and from [`Value::Lookup`].
///
/// Keys are written as text: scalars through the format provider, enums by
/// variant name. On the way back each key is deserialized from that text.
#[derive(Clone, Copy, Debug, Default)]
pub struct LookupProcessor;

impl LookupProcessor {
    fn key_text(key: &dyn Reflect, mapper: &Mapper<'_>) -> Result<String, MapError> {
        let text = match key.reflect_ref() {
            ReflectRef::Scalar(scalar) => Some(mapper.definition().format().format_scalar(scalar)),
            ReflectRef::Enum(value) => value
                .reflect_type_info()
                .as_enum()
                .and_then(|e| e.name_of(value))
                .map(String::from),
            ReflectRef::Plain(plain) => plain.scalar_text(),
            _ => None,
        };
        text.ok_or_else(|| MapError::unsupported(format!("`{}` as a lookup key", key.type_path())))
    }

    /// A new `target` holding the converted `entries`.
    fn fill(target: &'static TypeInfo, entries: &Lookup, mapper: &Mapper<'_>) -> Result<Box<dyn Reflect>, MapError> {
        let Some(map_info) = target.as_map() else {
            return Err(MapError::unsupported(format!("`{}` as a lookup", target.type_path())));
        };
        let mut staged = target
            .blank()
            .ok_or_else(|| MapError::unsupported(format!("`{}` without a blank value", target.type_path())))?;
        let ReflectMut::Lookup(map) = staged.reflect_mut() else {
            return Err(MapError::unsupported(format!("`{}` as a lookup", target.type_path())));
        };

        for (key, entry) in entries {
            let inserted = mapper
                .deserialize(map_info.key(), &Value::String(key.clone()))
                .and_then(|k| Ok((k, mapper.deserialize(map_info.value(), entry)?)))
                .and_then(|(k, v)| insert_entry(map, k, v));
            match inserted {
                Ok(()) => {}
                Err(err) if err.is_element_failure() => {
                    log::warn!("dropping entry `{key}` of `{}`: {err}", target.type_path());
                }
                Err(err) => return Err(err),
            }
        }
        Ok(staged)
    }
}

impl Processor for LookupProcessor {
    #[inline]
    fn name(&self) -> &'static str {
        "lookup"
    }

    fn can_serialize(&self, value: &dyn Reflect, _mapper: &Mapper<'_>) -> bool {
        matches!(value.reflect_ref(), ReflectRef::Lookup(_))
    }

    fn serialize(&self, value: &dyn Reflect, mapper: &Mapper<'_>) -> Result<Value, MapError> {
        let ReflectRef::Lookup(map) = value.reflect_ref() else {
            return Err(MapError::unsupported(format!("`{}` as a lookup", value.type_path())));
        };
        let mut data = Lookup::with_capacity(map.len());
        for (key, entry) in map.iter() {
            let key = Self::key_text(key, mapper)?;
            let entry = mapper.serialize(entry)?;
            if data.insert(key, entry).is_some() {
                log::warn!("two keys of `{}` share a text form, keeping the last", value.type_path());
            }
        }
        Ok(Value::Lookup(data))
    }

    fn can_deserialize(&self, target: &'static TypeInfo, data: &Value, _mapper: &Mapper<'_>) -> bool {
        target.as_map().is_some() && matches!(data, Value::Lookup(_))
    }

    fn deserialize(&self, target: &'static TypeInfo, data: &Value, mapper: &Mapper<'_>) -> Result<Box<dyn Reflect>, MapError> {
        let Value::Lookup(entries) = data else {
            return Err(MapError::unsupported(format!("{} data for `{}`", data.kind_name(), target.type_path())));
        };
        Self::fill(target, entries, mapper)
    }

    #[inline]
    fn as_populate(&self) -> Option<&dyn Populate> {
        Some(self)
    }
}

impl Populate for LookupProcessor {
    fn can_populate(&self, target: &'static TypeInfo, data: &Value, mapper: &Mapper<'_>) -> bool {
        self.can_deserialize(target, data, mapper)
    }

    /// Replaces the content of the target map.
    ///
    /// The content is built aside first; on error the target is untouched.
    fn populate(&self, target: &mut dyn Reflect, data: &Value, mapper: &Mapper<'_>) -> Result<(), MapError> {
        let info = target.reflect_type_info();
        let Value::Lookup(entries) = data else {
            return Err(MapError::unsupported(format!("{} data for `{}`", data.kind_name(), info.type_path())));
        };
        let staged = Self::fill(info, entries, mapper)?;
        target
            .assign(staged)
            .map_err(|staged| MapError::conversion(format!("`{}`", staged.type_path()), info.type_path()))
    }
}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::sync::Arc;

    use indexmap::IndexMap;

    use crate::derive::Mapped;
    use crate::processor::{Definition, Mapper};
    use crate::registry::TypeRegistry;
    use crate::value::{Lookup, Value};
    use crate::MapError;

    #[test]
    fn keys_go_through_text() {
        let definition = Definition::json(Arc::new(TypeRegistry::new()));
        let mapper = Mapper::new(&definition);

        let mut scores = BTreeMap::new();
        scores.insert(2_u32, String::from("b"));
        scores.insert(10_u32, String::from("a"));
        let data = mapper.to_value(&scores).unwrap();
        let lookup = data.as_lookup().unwrap();
        assert_eq!(lookup.get("2"), Some(&Value::from("b")));
        assert_eq!(lookup.get("10"), Some(&Value::from("a")));

        let back: BTreeMap<u32, String> = mapper.from_value(&data).unwrap();
        assert_eq!(back, scores);
    }

    #[test]
    fn bad_entries_are_dropped() {
        let definition = Definition::json(Arc::new(TypeRegistry::new()));
        let mapper = Mapper::new(&definition);

        let mut data = Lookup::new();
        data.insert("1".into(), Value::from(true));
        data.insert("one".into(), Value::from(false));
        data.insert("2".into(), Value::from("yes"));

        let map: IndexMap<i8, bool> = mapper.from_value(&Value::Lookup(data)).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&1), Some(&true));
    }

    #[derive(Mapped, Debug, PartialEq)]
    struct Limit {
        #[mapping(required(null_check))]
        max: u32,
    }

    #[test]
    fn failed_populate_keeps_the_entries() {
        let definition = Definition::json(Arc::new(TypeRegistry::new()));
        let mapper = Mapper::new(&definition);

        let mut limits = BTreeMap::new();
        limits.insert(String::from("cpu"), Limit { max: 4 });

        let mut max = Lookup::new();
        max.insert("max".into(), Value::Null);
        let mut data = Lookup::new();
        data.insert("mem".into(), Value::Lookup(Lookup::new()));
        data.insert("disk".into(), Value::Lookup(max));

        let err = mapper.apply(&mut limits, &Value::Lookup(data)).unwrap_err();
        assert!(matches!(err, MapError::RequiredMemberMissing { member: "max", .. }));
        assert_eq!(limits.len(), 1);
        assert_eq!(limits.get("cpu"), Some(&Limit { max: 4 }));
    }
}
