use alloc::boxed::Box;
use alloc::format;
use alloc::vec::Vec;

use super::{Mapper, Populate, Processor};
use crate::collections::insert_at;
use crate::info::{Backing, TypeInfo};
use crate::value::Value;
use crate::{MapError, Reflect, ReflectMut, ReflectRef};

/// Maps reflected sequences to and from [`Value::Sequence`].
///
/// While deserializing, an element that fails its type constraint is
/// dropped with a warning instead of failing the whole sequence.
#[derive(Clone, Copy, Debug, Default)]
pub struct SequenceProcessor;

impl Processor for SequenceProcessor {
    #[inline]
    fn name(&self) -> &'static str {
        "sequence"
    }

    fn can_serialize(&self, value: &dyn Reflect, _mapper: &Mapper<'_>) -> bool {
        matches!(value.reflect_ref(), ReflectRef::Sequence(_))
    }

    fn serialize(&self, value: &dyn Reflect, mapper: &Mapper<'_>) -> Result<Value, MapError> {
        let ReflectRef::Sequence(list) = value.reflect_ref() else {
            return Err(MapError::unsupported(format!("`{}` as a sequence", value.type_path())));
        };
        let items: Vec<&dyn Reflect> = list.iter().collect();
        mapper
            .map_all(&items, |_, item| mapper.serialize(*item))
            .into_iter()
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Sequence)
    }

    fn can_deserialize(&self, target: &'static TypeInfo, data: &Value, _mapper: &Mapper<'_>) -> bool {
        target.as_list().is_some() && matches!(data, Value::Sequence(_))
    }

    fn deserialize(&self, target: &'static TypeInfo, data: &Value, mapper: &Mapper<'_>) -> Result<Box<dyn Reflect>, MapError> {
        let Value::Sequence(items) = data else {
            return Err(MapError::unsupported(format!("{} data for `{}`", data.kind_name(), target.type_path())));
        };
        Self::fill(target, items, mapper)
    }

    #[inline]
    fn as_populate(&self) -> Option<&dyn Populate> {
        Some(self)
    }
}

impl SequenceProcessor {
    /// A new `target` holding the converted `items`.
    fn fill(target: &'static TypeInfo, items: &[Value], mapper: &Mapper<'_>) -> Result<Box<dyn Reflect>, MapError> {
        let Some(list_info) = target.as_list() else {
            return Err(MapError::unsupported(format!("`{}` as a sequence", target.type_path())));
        };
        let mut staged = target
            .blank()
            .ok_or_else(|| MapError::unsupported(format!("`{}` without a blank value", target.type_path())))?;
        let ReflectMut::Sequence(list) = staged.reflect_mut() else {
            return Err(MapError::unsupported(format!("`{}` as a sequence", target.type_path())));
        };
        let item = list_info.item();
        let fixed = matches!(list_info.backing(), Backing::Fixed(_));

        let converted = mapper.map_all(items, |_, data| mapper.deserialize(item, data));
        let mut next = 0;
        for (position, element) in converted.into_iter().enumerate() {
            let index = if fixed { position } else { next };
            let inserted = element.and_then(|element| insert_at(list, index, element));
            match inserted {
                Ok(()) => next += 1,
                Err(err) if err.is_element_failure() => {
                    log::warn!("dropping element {position} of `{}`: {err}", target.type_path());
                }
                Err(err) => return Err(err),
            }
        }
        Ok(staged)
    }
}

impl Populate for SequenceProcessor {
    fn can_populate(&self, target: &'static TypeInfo, data: &Value, mapper: &Mapper<'_>) -> bool {
        self.can_deserialize(target, data, mapper)
    }

    /// Replaces the content of the target sequence.
    ///
    /// The content is built aside first; on error the target is untouched.
    /// Read-only sequences are never replaced.
    fn populate(&self, target: &mut dyn Reflect, data: &Value, mapper: &Mapper<'_>) -> Result<(), MapError> {
        let info = target.reflect_type_info();
        let (Some(list_info), Value::Sequence(items)) = (info.as_list(), data) else {
            return Err(MapError::unsupported(format!("{} data for `{}`", data.kind_name(), info.type_path())));
        };
        let staged = Self::fill(info, items, mapper)?;
        if matches!(list_info.backing(), Backing::ReadOnly) {
            return Ok(());
        }
        target
            .assign(staged)
            .map_err(|staged| MapError::conversion(format!("`{}`", staged.type_path()), info.type_path()))
    }
}

#[cfg(test)]
mod tests {
    use alloc::collections::VecDeque;
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec;
    use alloc::vec::Vec;

    use crate::derive::Mapped;
    use crate::error::CollectionError;
    use crate::processor::{Definition, Mapper};
    use crate::value::Lookup;
    use crate::registry::TypeRegistry;
    use crate::{MapError, Value};

    fn definition() -> Definition {
        Definition::json(Arc::new(TypeRegistry::new()))
    }

    #[test]
    fn failing_elements_are_dropped() {
        let definition = definition();
        let mapper = Mapper::new(&definition);
        let data = Value::from(vec![Value::from(1), Value::from("x"), Value::from(3)]);

        let list: Vec<i32> = mapper.from_value(&data).unwrap();
        assert_eq!(list, [1, 3]);

        let deque: VecDeque<String> = mapper.from_value(&data).unwrap();
        assert_eq!(deque, ["1", "x", "3"]);
    }

    #[test]
    fn fixed_arrays() {
        let definition = definition();
        let mapper = Mapper::new(&definition);

        let array: [u8; 4] = mapper.from_value(&Value::from(vec![Value::from(1), Value::from("no")])).unwrap();
        assert_eq!(array, [1, 0, 0, 0]);

        let long = Value::from((0..5).map(Value::from).collect::<Vec<_>>());
        let err = mapper.from_value::<[u8; 4]>(&long).unwrap_err();
        assert!(matches!(
            err,
            MapError::Collection(CollectionError::OutOfBounds { index: 4, capacity: 4, .. })
        ));
    }

    #[test]
    fn populate_replaces_content() {
        let definition = definition();
        let mapper = Mapper::new(&definition);

        let mut list = vec![9_i64, 9, 9];
        mapper.apply(&mut list, &Value::from(vec![Value::from(1)])).unwrap();
        assert_eq!(list, [1]);
        assert_eq!(mapper.to_value(&list).unwrap(), Value::from(vec![Value::from(1)]));
    }

    #[derive(Mapped, Debug, PartialEq)]
    struct Inner {
        #[mapping(required)]
        x: i32,
    }

    #[test]
    fn failed_populate_keeps_the_elements() {
        let definition = definition();
        let mapper = Mapper::new(&definition);

        let mut x = Lookup::new();
        x.insert("x".into(), Value::from(9));
        let data = Value::from(vec![Value::Lookup(x), Value::Lookup(Lookup::new())]);

        let mut list = vec![Inner { x: 1 }, Inner { x: 2 }];
        let err = mapper.apply(&mut list, &data).unwrap_err();
        assert!(matches!(err, MapError::RequiredMemberMissing { member: "x", .. }));
        assert_eq!(list, [Inner { x: 1 }, Inner { x: 2 }]);

        let mut array = [3_u8, 4];
        let long = Value::from(vec![Value::from(1), Value::from(2), Value::from(3)]);
        assert!(mapper.apply(&mut array, &long).is_err());
        assert_eq!(array, [3, 4]);
    }

    #[test]
    fn read_only_sequences_stay_shared() {
        let definition = definition();
        let mapper = Mapper::new(&definition);

        let mut shared: Arc<[u8]> = Arc::from([1_u8, 2]);
        mapper.apply(&mut shared, &Value::Sequence(Vec::new())).unwrap();
        assert_eq!(&*shared, [1, 2]);

        let err = mapper.apply(&mut shared, &Value::from(vec![Value::from(5)])).unwrap_err();
        assert!(matches!(err, MapError::Collection(CollectionError::ReadOnly { index: 0, .. })));
        assert_eq!(&*shared, [1, 2]);
    }
}
