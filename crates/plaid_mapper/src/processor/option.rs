use alloc::boxed::Box;
use alloc::format;

use super::{Mapper, Processor};
use crate::info::TypeInfo;
use crate::value::Value;
use crate::{MapError, Reflect, ReflectRef};

/// Maps `Option<T>`: `None` is null, `Some` is its content.
#[derive(Clone, Copy, Debug, Default)]
pub struct OptionProcessor;

impl Processor for OptionProcessor {
    #[inline]
    fn name(&self) -> &'static str {
        "option"
    }

    fn can_serialize(&self, value: &dyn Reflect, _mapper: &Mapper<'_>) -> bool {
        matches!(value.reflect_ref(), ReflectRef::Optional(_))
    }

    fn serialize(&self, value: &dyn Reflect, mapper: &Mapper<'_>) -> Result<Value, MapError> {
        match value.reflect_ref() {
            ReflectRef::Optional(Some(inner)) => mapper.serialize(inner),
            ReflectRef::Optional(None) => Ok(Value::Null),
            other => Err(MapError::unsupported(format!("{} as an option", other.kind_name()))),
        }
    }

    #[inline]
    fn can_deserialize(&self, target: &'static TypeInfo, _data: &Value, _mapper: &Mapper<'_>) -> bool {
        target.as_optional().is_some()
    }

    fn deserialize(&self, target: &'static TypeInfo, data: &Value, mapper: &Mapper<'_>) -> Result<Box<dyn Reflect>, MapError> {
        let Some(info) = target.as_optional() else {
            return Err(MapError::unsupported(format!("`{}` as an option", target.type_path())));
        };
        let inner = match data {
            Value::Null => None,
            data => Some(mapper.deserialize(info.some(), data)?),
        };
        info.wrap(inner)
            .map_err(|inner| MapError::conversion(format!("`{}`", inner.type_path()), target.type_path()))
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;

    use crate::processor::{Definition, Mapper};
    use crate::registry::TypeRegistry;
    use crate::Value;

    #[test]
    fn null_is_none() {
        let definition = Definition::json(Arc::new(TypeRegistry::new()));
        let mapper = Mapper::new(&definition);

        assert_eq!(mapper.to_value(&None::<i32>).unwrap(), Value::Null);
        assert_eq!(mapper.to_value(&Some(3_i32)).unwrap(), Value::from(3));
        assert_eq!(mapper.from_value::<Option<i32>>(&Value::Null).unwrap(), None);
        assert_eq!(mapper.from_value::<Option<String>>(&Value::from("a")).unwrap().as_deref(), Some("a"));
    }
}
