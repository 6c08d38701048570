use alloc::boxed::Box;
use alloc::format;

use super::{Mapper, Processor};
use crate::info::TypeInfo;
use crate::value::Value;
use crate::{MapError, Reflect, ReflectRef};

/// Maps fieldless enums by variant name; numeric data selects by index.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnumProcessor;

impl Processor for EnumProcessor {
    #[inline]
    fn name(&self) -> &'static str {
        "enum"
    }

    fn can_serialize(&self, value: &dyn Reflect, _mapper: &Mapper<'_>) -> bool {
        matches!(value.reflect_ref(), ReflectRef::Enum(_))
    }

    fn serialize(&self, value: &dyn Reflect, _mapper: &Mapper<'_>) -> Result<Value, MapError> {
        let info = value.reflect_type_info();
        info.as_enum()
            .and_then(|e| e.name_of(value))
            .map(|name| Value::String(name.into()))
            .ok_or_else(|| MapError::unsupported(format!("an unknown variant of `{}`", info.type_path())))
    }

    fn can_deserialize(&self, target: &'static TypeInfo, data: &Value, _mapper: &Mapper<'_>) -> bool {
        target.as_enum().is_some() && matches!(data, Value::String(_) | Value::Number(_))
    }

    fn deserialize(&self, target: &'static TypeInfo, data: &Value, _mapper: &Mapper<'_>) -> Result<Box<dyn Reflect>, MapError> {
        let variant = target.as_enum().and_then(|e| match data {
            Value::String(name) => e.from_name(name),
            Value::Number(n) => n.as_u64().and_then(|i| usize::try_from(i).ok()).and_then(|i| e.from_index(i)),
            _ => None,
        });
        variant.ok_or_else(|| MapError::conversion(format!("{} `{data}`", data.kind_name()), target.type_path()))
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;

    use crate::derive::Mapped;
    use crate::processor::{Definition, Mapper};
    use crate::registry::TypeRegistry;
    use crate::Value;

    #[derive(Mapped, Debug, PartialEq)]
    enum Weather {
        Sunny,
        #[mapping(rename = "rain")]
        Rainy,
    }

    #[test]
    fn variants_by_name_and_index() {
        let definition = Definition::json(Arc::new(TypeRegistry::new()));
        let mapper = Mapper::new(&definition);

        assert_eq!(mapper.to_value(&Weather::Rainy).unwrap(), Value::from("rain"));
        assert_eq!(mapper.from_value::<Weather>(&Value::from("Sunny")).unwrap(), Weather::Sunny);
        assert_eq!(mapper.from_value::<Weather>(&Value::from(1)).unwrap(), Weather::Rainy);
        assert!(mapper.from_value::<Weather>(&Value::from("Rainy")).is_err());
        assert!(mapper.from_value::<Weather>(&Value::from(2)).is_err());
    }
}
