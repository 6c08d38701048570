use alloc::boxed::Box;
use alloc::format;

use super::{Mapper, Processor};
use crate::info::{ScalarKind, TypeInfo};
use crate::value::Value;
use crate::{MapError, Reflect, ReflectRef, ScalarRef};

/// Maps booleans, characters, numbers and strings.
///
/// Numbers and booleans arriving as strings, as they do from dictionaries
/// and XML, are parsed through the definition's format provider.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScalarProcessor;

impl ScalarProcessor {
    fn read<'v>(kind: ScalarKind, data: &'v Value, mapper: &Mapper<'_>) -> Option<ScalarRef<'v>> {
        let format = mapper.definition().format();
        match (kind, data) {
            (kind, Value::String(text)) if kind.is_numeric() => format.parse_number(text).map(|n| n.as_scalar()),
            (ScalarKind::Bool, Value::String(text)) => format.parse_bool(text).map(ScalarRef::Bool),
            _ => ScalarRef::from_value(data),
        }
    }
}

impl Processor for ScalarProcessor {
    #[inline]
    fn name(&self) -> &'static str {
        "scalar"
    }

    fn can_serialize(&self, value: &dyn Reflect, _mapper: &Mapper<'_>) -> bool {
        matches!(value.reflect_ref(), ReflectRef::Scalar(_))
    }

    fn serialize(&self, value: &dyn Reflect, mapper: &Mapper<'_>) -> Result<Value, MapError> {
        match value.reflect_ref() {
            ReflectRef::Scalar(scalar) => Ok(mapper.scalar_value(scalar)),
            other => Err(MapError::unsupported(format!("{} as a scalar", other.kind_name()))),
        }
    }

    fn can_deserialize(&self, target: &'static TypeInfo, data: &Value, _mapper: &Mapper<'_>) -> bool {
        target.as_scalar().is_some() && data.is_scalar()
    }

    fn deserialize(&self, target: &'static TypeInfo, data: &Value, mapper: &Mapper<'_>) -> Result<Box<dyn Reflect>, MapError> {
        let failed = || MapError::conversion(format!("{} `{data}`", data.kind_name()), target.type_path());
        let info = target.as_scalar().ok_or_else(failed)?;
        Self::read(info.kind(), data, mapper)
            .and_then(|scalar| info.from_scalar(scalar))
            .ok_or_else(failed)
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;

    use crate::processor::{Definition, Mapper};
    use crate::registry::TypeRegistry;
    use crate::{MapError, Value};

    #[test]
    fn strings_parse_through_the_format() {
        let definition = Definition::dictionary(Arc::new(TypeRegistry::new()));
        let mapper = Mapper::new(&definition);

        assert_eq!(mapper.from_value::<u16>(&Value::from("512")).unwrap(), 512);
        assert_eq!(mapper.from_value::<f32>(&Value::from("0.25")).unwrap(), 0.25);
        assert!(mapper.from_value::<bool>(&Value::from("True")).unwrap());
        assert_eq!(mapper.to_value(&7_i64).unwrap(), Value::from("7"));
        assert_eq!(mapper.to_value(&true).unwrap(), Value::from("true"));
    }

    #[test]
    fn out_of_range_fails() {
        let definition = Definition::json(Arc::new(TypeRegistry::new()));
        let mapper = Mapper::new(&definition);

        let err = mapper.from_value::<u8>(&Value::from(300)).unwrap_err();
        assert!(matches!(err, MapError::Conversion { to: "u8", .. }));
        let err = mapper.from_value::<u8>(&Value::Null).unwrap_err();
        assert!(matches!(err, MapError::UnsupportedValue { .. }));
    }
}
