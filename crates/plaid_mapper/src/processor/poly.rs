use alloc::boxed::Box;
use alloc::format;

use super::{Mapper, Processor};
use crate::error::TypeResolutionError;
use crate::info::TypeInfo;
use crate::value::Value;
use crate::{MapError, Reflect, ReflectRef};

/// Maps [`Poly`](crate::impls::Poly) slots.
///
/// Serialization writes the concrete value, whose object processor adds the
/// discriminators. Deserialization resolves the concrete type from those
/// discriminators before building it.
#[derive(Clone, Copy, Debug, Default)]
pub struct PolyProcessor;

impl Processor for PolyProcessor {
    #[inline]
    fn name(&self) -> &'static str {
        "poly"
    }

    fn can_serialize(&self, value: &dyn Reflect, _mapper: &Mapper<'_>) -> bool {
        matches!(value.reflect_ref(), ReflectRef::Polymorphic(_))
    }

    fn serialize(&self, value: &dyn Reflect, mapper: &Mapper<'_>) -> Result<Value, MapError> {
        match value.reflect_ref() {
            ReflectRef::Polymorphic(inner) => mapper.serialize(inner),
            other => Err(MapError::unsupported(format!("{} as a polymorphic slot", other.kind_name()))),
        }
    }

    fn can_deserialize(&self, target: &'static TypeInfo, data: &Value, _mapper: &Mapper<'_>) -> bool {
        target.as_poly().is_some() && !data.is_null()
    }

    fn deserialize(&self, target: &'static TypeInfo, data: &Value, mapper: &Mapper<'_>) -> Result<Box<dyn Reflect>, MapError> {
        let Some(info) = target.as_poly() else {
            return Err(MapError::unsupported(format!("`{}` as a polymorphic slot", target.type_path())));
        };
        let concrete = mapper.deserialize_resolved(info.base(), data)?;
        info.wrap(concrete).map_err(|concrete| {
            TypeResolutionError::NotAssignable {
                value: concrete.type_path(),
                slot: target.type_path(),
            }
            .into()
        })
    }
}
