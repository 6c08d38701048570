use alloc::boxed::Box;

use super::{Mapper, Populate, Processor};
use crate::info::TypeInfo;
use crate::value::Value;
use crate::{MapError, Reflect, ReflectMut, ReflectRef};

/// Passes [`Value`] members through unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainValueProcessor;

impl Processor for PlainValueProcessor {
    #[inline]
    fn name(&self) -> &'static str {
        "plain"
    }

    fn can_serialize(&self, value: &dyn Reflect, _mapper: &Mapper<'_>) -> bool {
        matches!(value.reflect_ref(), ReflectRef::Plain(_))
    }

    fn serialize(&self, value: &dyn Reflect, _mapper: &Mapper<'_>) -> Result<Value, MapError> {
        match value.reflect_ref() {
            ReflectRef::Plain(plain) => Ok(plain.clone()),
            other => Err(MapError::unsupported(alloc::format!("{} as plain data", other.kind_name()))),
        }
    }

    #[inline]
    fn can_deserialize(&self, target: &'static TypeInfo, _data: &Value, _mapper: &Mapper<'_>) -> bool {
        target.is_plain()
    }

    fn deserialize(&self, _target: &'static TypeInfo, data: &Value, _mapper: &Mapper<'_>) -> Result<Box<dyn Reflect>, MapError> {
        Ok(Box::new(data.clone()))
    }

    #[inline]
    fn as_populate(&self) -> Option<&dyn Populate> {
        Some(self)
    }
}

impl Populate for PlainValueProcessor {
    #[inline]
    fn can_populate(&self, target: &'static TypeInfo, _data: &Value, _mapper: &Mapper<'_>) -> bool {
        target.is_plain()
    }

    fn populate(&self, target: &mut dyn Reflect, data: &Value, _mapper: &Mapper<'_>) -> Result<(), MapError> {
        match target.reflect_mut() {
            ReflectMut::Plain(plain) => {
                *plain = data.clone();
                Ok(())
            }
            _ => Err(MapError::unsupported("a non-plain target for plain data")),
        }
    }
}
