use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use super::Definition;
use crate::features::resolution::TypeResolver;
use crate::info::TypeInfo;
use crate::registry::TypeRegistry;
use crate::value::Value;
use crate::{MapError, Reflect, ScalarRef, Typed};

/// Dispatches values through the processors of a [`Definition`].
///
/// A `Mapper` is a borrowed view; create one per call site, it costs nothing.
///
/// ```
/// use std::sync::Arc;
/// use plaid_mapper::processor::{Definition, Mapper};
/// use plaid_mapper::registry::TypeRegistry;
/// use plaid_mapper::Value;
///
/// let definition = Definition::json(Arc::new(TypeRegistry::new()));
/// let mapper = Mapper::new(&definition);
///
/// let data = mapper.to_value(&vec![1_u8, 2, 3]).unwrap();
/// assert_eq!(data, Value::from(vec![Value::from(1), Value::from(2), Value::from(3)]));
///
/// let back: Vec<u8> = mapper.from_value(&data).unwrap();
/// assert_eq!(back, [1, 2, 3]);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Mapper<'a> {
    definition: &'a Definition,
}

impl<'a> Mapper<'a> {
    #[inline]
    pub const fn new(definition: &'a Definition) -> Self {
        Self { definition }
    }

    #[inline]
    pub const fn definition(&self) -> &'a Definition {
        self.definition
    }

    #[inline]
    pub fn registry(&self) -> &'a TypeRegistry {
        self.definition.registry()
    }

    /// The resolver using the definition's discriminator key and slot 0.
    #[inline]
    pub fn resolver(&self) -> TypeResolver<'a> {
        TypeResolver::new(self.registry(), self.definition.discriminator_key(), 0)
    }

    /// Serializes `value` with the first processor that accepts it.
    pub fn serialize(&self, value: &dyn Reflect) -> Result<Value, MapError> {
        for processor in self.definition.processors() {
            if processor.can_serialize(value, self) {
                log::trace!("`{}` serializes `{}`", processor.name(), value.type_path());
                return processor.serialize(value, self);
            }
        }
        Err(MapError::unsupported(format!("`{}`", value.type_path())))
    }

    /// Deserializes a new `target` with the first processor that accepts it.
    pub fn deserialize(&self, target: &'static TypeInfo, data: &Value) -> Result<Box<dyn Reflect>, MapError> {
        for processor in self.definition.processors() {
            if processor.can_deserialize(target, data, self) {
                log::trace!("`{}` deserializes `{}`", processor.name(), target.type_path());
                return processor.deserialize(target, data, self);
            }
        }
        Err(MapError::unsupported(unclaimed(target, data)))
    }

    /// Narrows `target` through the discriminators in `data`, then deserializes.
    ///
    /// The result is an instance of the resolved type, which may be any type
    /// assignable to `target`.
    pub fn deserialize_resolved(&self, target: &'static TypeInfo, data: &Value) -> Result<Box<dyn Reflect>, MapError> {
        let resolved = self.resolver().resolve(target, data)?;
        self.deserialize(resolved, data)
    }

    /// Writes `data` onto an existing instance.
    ///
    /// Only processors supporting [`Populate`](super::Populate) take part.
    /// Members absent from `data` keep their current values, so partial data
    /// from several sources can be applied one after another.
    pub fn deserialize_into(&self, target: &mut dyn Reflect, data: &Value) -> Result<(), MapError> {
        let info = target.reflect_type_info();
        for processor in self.definition.processors() {
            let Some(populate) = processor.as_populate() else {
                continue;
            };
            if populate.can_populate(info, data, self) {
                log::trace!("`{}` populates `{}`", processor.name(), info.type_path());
                return populate.populate(target, data, self);
            }
        }
        Err(MapError::unsupported(unclaimed(info, data)))
    }

    #[inline]
    pub fn to_value<T: Reflect>(&self, value: &T) -> Result<Value, MapError> {
        self.serialize(value.as_reflect())
    }

    pub fn from_value<T: Typed>(&self, data: &Value) -> Result<T, MapError> {
        self.deserialize(T::type_info(), data)?
            .take::<T>()
            .map_err(|other| MapError::conversion(format!("`{}`", other.type_path()), T::type_info().type_path()))
    }

    /// Typed version of [`deserialize_into`](Self::deserialize_into).
    #[inline]
    pub fn apply<T: Reflect>(&self, target: &mut T, data: &Value) -> Result<(), MapError> {
        self.deserialize_into(target.as_reflect_mut(), data)
    }

    /// A scalar as plain data: native when the definition supports its kind,
    /// otherwise text from the format provider.
    pub fn scalar_value(&self, scalar: ScalarRef<'_>) -> Value {
        if self.definition.scalars().supports(&scalar) {
            scalar.to_value()
        } else {
            Value::String(self.definition.format().format_scalar(scalar))
        }
    }

    /// Position of the first member in sequence-style data of `info`.
    ///
    /// Types with discriminators keep slot 0 for them.
    pub fn sequence_offset(&self, info: &'static TypeInfo) -> usize {
        if self.registry().resolution_table(info).is_empty() { 0 } else { 1 }
    }

    /// Maps every item, in parallel when the definition asks for it.
    ///
    /// The output keeps the input order.
    pub(crate) fn map_all<T, R, F>(&self, items: &[T], f: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(usize, &T) -> R + Send + Sync,
    {
        #[cfg(feature = "parallel")]
        if self.definition.is_parallel() {
            use rayon::prelude::*;
            return items.par_iter().enumerate().map(|(i, item)| f(i, item)).collect();
        }
        items.iter().enumerate().map(|(i, item)| f(i, item)).collect()
    }
}

fn unclaimed(target: &'static TypeInfo, data: &Value) -> String {
    if data.is_null() {
        format!("null for `{}`", target.type_path())
    } else {
        format!("{} data for `{}`", data.kind_name(), target.type_path())
    }
}
