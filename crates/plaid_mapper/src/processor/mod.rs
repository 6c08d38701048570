//! Processors, the serialization [`Definition`] and the [`Mapper`] dispatcher.
//!
//! A [`Definition`] owns an ordered list of processors. For every value the
//! [`Mapper`] asks each processor in turn whether it handles the value (or,
//! when deserializing, the target type and the data) and lets the first one
//! that does produce the result. Nested values recurse through the same
//! [`Mapper`], so one definition drives a whole object graph.
//!
//! Order is configuration: exact-type processors must come before the
//! generic collection and object fallbacks. See [`default_processors`].

mod definition;
mod enums;
mod format;
mod lookup;
mod mapper;
mod object;
mod option;
mod plain;
mod poly;
mod scalar;
mod sequence;

pub use definition::{Definition, DefinitionBuilder, ObjectLayout};
pub use enums::EnumProcessor;
pub use format::{FormatProvider, InvariantFormat, ScalarSupport};
pub use lookup::LookupProcessor;
pub use mapper::Mapper;
pub use object::ObjectProcessor;
pub use option::OptionProcessor;
pub use plain::PlainValueProcessor;
pub use poly::PolyProcessor;
pub use scalar::ScalarProcessor;
pub use sequence::SequenceProcessor;

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::info::TypeInfo;
use crate::value::Value;
use crate::{MapError, Reflect};

/// A predicate-guarded rule mapping a scope of values to and from plain data.
///
/// ## Dispatch
///
/// The [`Mapper`] only calls [`serialize`](Processor::serialize) after
/// [`can_serialize`](Processor::can_serialize) returned `true` for the same
/// value, and [`deserialize`](Processor::deserialize) after
/// [`can_deserialize`](Processor::can_deserialize) accepted the target and
/// the data. An error returned after that aborts the whole call; it does not
/// hand the value on to the next processor.
///
/// ## Populate
///
/// Processors that can write onto an existing instance expose it through
/// [`as_populate`](Processor::as_populate). Scalar-like processors do not:
/// they always produce fresh values.
pub trait Processor: Send + Sync {
    /// A short name used in diagnostics.
    fn name(&self) -> &'static str;

    fn can_serialize(&self, value: &dyn Reflect, mapper: &Mapper<'_>) -> bool;

    fn serialize(&self, value: &dyn Reflect, mapper: &Mapper<'_>) -> Result<Value, MapError>;

    fn can_deserialize(&self, target: &'static TypeInfo, data: &Value, mapper: &Mapper<'_>) -> bool;

    /// Produces a new instance of `target`.
    ///
    /// The returned box must hold exactly the type `target` describes.
    fn deserialize(&self, target: &'static TypeInfo, data: &Value, mapper: &Mapper<'_>) -> Result<Box<dyn Reflect>, MapError>;

    #[inline]
    fn as_populate(&self) -> Option<&dyn Populate> {
        None
    }
}

/// Deserialization onto an already existing instance.
pub trait Populate: Send + Sync {
    fn can_populate(&self, target: &'static TypeInfo, data: &Value, mapper: &Mapper<'_>) -> bool;

    fn populate(&self, target: &mut dyn Reflect, data: &Value, mapper: &Mapper<'_>) -> Result<(), MapError>;
}

/// The built-in processors in their default order.
///
/// Plain values, scalars, enums, optionals and polymorphic slots come first,
/// then sequences and lookups, and derived objects last.
pub fn default_processors() -> Vec<Arc<dyn Processor>> {
    alloc::vec![
        Arc::new(PlainValueProcessor),
        Arc::new(ScalarProcessor),
        Arc::new(EnumProcessor),
        Arc::new(OptionProcessor),
        Arc::new(PolyProcessor),
        Arc::new(SequenceProcessor),
        Arc::new(LookupProcessor),
        Arc::new(ObjectProcessor),
    ]
}
