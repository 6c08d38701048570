// -----------------------------------------------------------------------------
// Modules

mod access;
mod kinds;
mod reflect;

// -----------------------------------------------------------------------------
// Exports

pub use access::{List, ListIter, Map};
pub use kinds::{ReflectMut, ReflectRef, ScalarRef};
pub use reflect::{Blank, Reflect, Typed, upcast, upcast_mut};

pub(crate) use reflect::impl_reflect_cast_fn;
