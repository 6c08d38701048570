//! [`Reflect`](crate::Reflect) implementations for foreign types.
//!
//! - scalars: `bool`, `char`, integers, floats and `String`;
//! - `Option<T>`;
//! - sequences: `Vec<T>`, `VecDeque<T>`, `[T; N]` and the read-only `Arc<[T]>`;
//! - lookups: `HashMap`, `BTreeMap` and `IndexMap`;
//! - [`Value`](crate::Value) itself;
//! - [`Poly<B>`], the polymorphic slot.

// -----------------------------------------------------------------------------
// Modules

mod lookups;
mod option;
mod poly;
mod scalars;
mod sequences;
mod value;

// -----------------------------------------------------------------------------
// Exports

pub use poly::Poly;
