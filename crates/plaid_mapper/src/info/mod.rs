//! Static type descriptors.
//!
//! Every [`Typed`](crate::Typed) type owns one leaked [`TypeInfo`], created
//! lazily on first access through a [`NonGenericTypeInfoCell`] or a
//! [`GenericTypeInfoCell`]. Nested descriptors are referenced through
//! `fn() -> &'static TypeInfo` so that recursive types do not deadlock
//! their own initialization.

// -----------------------------------------------------------------------------
// Modules

mod cell;
mod collection_info;
mod enum_info;
mod member_info;
mod object_info;
mod scalar_info;
mod type_info;

pub mod markers;

// -----------------------------------------------------------------------------
// Exports

pub use cell::{GenericTypeInfoCell, NonGenericTypeInfoCell};
pub use collection_info::{Backing, ElementConstraint, ListInfo, MapInfo, OptionalInfo, PolyInfo};
pub use enum_info::EnumInfo;
pub use member_info::MemberInfo;
pub use object_info::{BaseLink, HookInfo, HookKind, ObjectInfo, Resolution};
pub use scalar_info::{FromScalar, ScalarInfo, ScalarKind};
pub use type_info::{Ancestors, Type, TypeInfo, TypeKind};
