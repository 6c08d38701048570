//! Code generation for `#[derive(Mapped)]`.

// -----------------------------------------------------------------------------
// Modules

mod auto_register;
mod enum_kind;
mod struct_kind;
mod trait_blank;
mod trait_reflect;
mod trait_typed;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use auto_register::get_auto_register_impl;
pub(crate) use enum_kind::match_enum;
pub(crate) use struct_kind::match_struct;
pub(crate) use trait_blank::impl_trait_blank;
pub(crate) use trait_reflect::impl_trait_reflect;
pub(crate) use trait_typed::impl_trait_typed;
