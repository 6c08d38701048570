//! The type registry and its member cache.
//!
//! ## Menu
//!
//! - [`TypeRegistry`]: registered types, known marker types and the caches
//!   derived from them.
//! - [`CacheEntry`]: the members of one type carrying one marker, linked to
//!   the entry of its base type.
//! - [`CachedMember`]: a member paired with the marker it was selected by.
//!
//! ## auto_register
//!
//! Types deriving `Mapped` with `#[mapping(auto_register)]` are collected
//! through the [`inventory`] crate; see [`TypeRegistry::auto_register`].
//! Not every platform supports static collection, in which case the call
//! reports `false` and nothing is registered.

// -----------------------------------------------------------------------------
// Modules

mod auto_register;
mod member_cache;
mod type_registry;

// -----------------------------------------------------------------------------
// Exports

#[cfg(feature = "auto_register")]
pub use auto_register::{AutoRegisterFunc, register_type};
pub use member_cache::{CacheEntry, CachedMember};
pub use type_registry::TypeRegistry;
