//! Small containers shared by the `plaid` crates.
//!
//! - [`TypeIdMap`]: a map keyed by [`TypeId`](core::any::TypeId) without rehashing the id.
//! - [`ConcurrentCache`]: a read-through cache that tolerates racing first computations.
//! - [`hash`]: fixed-seed hashing and the `hashbrown` aliases used across the workspace.
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod cache;
mod typeid_map;

pub mod hash;

// -----------------------------------------------------------------------------
// Top-level exports

pub use cache::ConcurrentCache;
pub use typeid_map::TypeIdMap;
