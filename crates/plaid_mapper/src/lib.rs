//! Declarative mapping between typed Rust values and plain data.
//!
//! Types describe themselves through `#[derive(Mapped)]`: every field becomes
//! a member carrying [markers](info::markers), and the engine maps values to
//! and from [`Value`] through an ordered chain of [processors](processor).
//! Text codecs (JSON, XML) live in sibling crates and only see [`Value`]s or
//! the member tables exposed here.
//!
//! # Overview
//!
//! - [`value`]: the plain data model shared by every wire format.
//! - [`Reflect`], [`Typed`], [`Blank`]: the dynamic object model.
//! - [`info`]: static per-type descriptors and markers.
//! - [`registry`]: the [`TypeRegistry`](registry::TypeRegistry) and its member cache.
//! - [`features`]: type resolution, required members and lifecycle hooks.
//! - [`collections`]: constrained insertion into reflected collections.
//! - [`processor`]: processors, the serialization [`Definition`](processor::Definition)
//!   and the [`Mapper`](processor::Mapper) dispatcher.
//! - [`dictionary`]: flat string dictionaries for URL queries and headers.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use plaid_mapper::derive::Mapped;
//! use plaid_mapper::processor::{Definition, Mapper};
//! use plaid_mapper::registry::TypeRegistry;
//!
//! #[derive(Mapped, Debug, PartialEq)]
//! struct Point {
//!     x: i32,
//!     #[mapping(element(key = "y-axis"))]
//!     y: i32,
//! }
//!
//! let mut registry = TypeRegistry::new();
//! registry.register::<Point>();
//! let definition = Definition::json(Arc::new(registry));
//! let mapper = Mapper::new(&definition);
//!
//! let value = mapper.to_value(&Point { x: 1, y: 2 }).unwrap();
//! assert_eq!(value.get("y-axis").and_then(|v| v.as_i64()), Some(2));
//!
//! let back: Point = mapper.from_value(&value).unwrap();
//! assert_eq!(back, Point { x: 1, y: 2 });
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

// Derive output names `plaid_mapper::...`, which must also resolve inside this crate.
extern crate self as plaid_mapper;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod reflection;

pub mod collections;
pub mod dictionary;
pub mod features;
pub mod impls;
pub mod info;
pub mod processor;
pub mod registry;
pub mod value;

#[doc(hidden)]
pub mod __macro_exports;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use error::{CollectionError, MapError, ReflectionCacheError, TypeResolutionError};
pub use reflection::{Blank, List, ListIter, Map, Reflect, ReflectMut, ReflectRef, ScalarRef, Typed};
pub use reflection::{upcast, upcast_mut};
pub use value::{Lookup, Number, Value};

pub use plaid_mapper_derive as derive;
