//! Behaviors layered on top of the member tables.
//!
//! - [`resolution`]: discriminator insertion and polymorphic type resolution.
//! - [`required`]: enforcement of [`Required`](crate::info::markers::Required) members.
//! - [`lifecycle`]: before/after hooks around (de)serialization.

pub mod lifecycle;
pub mod required;
pub mod resolution;
