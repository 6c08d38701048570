//! Declarative mapping of Rust types to plain data, JSON and XML.
//!
//! - [`mapper`]: reflection, the member cache, processors and [`Value`](mapper::Value).
//! - [`json`]: JSON text.
//! - [`xml`]: XML documents.
//! - [`utils`]: hashing and concurrent caches shared by the crates above.
//!
//! ```
//! use std::sync::Arc;
//! use plaid::mapper::derive::Mapped;
//! use plaid::mapper::processor::{Definition, Mapper};
//! use plaid::mapper::registry::TypeRegistry;
//!
//! #[derive(Mapped, Debug, PartialEq)]
//! struct Endpoint {
//!     #[mapping(attribute)]
//!     url: String,
//!     #[mapping(required)]
//!     retries: u8,
//! }
//!
//! let endpoint = Endpoint { url: "https://example.org".into(), retries: 3 };
//!
//! let json = Definition::json(Arc::new(TypeRegistry::new()));
//! let text = plaid::json::to_json(&Mapper::new(&json), &endpoint).unwrap();
//! assert_eq!(text, r#"{"url":"https://example.org","retries":3}"#);
//!
//! let xml = plaid::xml::XmlMapper::definition(Arc::new(TypeRegistry::new())).unwrap();
//! let xml = plaid::xml::XmlMapper::new(Mapper::new(&xml)).unwrap();
//! let text = xml.to_xml(&endpoint).unwrap();
//! assert_eq!(xml.from_xml::<Endpoint>(&text).unwrap(), endpoint);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use plaid_json as json;
pub use plaid_mapper as mapper;
pub use plaid_utils as utils;
pub use plaid_xml as xml;
