//! XML documents for [`plaid_mapper`] types.
//!
//! [`XmlReader`] and [`XmlWriter`] convert between text and a small element
//! tree; [`XmlMapper`] lays typed values out on that tree following the
//! [roles](plaid_mapper::info::markers::Role) of their members.
//!
//! ```
//! use std::sync::Arc;
//! use plaid_mapper::derive::Mapped;
//! use plaid_mapper::processor::Mapper;
//! use plaid_mapper::registry::TypeRegistry;
//! use plaid_xml::{XmlMapper, XmlWriter};
//!
//! #[derive(Mapped, Debug, PartialEq)]
//! #[mapping(xml_root = "server")]
//! struct Server {
//!     #[mapping(attribute)]
//!     host: String,
//!     #[mapping(attribute)]
//!     port: u16,
//!     #[mapping(list(entry = "alias"))]
//!     aliases: Vec<String>,
//! }
//!
//! let definition = XmlMapper::definition(Arc::new(TypeRegistry::new())).unwrap();
//! let xml = XmlMapper::new(Mapper::new(&definition))
//!     .unwrap()
//!     .writer(XmlWriter::new().header(false));
//!
//! let server = Server { host: "localhost".into(), port: 8080, aliases: vec!["lo".into()] };
//! let text = xml.to_xml(&server).unwrap();
//! assert_eq!(text, "<server host=\"localhost\" port=\"8080\">\n  <alias>lo</alias>\n</server>");
//! assert_eq!(xml.from_xml::<Server>(&text).unwrap(), server);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod mapper;
mod reader;
mod tree;
mod writer;

// -----------------------------------------------------------------------------
// Exports

pub use error::{XmlError, XmlErrorKind};
pub use mapper::{ValueStyle, XmlMapper, root_name};
pub use reader::XmlReader;
pub use tree::{XmlElement, XmlNode};
pub use writer::XmlWriter;

use alloc::string::String;

/// Writes `root` indented, with an XML declaration.
#[inline]
pub fn to_string(root: &XmlElement) -> String {
    XmlWriter::new().write(root)
}

/// Parses a complete document.
#[inline]
pub fn from_str(text: &str) -> Result<XmlElement, XmlError> {
    XmlReader::new(text).parse()
}
