//! JSON text for [`plaid_mapper`] values.
//!
//! The codec only deals in [`Value`]s; the typed helpers combine it with a
//! [`Mapper`] to go straight between text and mapped types.
//!
//! ```
//! use std::sync::Arc;
//! use plaid_mapper::derive::Mapped;
//! use plaid_mapper::processor::{Definition, Mapper};
//! use plaid_mapper::registry::TypeRegistry;
//!
//! #[derive(Mapped, Debug, PartialEq)]
//! struct Release {
//!     name: String,
//!     #[mapping(element(key = "major"))]
//!     version: u16,
//!     notes: Vec<String>,
//! }
//!
//! let definition = Definition::json(Arc::new(TypeRegistry::new()));
//! let mapper = Mapper::new(&definition);
//!
//! let text = r#"{"name": "plaid", "major": 1, "notes": ["first"]}"#;
//! let release: Release = plaid_json::from_json(&mapper, text).unwrap();
//! assert_eq!(release.version, 1);
//!
//! let back = plaid_json::to_json(&mapper, &release).unwrap();
//! assert_eq!(back, r#"{"name":"plaid","major":1,"notes":["first"]}"#);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod reader;
mod writer;

// -----------------------------------------------------------------------------
// Exports

pub use error::{JsonError, JsonErrorKind};
pub use reader::JsonReader;
pub use writer::JsonWriter;

use alloc::string::String;

use plaid_mapper::processor::Mapper;
use plaid_mapper::{MapError, Reflect, Typed, Value};

/// Writes `value` without whitespace.
#[inline]
pub fn to_string(value: &Value) -> String {
    JsonWriter::new().compact(true).write(value)
}

/// Writes `value` indented by two spaces.
#[inline]
pub fn to_string_pretty(value: &Value) -> String {
    JsonWriter::new().write(value)
}

/// Parses a complete JSON document.
#[inline]
pub fn from_str(text: &str) -> Result<Value, JsonError> {
    JsonReader::new(text).parse()
}

/// Serializes `value` through `mapper` into compact JSON.
pub fn to_json<T: Reflect>(mapper: &Mapper<'_>, value: &T) -> Result<String, MapError> {
    let data = mapper.to_value(value)?;
    Ok(to_string(&data))
}

/// Parses `text` and deserializes a new `T` through `mapper`.
pub fn from_json<T: Typed>(mapper: &Mapper<'_>, text: &str) -> Result<T, MapError> {
    let data = from_str(text)?;
    mapper.from_value(&data)
}

/// Parses `text` and merges it onto `target`; absent members keep their values.
pub fn populate_json<T: Reflect>(mapper: &Mapper<'_>, target: &mut T, text: &str) -> Result<(), MapError> {
    let data = from_str(text)?;
    mapper.apply(target, &data)
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec::Vec;

    use plaid_mapper::derive::Mapped;
    use plaid_mapper::impls::Poly;
    use plaid_mapper::processor::{Definition, Mapper};
    use plaid_mapper::registry::TypeRegistry;
    use plaid_mapper::MapError;

    #[derive(Mapped, Debug, PartialEq)]
    #[mapping(resolve(target = Circle, value = "circle"), resolve(target = Square, value = "square"))]
    struct Shape {
        name: String,
    }

    #[derive(Mapped, Debug, PartialEq)]
    struct Circle {
        #[mapping(base)]
        shape: Shape,
        radius: f64,
    }

    #[derive(Mapped, Debug, PartialEq)]
    struct Square {
        #[mapping(base)]
        shape: Shape,
        side: u32,
    }

    #[derive(Mapped, Debug)]
    struct Drawing {
        #[mapping(required)]
        title: String,
        shapes: Vec<Poly<Shape>>,
    }

    fn definition() -> Definition {
        let mut registry = TypeRegistry::new();
        registry.register::<Drawing>();
        Definition::json(Arc::new(registry))
    }

    #[test]
    fn polymorphic_documents() {
        let definition = definition();
        let mapper = Mapper::new(&definition);
        let text = r#"{
            "title": "sketch",
            "shapes": [
                {"$type": "circle", "name": "c", "radius": 0.5},
                {"$type": "square", "name": "s", "side": 3},
                {"name": "plain"}
            ]
        }"#;

        let drawing: Drawing = super::from_json(&mapper, text).unwrap();
        assert_eq!(drawing.shapes.len(), 3);
        assert_eq!(drawing.shapes[0].downcast_ref::<Circle>().map(|c| c.radius), Some(0.5));
        assert_eq!(drawing.shapes[1].downcast_ref::<Square>().map(|s| s.side), Some(3));
        assert!(drawing.shapes[2].is::<Shape>());

        let out = super::to_json(&mapper, &drawing).unwrap();
        assert!(out.contains(r#"{"name":"c","radius":0.5,"$type":"circle"}"#));
        let again: Drawing = super::from_json(&mapper, &out).unwrap();
        assert!(again.shapes[1].is::<Square>());
    }

    #[test]
    fn malformed_text_is_positioned() {
        let definition = definition();
        let mapper = Mapper::new(&definition);

        let err = super::from_json::<Drawing>(&mapper, "{\n  \"title\": \"x\",\n}").unwrap_err();
        assert!(matches!(err, MapError::MalformedWireData { format: "json", line: 3, column: 1, .. }));

        let err = super::from_json::<Drawing>(&mapper, r#"{"shapes": []}"#).unwrap_err();
        assert!(matches!(err, MapError::RequiredMemberMissing { member: "title", .. }));
    }

    #[test]
    fn populate_merges() {
        let definition = definition();
        let mapper = Mapper::new(&definition);

        let mut drawing: Drawing = super::from_json(&mapper, r#"{"title": "a", "shapes": [{"name": "x"}]}"#).unwrap();
        super::populate_json(&mapper, &mut drawing, r#"{"title": "b"}"#).unwrap();
        assert_eq!(drawing.title, "b");
        assert_eq!(drawing.shapes.len(), 1);
    }
}
