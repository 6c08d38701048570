//! Flat string dictionaries, as used by URL queries and HTTP headers.
//!
//! A dictionary is the top level of a lookup with every scalar rendered as
//! text. Combined with [`Definition::dictionary`](crate::processor::Definition::dictionary),
//! whose scalars are strings only, objects map to and from dictionaries
//! without loss; [`Mapper::deserialize_into`] then merges header data onto an
//! object already populated from a body.
//!
//! ```
//! use std::sync::Arc;
//! use plaid_mapper::derive::Mapped;
//! use plaid_mapper::dictionary::{from_query, to_query};
//! use plaid_mapper::processor::{Definition, Mapper};
//! use plaid_mapper::registry::TypeRegistry;
//!
//! #[derive(Mapped, Debug, PartialEq)]
//! struct Search {
//!     #[mapping(element(key = "q"))]
//!     query: String,
//!     page: u32,
//!     exact: bool,
//! }
//!
//! let definition = Definition::dictionary(Arc::new(TypeRegistry::new()));
//! let mapper = Mapper::new(&definition);
//! let search = Search { query: "rust & c".into(), page: 2, exact: false };
//!
//! let query = to_query(&mapper, &search).unwrap();
//! assert_eq!(query, "q=rust%20%26%20c&page=2&exact=false");
//! assert_eq!(from_query::<Search>(&mapper, &query).unwrap(), search);
//! ```

use alloc::borrow::Cow;
use alloc::format;
use alloc::string::String;

use indexmap::IndexMap;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::processor::{FormatProvider, Mapper};
use crate::value::{Lookup, Value};
use crate::{MapError, Reflect, ScalarRef, Typed};

/// An insertion-ordered string to string map.
pub type Dictionary = IndexMap<String, String>;

/// Unreserved characters of RFC 3986 stay as they are.
const QUERY: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Flattens a lookup of scalars; null entries are left out.
pub fn to_dictionary(data: &Value, format: &dyn FormatProvider) -> Result<Dictionary, MapError> {
    let Value::Lookup(entries) = data else {
        return Err(MapError::unsupported(format!("{} data as a dictionary", data.kind_name())));
    };
    let mut dictionary = Dictionary::with_capacity(entries.len());
    for (key, value) in entries {
        let text = match value {
            Value::Null => continue,
            Value::String(text) => text.clone(),
            Value::Bool(_) | Value::Number(_) => match ScalarRef::from_value(value) {
                Some(scalar) => format.format_scalar(scalar),
                None => continue,
            },
            Value::Sequence(_) | Value::Lookup(_) => {
                return Err(MapError::unsupported(format!(
                    "nested {} under `{key}` in a dictionary",
                    value.kind_name()
                )));
            }
        };
        dictionary.insert(key.clone(), text);
    }
    Ok(dictionary)
}

/// A lookup of string values.
pub fn from_dictionary(dictionary: &Dictionary) -> Value {
    Value::Lookup(
        dictionary
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect::<Lookup>(),
    )
}

/// Encodes `key=value` pairs joined by `&`, percent-encoding both sides.
pub fn encode_query(dictionary: &Dictionary) -> String {
    let mut out = String::new();
    for (key, value) in dictionary {
        if !out.is_empty() {
            out.push('&');
        }
        out.extend(utf8_percent_encode(key, QUERY));
        out.push('=');
        out.extend(utf8_percent_encode(value, QUERY));
    }
    out
}

fn decode_component(text: &str, column: usize) -> Result<String, MapError> {
    let text: Cow<'_, str> = if text.contains('+') {
        Cow::Owned(text.replace('+', " "))
    } else {
        Cow::Borrowed(text)
    };
    percent_decode_str(&text)
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|err| MapError::MalformedWireData {
            format: "query",
            line: 1,
            column,
            message: format!("{err}"),
        })
}

/// Decodes a query string; `+` is a space, a later duplicate key wins.
///
/// A leading `?` is ignored.
///
/// ```
/// use plaid_mapper::dictionary::decode_query;
///
/// let query = decode_query("?a=1&b=x+y%21&flag&a=2").unwrap();
/// assert_eq!(query["a"], "2");
/// assert_eq!(query["b"], "x y!");
/// assert_eq!(query["flag"], "");
/// assert!(decode_query("bad=%FF").is_err());
/// ```
pub fn decode_query(query: &str) -> Result<Dictionary, MapError> {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut dictionary = Dictionary::new();
    let mut offset = 0;
    for pair in query.split('&') {
        let column = offset + 1;
        offset += pair.len() + 1;
        if pair.is_empty() {
            continue;
        }
        let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode_component(raw_key, column)?;
        let value = decode_component(raw_value, column + raw_key.len() + 1)?;
        dictionary.insert(key, value);
    }
    Ok(dictionary)
}

/// Serializes `value` and flattens it into a query string.
pub fn to_query<T: Reflect>(mapper: &Mapper<'_>, value: &T) -> Result<String, MapError> {
    let data = mapper.to_value(value)?;
    let dictionary = to_dictionary(&data, mapper.definition().format())?;
    Ok(encode_query(&dictionary))
}

/// Parses a query string into a new `T`.
pub fn from_query<T: Typed>(mapper: &Mapper<'_>, query: &str) -> Result<T, MapError> {
    mapper.from_value(&from_dictionary(&decode_query(query)?))
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec;

    use super::{Dictionary, from_dictionary, to_dictionary};
    use crate::derive::Mapped;
    use crate::processor::{Definition, InvariantFormat, Mapper};
    use crate::registry::TypeRegistry;
    use crate::value::{Lookup, Value};
    use crate::MapError;

    #[derive(Mapped, Debug, PartialEq)]
    struct Response {
        body: String,
        #[mapping(element(key = "X-Request-Id"))]
        request_id: u64,
        #[mapping(element(key = "Retry-After"))]
        retry_after: Option<u32>,
    }

    #[test]
    fn flattening() {
        let mut data = Lookup::new();
        data.insert("a".into(), Value::from(1.5));
        data.insert("b".into(), Value::Null);
        data.insert("c".into(), Value::from(true));
        let dictionary = to_dictionary(&Value::Lookup(data.clone()), &InvariantFormat).unwrap();
        assert_eq!(dictionary.len(), 2);
        assert_eq!(dictionary["a"], "1.5");
        assert_eq!(dictionary["c"], "true");

        data.insert("d".into(), Value::from(vec![Value::Null]));
        let err = to_dictionary(&Value::Lookup(data), &InvariantFormat).unwrap_err();
        assert!(matches!(err, MapError::UnsupportedValue { .. }));
    }

    #[test]
    fn headers_merge_onto_a_body() {
        let json = Definition::json(Arc::new(TypeRegistry::new()));
        let headers = Definition::dictionary(Arc::new(TypeRegistry::new()));

        let mut body = Lookup::new();
        body.insert("body".into(), Value::from("ok"));
        let mut response: Response = Mapper::new(&json).from_value(&Value::Lookup(body)).unwrap();
        assert_eq!(response.request_id, 0);

        let mut dictionary = Dictionary::new();
        dictionary.insert("X-Request-Id".into(), "77".into());
        dictionary.insert("Retry-After".into(), "30".into());
        Mapper::new(&headers)
            .apply(&mut response, &from_dictionary(&dictionary))
            .unwrap();

        assert_eq!(
            response,
            Response {
                body: "ok".into(),
                request_id: 77,
                retry_after: Some(30),
            }
        );
    }
}
