//! The plain data model.
//!
//! Every wire format reads into and writes from [`Value`]. Objects become
//! [`Value::Lookup`] (or [`Value::Sequence`] under the sequence layout), and
//! scalars carry the narrowest [`Number`] their source produced.

// -----------------------------------------------------------------------------
// Modules

mod number;
mod serde_impls;

// -----------------------------------------------------------------------------
// Exports

pub use number::Number;

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use indexmap::IndexMap;

/// An insertion-ordered string-keyed mapping.
pub type Lookup = IndexMap<String, Value>;

/// A tree of plain data.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<Value>),
    Lookup(Lookup),
}

impl Value {
    /// A short name of the variant, used in diagnostics.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Lookup(_) => "lookup",
        }
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` for `Bool`, `Number` and `String`.
    #[inline]
    pub const fn is_scalar(&self) -> bool {
        matches!(self, Value::Bool(_) | Value::Number(_) | Value::String(_))
    }

    #[inline]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[inline]
    pub fn as_i64(&self) -> Option<i64> {
        self.as_number().and_then(Number::as_i64)
    }

    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().map(Number::as_f64)
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_sequence(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    #[inline]
    pub fn as_lookup(&self) -> Option<&Lookup> {
        match self {
            Value::Lookup(map) => Some(map),
            _ => None,
        }
    }

    #[inline]
    pub fn as_lookup_mut(&mut self) -> Option<&mut Lookup> {
        match self {
            Value::Lookup(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up `key` if this is a [`Value::Lookup`].
    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_lookup()?.get(key)
    }

    /// Returns the element at `index` if this is a [`Value::Sequence`].
    #[inline]
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.as_sequence()?.get(index)
    }

    /// Views a scalar through [`ScalarRef`], `None` for null and containers.
    #[inline]
    pub fn as_scalar(&self) -> Option<crate::ScalarRef<'_>> {
        crate::ScalarRef::from_value(self)
    }

    /// Renders a scalar as text, `None` for null and containers.
    pub fn scalar_text(&self) -> Option<String> {
        use alloc::string::ToString;
        match self {
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    /// Debug-oriented rendering; codecs have their own writers.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Sequence(items) => f.debug_list().entries(items.iter().map(Show)).finish(),
            Value::Lookup(map) => f
                .debug_map()
                .entries(map.iter().map(|(k, v)| (k, Show(v))))
                .finish(),
        }
    }
}

struct Show<'a>(&'a Value);

impl fmt::Debug for Show<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.0, f)
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl From<$ty> for Value {
            #[inline]
            fn from(value: $ty) -> Self {
                Value::$variant(value.into())
            }
        }
    )*};
}

impl_from! {
    bool => Bool,
    i8 => Number, i16 => Number, i32 => Number, i64 => Number,
    u8 => Number, u16 => Number, u32 => Number, u64 => Number,
    f32 => Number, f64 => Number,
    Number => Number,
    String => String,
    &str => String,
    Vec<Value> => Sequence,
    Lookup => Lookup,
}

impl<T: Into<Value>> From<Option<T>> for Value {
    #[inline]
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::Sequence(iter.into_iter().collect())
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Value::Lookup(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::{Number, Value};
    use alloc::vec;

    #[test]
    fn accessors() {
        let v: Value = [("a", Value::from(1)), ("b", Value::from("x"))]
            .into_iter()
            .collect();
        assert_eq!(v.get("a").and_then(Value::as_i64), Some(1));
        assert_eq!(v.get("b").and_then(Value::as_str), Some("x"));
        assert_eq!(v.get("c"), None);
        assert_eq!(Value::from(vec![Value::Null]).get_index(0), Some(&Value::Null));
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert!(matches!(Value::from(true).as_scalar(), Some(crate::ScalarRef::Bool(true))));
        assert!(Value::Null.as_scalar().is_none());
    }

    #[test]
    fn numbers_compare_across_widths() {
        assert_eq!(Value::from(42_i32), Value::Number(Number::I64(42)));
        assert_eq!(Value::from(1.5_f32), Value::from(1.5_f64));
        assert_ne!(Value::from(1), Value::from("1"));
    }

    #[test]
    fn display() {
        let v: Value = [("k", Value::from(vec![Value::from(true), Value::Null]))]
            .into_iter()
            .collect();
        assert_eq!(v.to_string(), r#"{"k": [true, null]}"#);
    }
}
