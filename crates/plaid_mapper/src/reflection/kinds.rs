use alloc::string::{String, ToString};
use core::fmt;

use crate::value::{Number, Value};
use crate::{List, Map, Reflect};

/// A borrowed scalar.
///
/// Signed and unsigned integers are widened to 64 bits; floats keep their width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScalarRef<'a> {
    Bool(bool),
    Char(char),
    Int(i64),
    UInt(u64),
    F32(f32),
    F64(f64),
    Str(&'a str),
}

impl<'a> ScalarRef<'a> {
    /// A short name of the variant, used in diagnostics.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            ScalarRef::Bool(_) => "bool",
            ScalarRef::Char(_) => "char",
            ScalarRef::Int(_) | ScalarRef::UInt(_) => "integer",
            ScalarRef::F32(_) | ScalarRef::F64(_) => "float",
            ScalarRef::Str(_) => "string",
        }
    }

    /// The numeric value, if this is a number.
    pub const fn as_number(&self) -> Option<Number> {
        match *self {
            ScalarRef::Int(v) => Some(Number::I64(v)),
            ScalarRef::UInt(v) => Some(Number::U64(v)),
            ScalarRef::F32(v) => Some(Number::F32(v)),
            ScalarRef::F64(v) => Some(Number::F64(v)),
            _ => None,
        }
    }

    /// Views a plain scalar value; `None` for null and containers.
    pub fn from_value(value: &'a Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(ScalarRef::Bool(*b)),
            Value::Number(n) => Some(n.as_scalar()),
            Value::String(s) => Some(ScalarRef::Str(s)),
            _ => None,
        }
    }

    /// Converts into an owned plain value.
    ///
    /// Integers are narrowed the same way the text codecs narrow them.
    pub fn to_value(&self) -> Value {
        match *self {
            ScalarRef::Bool(b) => Value::Bool(b),
            ScalarRef::Char(c) => Value::String(c.to_string()),
            ScalarRef::Int(v) => Value::Number(Number::from_i64(v)),
            ScalarRef::UInt(v) => Value::Number(Number::from_u64(v)),
            ScalarRef::F32(v) => Value::Number(Number::F32(v)),
            ScalarRef::F64(v) => Value::Number(Number::F64(v)),
            ScalarRef::Str(s) => Value::String(s.into()),
        }
    }

    /// Culture-invariant text.
    pub fn to_text(&self) -> String {
        match *self {
            ScalarRef::Str(s) => s.into(),
            ScalarRef::Char(c) => c.to_string(),
            ScalarRef::Bool(b) => b.to_string(),
            _ => match self.as_number() {
                Some(n) => n.to_string(),
                None => String::new(),
            },
        }
    }
}

impl fmt::Display for ScalarRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// An immutable view of a reflected value, split by kind.
pub enum ReflectRef<'a> {
    Scalar(ScalarRef<'a>),
    /// A fieldless enum; variant access goes through its `EnumInfo`.
    Enum(&'a dyn Reflect),
    /// A derived object; members go through its `ObjectInfo`.
    Object(&'a dyn Reflect),
    Sequence(&'a dyn List),
    Lookup(&'a dyn Map),
    Optional(Option<&'a dyn Reflect>),
    /// A polymorphic slot, exposing the concrete value it holds.
    Polymorphic(&'a dyn Reflect),
    Plain(&'a Value),
}

/// A mutable view of a reflected value, split by kind.
pub enum ReflectMut<'a> {
    Object(&'a mut dyn Reflect),
    Sequence(&'a mut dyn List),
    Lookup(&'a mut dyn Map),
    Plain(&'a mut Value),
    /// Scalars, enums, optionals and polymorphic slots are replaced wholesale.
    Opaque(&'a mut dyn Reflect),
}

impl ReflectRef<'_> {
    pub const fn kind_name(&self) -> &'static str {
        match self {
            ReflectRef::Scalar(_) => "scalar",
            ReflectRef::Enum(_) => "enum",
            ReflectRef::Object(_) => "object",
            ReflectRef::Sequence(_) => "sequence",
            ReflectRef::Lookup(_) => "lookup",
            ReflectRef::Optional(_) => "optional",
            ReflectRef::Polymorphic(_) => "polymorphic",
            ReflectRef::Plain(_) => "plain",
        }
    }
}
