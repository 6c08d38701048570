use alloc::boxed::Box;

use crate::{Reflect, ScalarRef};

/// Best-effort conversion from a borrowed scalar.
///
/// Implementations accept every scalar that denotes the same value, e.g.
/// an `i32` accepts `Int(7)`, `F64(7.0)` and `Str("7")` but rejects
/// `F64(7.5)` and out-of-range integers.
pub trait FromScalar: Sized {
    fn from_scalar(scalar: ScalarRef<'_>) -> Option<Self>;
}

/// The family of a scalar type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Char,
    Int,
    UInt,
    Float,
    String,
}

impl ScalarKind {
    /// Returns `true` for integer and float families.
    #[inline]
    pub const fn is_numeric(self) -> bool {
        matches!(self, ScalarKind::Int | ScalarKind::UInt | ScalarKind::Float)
    }
}

/// Type info of a scalar.
pub struct ScalarInfo {
    kind: ScalarKind,
    convert: fn(ScalarRef<'_>) -> Option<Box<dyn Reflect>>,
}

fn convert<T: FromScalar + Reflect>(scalar: ScalarRef<'_>) -> Option<Box<dyn Reflect>> {
    T::from_scalar(scalar).map(|value| Box::new(value) as Box<dyn Reflect>)
}

impl ScalarInfo {
    #[inline]
    pub fn new<T: FromScalar + Reflect>(kind: ScalarKind) -> Self {
        Self {
            kind,
            convert: convert::<T>,
        }
    }

    #[inline]
    pub const fn kind(&self) -> ScalarKind {
        self.kind
    }

    /// Converts `scalar` into a boxed instance of the described type.
    #[inline]
    pub fn from_scalar(&self, scalar: ScalarRef<'_>) -> Option<Box<dyn Reflect>> {
        (self.convert)(scalar)
    }
}
