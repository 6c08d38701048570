use core::fmt;

use crate::ScalarRef;

/// A numeric scalar in the narrowest width its producer chose.
///
/// Equality is numeric: `I32(42) == I64(42) == F64(42.0)`.
#[derive(Clone, Copy, Debug)]
pub enum Number {
    I32(i32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
}

impl Number {
    /// Picks `I32`, then `I64`.
    #[inline]
    pub const fn from_i64(value: i64) -> Self {
        if value >= i32::MIN as i64 && value <= i32::MAX as i64 {
            Number::I32(value as i32)
        } else {
            Number::I64(value)
        }
    }

    /// Picks `I32`, then `I64`, then `U64`.
    #[inline]
    pub const fn from_u64(value: u64) -> Self {
        if value <= i64::MAX as u64 {
            Self::from_i64(value as i64)
        } else {
            Number::U64(value)
        }
    }

    /// Picks `F32` when the value survives the round trip through `f32`.
    #[inline]
    pub fn from_f64(value: f64) -> Self {
        let narrow = value as f32;
        if value.is_finite() && f64::from(narrow) == value {
            Number::F32(narrow)
        } else {
            Number::F64(value)
        }
    }

    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, Number::F32(_) | Number::F64(_))
    }

    #[inline]
    pub const fn is_integer(self) -> bool {
        !self.is_float()
    }

    const fn as_i128(self) -> Option<i128> {
        match self {
            Number::I32(v) => Some(v as i128),
            Number::I64(v) => Some(v as i128),
            Number::U64(v) => Some(v as i128),
            Number::F32(_) | Number::F64(_) => None,
        }
    }

    /// The value as `i64`, if it is integral and in range.
    pub fn as_i64(self) -> Option<i64> {
        match self {
            Number::I32(v) => Some(i64::from(v)),
            Number::I64(v) => Some(v),
            Number::U64(v) => i64::try_from(v).ok(),
            Number::F32(v) => integral(f64::from(v)).map(|v| v as i64),
            Number::F64(v) => integral(v).map(|v| v as i64),
        }
    }

    /// The value as `u64`, if it is integral and non-negative.
    pub fn as_u64(self) -> Option<u64> {
        match self {
            Number::I32(v) => u64::try_from(v).ok(),
            Number::I64(v) => u64::try_from(v).ok(),
            Number::U64(v) => Some(v),
            Number::F32(v) => integral(f64::from(v)).filter(|v| *v >= 0.0).map(|v| v as u64),
            Number::F64(v) => integral(v).filter(|v| *v >= 0.0).map(|v| v as u64),
        }
    }

    #[inline]
    pub fn as_f64(self) -> f64 {
        match self {
            Number::I32(v) => f64::from(v),
            Number::I64(v) => v as f64,
            Number::U64(v) => v as f64,
            Number::F32(v) => f64::from(v),
            Number::F64(v) => v,
        }
    }

    /// Views the number as a reflected scalar.
    #[inline]
    pub const fn as_scalar(self) -> ScalarRef<'static> {
        match self {
            Number::I32(v) => ScalarRef::Int(v as i64),
            Number::I64(v) => ScalarRef::Int(v),
            Number::U64(v) => ScalarRef::UInt(v),
            Number::F32(v) => ScalarRef::F32(v),
            Number::F64(v) => ScalarRef::F64(v),
        }
    }
}

#[inline]
fn integral(v: f64) -> Option<f64> {
    (v.is_finite() && v.fract() == 0.0).then_some(v)
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self.as_i128(), other.as_i128()) {
            (Some(a), Some(b)) => a == b,
            _ => self.as_f64() == other.as_f64(),
        }
    }
}

impl fmt::Display for Number {
    /// Culture-invariant text; finite floats always carry a fraction or exponent.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Number::I32(v) => write!(f, "{v}"),
            Number::I64(v) => write!(f, "{v}"),
            Number::U64(v) => write!(f, "{v}"),
            Number::F32(v) => write_float(f, v.is_finite(), format_args!("{v}")),
            Number::F64(v) => write_float(f, v.is_finite(), format_args!("{v}")),
        }
    }
}

fn write_float(f: &mut fmt::Formatter<'_>, finite: bool, text: fmt::Arguments<'_>) -> fmt::Result {
    use alloc::string::ToString;
    let text = text.to_string();
    f.write_str(&text)?;
    if finite && !text.contains(['.', 'e', 'E']) {
        f.write_str(".0")?;
    }
    Ok(())
}

macro_rules! impl_from_int {
    ($($ty:ty => $via:ident),*) => {$(
        impl From<$ty> for Number {
            #[inline]
            fn from(value: $ty) -> Self {
                Self::$via(value as _)
            }
        }
    )*};
}

impl_from_int!(i8 => I32, i16 => I32, i32 => I32, i64 => I64, isize => I64);
impl_from_int!(u8 => I32, u16 => I32, u32 => from_u64, u64 => U64, usize => from_u64);

impl From<f32> for Number {
    #[inline]
    fn from(value: f32) -> Self {
        Number::F32(value)
    }
}

impl From<f64> for Number {
    #[inline]
    fn from(value: f64) -> Self {
        Number::F64(value)
    }
}

#[cfg(test)]
mod tests {
    use super::Number;
    use alloc::string::ToString;

    #[test]
    fn narrowing() {
        assert!(matches!(Number::from_i64(42), Number::I32(42)));
        assert!(matches!(Number::from_i64(99_999_999_999), Number::I64(_)));
        assert!(matches!(Number::from_u64(u64::MAX), Number::U64(_)));
        assert!(matches!(Number::from_f64(42.0), Number::F32(_)));
        assert!(matches!(Number::from_f64(0.1), Number::F64(_)));
    }

    #[test]
    fn conversions() {
        assert_eq!(Number::F64(3.0).as_i64(), Some(3));
        assert_eq!(Number::F64(3.5).as_i64(), None);
        assert_eq!(Number::I32(-1).as_u64(), None);
        assert_eq!(Number::U64(u64::MAX).as_i64(), None);
        assert_eq!(Number::from(200_u8), Number::I32(200));
    }

    #[test]
    fn invariant_text() {
        assert_eq!(Number::F64(42.0).to_string(), "42.0");
        assert_eq!(Number::F32(1.5).to_string(), "1.5");
        assert_eq!(Number::I64(-7).to_string(), "-7");
        assert_eq!(Number::F64(f64::NAN).to_string(), "NaN");
    }
}
