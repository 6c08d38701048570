use alloc::string::String;
use core::fmt::Debug;

use crate::ScalarRef;
use crate::value::Number;

/// Culture-sensitive text formatting and parsing of scalars.
///
/// Used whenever a scalar crosses a string-only boundary: dictionary values,
/// lookup keys, or wire formats whose [`ScalarSupport`] lacks a native kind.
pub trait FormatProvider: Send + Sync + Debug {
    fn format_scalar(&self, scalar: ScalarRef<'_>) -> String;

    fn parse_number(&self, text: &str) -> Option<Number>;

    fn parse_bool(&self, text: &str) -> Option<bool>;
}

/// Culture-invariant formatting: `.` decimal separator, no grouping,
/// `true`/`false`.
///
/// ```
/// use plaid_mapper::processor::{FormatProvider, InvariantFormat};
/// use plaid_mapper::{Number, ScalarRef};
///
/// let format = InvariantFormat;
/// assert_eq!(format.format_scalar(ScalarRef::F64(2.0)), "2.0");
/// assert_eq!(format.parse_number(" 42 "), Some(Number::I32(42)));
/// assert_eq!(format.parse_number("1e3"), Some(Number::F64(1000.0)));
/// assert_eq!(format.parse_number("NaN"), None);
/// assert_eq!(format.parse_bool("TRUE"), Some(true));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InvariantFormat;

impl FormatProvider for InvariantFormat {
    #[inline]
    fn format_scalar(&self, scalar: ScalarRef<'_>) -> String {
        scalar.to_text()
    }

    fn parse_number(&self, text: &str) -> Option<Number> {
        let text = text.trim();
        if let Ok(v) = text.parse::<i64>() {
            return Some(Number::from_i64(v));
        }
        if let Ok(v) = text.parse::<u64>() {
            return Some(Number::from_u64(v));
        }
        match text.parse::<f64>() {
            Ok(v) if v.is_finite() => Some(Number::F64(v)),
            _ => None,
        }
    }

    fn parse_bool(&self, text: &str) -> Option<bool> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("true") || text == "1" {
            Some(true)
        } else if text.eq_ignore_ascii_case("false") || text == "0" {
            Some(false)
        } else {
            None
        }
    }
}

/// The scalar kinds a wire format carries natively.
///
/// Strings are always supported. Unsupported kinds are written as text
/// through the definition's [`FormatProvider`] and parsed back from text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScalarSupport {
    pub bool: bool,
    pub number: bool,
}

impl ScalarSupport {
    /// Booleans, numbers and strings, as in JSON.
    pub const ALL: Self = Self {
        bool: true,
        number: true,
    };

    /// Strings only, as in URL queries and headers.
    pub const STRINGS: Self = Self {
        bool: false,
        number: false,
    };

    /// Whether `scalar` can be written without going through text.
    pub const fn supports(&self, scalar: &ScalarRef<'_>) -> bool {
        match scalar {
            ScalarRef::Bool(_) => self.bool,
            ScalarRef::Int(_) | ScalarRef::UInt(_) | ScalarRef::F32(_) | ScalarRef::F64(_) => self.number,
            ScalarRef::Char(_) | ScalarRef::Str(_) => true,
        }
    }
}

impl Default for ScalarSupport {
    #[inline]
    fn default() -> Self {
        Self::ALL
    }
}

#[cfg(test)]
mod tests {
    use super::{FormatProvider, InvariantFormat, ScalarSupport};
    use crate::ScalarRef;
    use crate::value::Number;

    #[test]
    fn invariant_numbers() {
        let format = InvariantFormat;
        assert_eq!(format.parse_number("-7"), Some(Number::I32(-7)));
        assert_eq!(format.parse_number("99999999999"), Some(Number::I64(99_999_999_999)));
        assert_eq!(format.parse_number("18446744073709551615"), Some(Number::U64(u64::MAX)));
        assert_eq!(format.parse_number("0.5"), Some(Number::F64(0.5)));
        assert_eq!(format.parse_number("1,5"), None);
        assert_eq!(format.parse_number("inf"), None);
        assert_eq!(format.format_scalar(ScalarRef::Int(-3)), "-3");
        assert_eq!(format.format_scalar(ScalarRef::Bool(false)), "false");
    }

    #[test]
    fn support_sets() {
        assert!(ScalarSupport::ALL.supports(&ScalarRef::F32(1.0)));
        assert!(!ScalarSupport::STRINGS.supports(&ScalarRef::Bool(true)));
        assert!(ScalarSupport::STRINGS.supports(&ScalarRef::Char('x')));
    }
}
