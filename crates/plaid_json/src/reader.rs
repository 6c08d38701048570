use alloc::string::String;
use alloc::vec::Vec;
use std::sync::LazyLock;

use plaid_mapper::{Lookup, Number, Value};
use regex::Regex;

use crate::error::{JsonError, JsonErrorKind};

/// The JSON number grammar, anchored.
static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?(?:0|[1-9][0-9]*)(?:\.[0-9]+)?(?:[eE][+-]?[0-9]+)?$").expect("number pattern is valid")
});

/// A strict, single pass JSON parser.
///
/// Trailing commas, comments and duplicate object keys are rejected; every
/// error carries its position. Integers become the narrowest of `I32`,
/// `I64` and `U64`, floats become `F32` when single precision holds them
/// exactly.
///
/// ```
/// use plaid_json::JsonReader;
/// use plaid_mapper::{Number, Value};
///
/// let value = JsonReader::new(r#"{"a": [42, 42.0, 99999999999, 0.1]}"#).parse().unwrap();
/// let items = value.get("a").and_then(Value::as_sequence).unwrap();
/// assert!(matches!(items[0], Value::Number(Number::I32(42))));
/// assert!(matches!(items[1], Value::Number(Number::F32(_))));
/// assert!(matches!(items[2], Value::Number(Number::I64(99999999999))));
/// assert!(matches!(items[3], Value::Number(Number::F64(_))));
///
/// let err = JsonReader::new("[1, 2,]").parse().unwrap_err();
/// assert_eq!((err.line, err.column), (1, 7));
/// ```
pub struct JsonReader<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl<'a> JsonReader<'a> {
    pub const DEFAULT_MAX_DEPTH: usize = 128;

    #[inline]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            depth: 0,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    /// Limits the nesting of arrays and objects.
    #[inline]
    pub const fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parses one document; only whitespace may follow it.
    pub fn parse(mut self) -> Result<Value, JsonError> {
        let value = self.parse_value()?;
        self.skip_whitespace();
        if self.pos < self.input.len() {
            return Err(self.error(JsonErrorKind::TrailingCharacters));
        }
        Ok(value)
    }

    // -------------------------------------------------------------------------
    // Scanning

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.pos += 1;
        }
    }

    #[inline]
    fn error(&self, kind: JsonErrorKind) -> JsonError {
        JsonError::at(self.input, self.pos, kind)
    }

    fn error_at(&self, offset: usize, kind: JsonErrorKind) -> JsonError {
        JsonError::at(self.input, offset, kind)
    }

    /// The error for whatever sits at the cursor when `expected` was needed.
    fn unexpected(&self, expected: &'static str) -> JsonError {
        match self.peek_char() {
            Some(found) => self.error(JsonErrorKind::UnexpectedChar { found, expected }),
            None => self.error(JsonErrorKind::UnexpectedEnd { expected }),
        }
    }

    fn expect(&mut self, byte: u8, expected: &'static str) -> Result<(), JsonError> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    // -------------------------------------------------------------------------
    // Values

    fn parse_value(&mut self) -> Result<Value, JsonError> {
        self.skip_whitespace();
        match self.peek() {
            Some(b'n') => self.parse_literal("null", Value::Null),
            Some(b't') => self.parse_literal("true", Value::Bool(true)),
            Some(b'f') => self.parse_literal("false", Value::Bool(false)),
            Some(b'"') => self.parse_string().map(Value::String),
            Some(b'[') => self.nested(Self::parse_array),
            Some(b'{') => self.nested(Self::parse_object),
            Some(b'-' | b'0'..=b'9') => self.parse_number(),
            _ => Err(self.unexpected("a value")),
        }
    }

    fn parse_literal(&mut self, literal: &'static str, value: Value) -> Result<Value, JsonError> {
        if self.input[self.pos..].starts_with(literal) {
            self.pos += literal.len();
            Ok(value)
        } else {
            Err(self.unexpected(literal))
        }
    }

    fn nested(&mut self, parse: fn(&mut Self) -> Result<Value, JsonError>) -> Result<Value, JsonError> {
        if self.depth >= self.max_depth {
            return Err(self.error(JsonErrorKind::DepthLimitExceeded(self.max_depth)));
        }
        self.depth += 1;
        let value = parse(self);
        self.depth -= 1;
        value
    }

    fn parse_array(&mut self) -> Result<Value, JsonError> {
        self.expect(b'[', "`[`")?;
        let mut items = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(b']') {
            self.pos += 1;
            return Ok(Value::Sequence(items));
        }
        loop {
            items.push(self.parse_value()?);
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b']') => {
                    self.pos += 1;
                    return Ok(Value::Sequence(items));
                }
                _ => return Err(self.unexpected("`,` or `]`")),
            }
        }
    }

    fn parse_object(&mut self) -> Result<Value, JsonError> {
        self.expect(b'{', "`{`")?;
        let mut entries = Lookup::new();
        self.skip_whitespace();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            return Ok(Value::Lookup(entries));
        }
        loop {
            self.skip_whitespace();
            if self.peek() != Some(b'"') {
                return Err(self.unexpected("a string key"));
            }
            let key_pos = self.pos;
            let key = self.parse_string()?;
            if entries.contains_key(&key) {
                return Err(self.error_at(key_pos, JsonErrorKind::DuplicateKey(key)));
            }
            self.skip_whitespace();
            self.expect(b':', "`:`")?;
            let value = self.parse_value()?;
            entries.insert(key, value);
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b'}') => {
                    self.pos += 1;
                    return Ok(Value::Lookup(entries));
                }
                _ => return Err(self.unexpected("`,` or `}`")),
            }
        }
    }

    // -------------------------------------------------------------------------
    // Strings

    fn parse_string(&mut self) -> Result<String, JsonError> {
        self.expect(b'"', "`\"`")?;
        let mut out = String::new();
        let mut start = self.pos;
        loop {
            let Some(byte) = self.peek() else {
                return Err(self.error(JsonErrorKind::UnexpectedEnd { expected: "`\"`" }));
            };
            match byte {
                b'"' => {
                    out.push_str(&self.input[start..self.pos]);
                    self.pos += 1;
                    return Ok(out);
                }
                b'\\' => {
                    out.push_str(&self.input[start..self.pos]);
                    self.pos += 1;
                    out.push(self.parse_escape()?);
                    start = self.pos;
                }
                0x00..=0x1F => return Err(self.error(JsonErrorKind::ControlCharacter)),
                _ => self.pos += 1,
            }
        }
    }

    fn parse_escape(&mut self) -> Result<char, JsonError> {
        let escape_pos = self.pos - 1;
        let Some(byte) = self.peek() else {
            return Err(self.error(JsonErrorKind::UnexpectedEnd { expected: "an escape sequence" }));
        };
        self.pos += 1;
        let c = match byte {
            b'"' => '"',
            b'\\' => '\\',
            b'/' => '/',
            b'b' => '\u{8}',
            b'f' => '\u{c}',
            b'n' => '\n',
            b'r' => '\r',
            b't' => '\t',
            b'u' => {
                let high = self.parse_hex4(escape_pos)?;
                let code = match high {
                    0xD800..=0xDBFF => {
                        if !self.input[self.pos..].starts_with("\\u") {
                            return Err(self.error_at(escape_pos, JsonErrorKind::InvalidEscape));
                        }
                        self.pos += 2;
                        let low = self.parse_hex4(escape_pos)?;
                        if !(0xDC00..=0xDFFF).contains(&low) {
                            return Err(self.error_at(escape_pos, JsonErrorKind::InvalidEscape));
                        }
                        0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
                    }
                    0xDC00..=0xDFFF => return Err(self.error_at(escape_pos, JsonErrorKind::InvalidEscape)),
                    _ => high,
                };
                char::from_u32(code).ok_or_else(|| self.error_at(escape_pos, JsonErrorKind::InvalidEscape))?
            }
            _ => return Err(self.error_at(escape_pos, JsonErrorKind::InvalidEscape)),
        };
        Ok(c)
    }

    fn parse_hex4(&mut self, escape_pos: usize) -> Result<u32, JsonError> {
        let digits = self
            .input
            .get(self.pos..self.pos + 4)
            .filter(|digits| digits.bytes().all(|b| b.is_ascii_hexdigit()))
            .ok_or_else(|| self.error_at(escape_pos, JsonErrorKind::InvalidEscape))?;
        let code = u32::from_str_radix(digits, 16).map_err(|_| self.error_at(escape_pos, JsonErrorKind::InvalidEscape))?;
        self.pos += 4;
        Ok(code)
    }

    // -------------------------------------------------------------------------
    // Numbers

    /// Greedily takes `0-9 - + e E .`, validates the candidate, then narrows.
    ///
    /// Integers become the first of `I32`, `I64`, `U64` that holds them.
    /// Literals with a fraction or exponent become `F32` only when single
    /// precision represents them exactly (`0.5`), otherwise `F64` (`0.1`),
    /// so every value reads back unchanged.
    fn parse_number(&mut self) -> Result<Value, JsonError> {
        let start = self.pos;
        while let Some(b'0'..=b'9' | b'-' | b'+' | b'e' | b'E' | b'.') = self.peek() {
            self.pos += 1;
        }
        let text = &self.input[start..self.pos];
        if !NUMBER.is_match(text) {
            return Err(self.error_at(start, JsonErrorKind::InvalidNumber(text.into())));
        }

        let number = if text.contains(['.', 'e', 'E']) {
            match text.parse::<f64>() {
                Ok(v) if v.is_finite() => Number::from_f64(v),
                _ => return Err(self.error_at(start, JsonErrorKind::NumberOutOfRange(text.into()))),
            }
        } else if let Ok(v) = text.parse::<i64>() {
            Number::from_i64(v)
        } else if let Ok(v) = text.parse::<u64>() {
            Number::U64(v)
        } else {
            return Err(self.error_at(start, JsonErrorKind::NumberOutOfRange(text.into())));
        };
        Ok(Value::Number(number))
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec;

    use plaid_mapper::{Number, Value};

    use super::JsonReader;
    use crate::error::JsonErrorKind;

    fn parse(text: &str) -> Value {
        JsonReader::new(text).parse().unwrap()
    }

    fn kind(text: &str) -> JsonErrorKind {
        JsonReader::new(text).parse().unwrap_err().kind
    }

    #[test]
    fn number_narrowing() {
        assert!(matches!(parse("42"), Value::Number(Number::I32(42))));
        assert!(matches!(parse("-2147483649"), Value::Number(Number::I64(-2_147_483_649))));
        assert!(matches!(parse("99999999999"), Value::Number(Number::I64(99_999_999_999))));
        assert!(matches!(parse("18446744073709551615"), Value::Number(Number::U64(u64::MAX))));
        assert!(matches!(parse("42.0"), Value::Number(Number::F32(v)) if v == 42.0));
        assert!(matches!(parse("1.5e3"), Value::Number(Number::F32(v)) if v == 1500.0));
        assert!(matches!(parse("0.1"), Value::Number(Number::F64(v)) if v == 0.1));
        assert!(matches!(parse("1e300"), Value::Number(Number::F64(_))));

        assert_eq!(kind("1e400"), JsonErrorKind::NumberOutOfRange("1e400".into()));
        assert_eq!(kind("18446744073709551616"), JsonErrorKind::NumberOutOfRange("18446744073709551616".into()));
        for bad in ["01", "1.", "-", "1e", "+1", "1.2.3", "--1", ".5"] {
            let err = JsonReader::new(bad).parse().unwrap_err();
            assert!(
                matches!(err.kind, JsonErrorKind::InvalidNumber(_) | JsonErrorKind::UnexpectedChar { .. }),
                "{bad}: {err}"
            );
        }
    }

    #[test]
    fn strings() {
        assert_eq!(parse(r#""a\"b\\c\/\né""#), Value::from("a\"b\\c/\né"));
        assert_eq!(parse(r#""\ud83d\ude00""#), Value::from("\u{1F600}"));
        assert_eq!(parse("\"日本\""), Value::from("日本"));
        assert_eq!(kind(r#""\ud83d""#), JsonErrorKind::InvalidEscape);
        assert_eq!(kind(r#""\x""#), JsonErrorKind::InvalidEscape);
        assert_eq!(kind("\"a\nb\""), JsonErrorKind::ControlCharacter);
        assert_eq!(kind("\"open"), JsonErrorKind::UnexpectedEnd { expected: "`\"`" });
    }

    #[test]
    fn strict_grammar() {
        assert_eq!(
            kind("[1, 2,]"),
            JsonErrorKind::UnexpectedChar {
                found: ']',
                expected: "a value"
            }
        );
        assert_eq!(
            kind(r#"{"a": 1,}"#),
            JsonErrorKind::UnexpectedChar {
                found: '}',
                expected: "a string key"
            }
        );
        assert_eq!(
            kind("[1] // note"),
            JsonErrorKind::TrailingCharacters
        );
        assert_eq!(
            kind("{/* c */}"),
            JsonErrorKind::UnexpectedChar {
                found: '/',
                expected: "a string key"
            }
        );
        assert_eq!(kind("[1, 2"), JsonErrorKind::UnexpectedEnd { expected: "`,` or `]`" });
        assert_eq!(kind(r#"{"a": 1"#), JsonErrorKind::UnexpectedEnd { expected: "`,` or `}`" });
        assert_eq!(kind("tru"), JsonErrorKind::UnexpectedChar { found: 't', expected: "true" });
        assert_eq!(kind("1 2"), JsonErrorKind::TrailingCharacters);
    }

    #[test]
    fn duplicate_keys() {
        let err = JsonReader::new("{\"a\": 1,\n \"a\": 2}").parse().unwrap_err();
        assert_eq!(err.kind, JsonErrorKind::DuplicateKey("a".to_string()));
        assert_eq!((err.line, err.column, err.offset), (2, 2, 10));
    }

    #[test]
    fn depth_limit() {
        let deep = "[".repeat(5) + &"]".repeat(5);
        assert!(JsonReader::new(&deep).max_depth(5).parse().is_ok());
        assert_eq!(
            JsonReader::new(&deep).max_depth(4).parse().unwrap_err().kind,
            JsonErrorKind::DepthLimitExceeded(4)
        );
    }

    #[test]
    fn agrees_with_serde_json() {
        let text = r#"
            {
                "id": 7,
                "ratio": -0.125,
                "big": 1.7976931348623157e308,
                "tags": ["x", "yA", ""],
                "nested": {"empty": {}, "list": [[], [null, false]]}
            }
        "#;
        let ours = parse(text);
        let reference: Value = serde_json::from_str(text).unwrap();
        assert_eq!(ours, reference);
        assert_eq!(
            ours.get("tags"),
            Some(&Value::from(vec![Value::from("x"), Value::from("yA"), Value::from("")]))
        );
    }
}
