use alloc::string::String;
use core::fmt::Write;

use plaid_mapper::{Number, Value};

/// Renders [`Value`]s as JSON text.
///
/// Indented output by default; [`compact`](Self::compact) drops every
/// optional whitespace. Numbers use culture-invariant formatting, and
/// non-finite floats, which JSON cannot express, become `null`.
///
/// ```
/// use plaid_json::JsonWriter;
/// use plaid_mapper::{Lookup, Value};
///
/// let mut map = Lookup::new();
/// map.insert("tab".into(), Value::from("a\tb"));
/// map.insert("list".into(), Value::from(vec![Value::from(1), Value::from(2.5)]));
/// let value = Value::Lookup(map);
///
/// assert_eq!(
///     JsonWriter::new().compact(true).write(&value),
///     r#"{"tab":"a\tb","list":[1,2.5]}"#
/// );
/// assert_eq!(
///     JsonWriter::new().indent(1).write(&value),
///     "{\n \"tab\": \"a\\tb\",\n \"list\": [\n  1,\n  2.5\n ]\n}"
/// );
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JsonWriter {
    compact: bool,
    indent: usize,
}

impl Default for JsonWriter {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl JsonWriter {
    #[inline]
    pub const fn new() -> Self {
        Self {
            compact: false,
            indent: 2,
        }
    }

    /// Suppresses newlines and indentation.
    #[inline]
    pub const fn compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    /// Spaces per nesting level in indented output.
    #[inline]
    pub const fn indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn write(&self, value: &Value) -> String {
        let mut out = String::new();
        self.write_to(value, &mut out);
        out
    }

    /// Appends the text of `value` to `out`.
    pub fn write_to(&self, value: &Value, out: &mut String) {
        self.write_value(value, 0, out);
    }

    fn write_value(&self, value: &Value, depth: usize, out: &mut String) {
        match value {
            Value::Null => out.push_str("null"),
            Value::Bool(true) => out.push_str("true"),
            Value::Bool(false) => out.push_str("false"),
            Value::Number(number) => write_number(*number, out),
            Value::String(text) => write_string(text, out),
            Value::Sequence(items) => {
                if items.is_empty() {
                    out.push_str("[]");
                    return;
                }
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    self.newline(depth + 1, out);
                    self.write_value(item, depth + 1, out);
                }
                self.newline(depth, out);
                out.push(']');
            }
            Value::Lookup(entries) => {
                if entries.is_empty() {
                    out.push_str("{}");
                    return;
                }
                out.push('{');
                for (i, (key, item)) in entries.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    self.newline(depth + 1, out);
                    write_string(key, out);
                    out.push(':');
                    if !self.compact {
                        out.push(' ');
                    }
                    self.write_value(item, depth + 1, out);
                }
                self.newline(depth, out);
                out.push('}');
            }
        }
    }

    fn newline(&self, depth: usize, out: &mut String) {
        if self.compact {
            return;
        }
        out.push('\n');
        out.extend(core::iter::repeat_n(' ', depth * self.indent));
    }
}

fn write_number(number: Number, out: &mut String) {
    let finite = match number {
        Number::F32(v) => v.is_finite(),
        Number::F64(v) => v.is_finite(),
        Number::I32(_) | Number::I64(_) | Number::U64(_) => true,
    };
    if finite {
        // Writing into a `String` cannot fail.
        let _ = write!(out, "{number}");
    } else {
        log::warn!("non-finite number `{number}` has no JSON form, writing null");
        out.push_str("null");
    }
}

fn write_string(text: &str, out: &mut String) {
    out.push('"');
    let mut start = 0;
    for (i, byte) in text.bytes().enumerate() {
        let escape = match byte {
            b'"' => "\\\"",
            b'\\' => "\\\\",
            b'\n' => "\\n",
            b'\r' => "\\r",
            b'\t' => "\\t",
            0x08 => "\\b",
            0x0C => "\\f",
            0x00..=0x1F => "",
            _ => continue,
        };
        out.push_str(&text[start..i]);
        if escape.is_empty() {
            let _ = write!(out, "\\u{byte:04x}");
        } else {
            out.push_str(escape);
        }
        start = i + 1;
    }
    out.push_str(&text[start..]);
    out.push('"');
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;

    use plaid_mapper::{Lookup, Number, Value};

    use super::{JsonWriter, write_string};

    #[test]
    fn escapes() {
        let mut out = String::new();
        write_string("q\"\\\u{1}\u{7f}é\u{8}\u{c}", &mut out);
        assert_eq!(out, "\"q\\\"\\\\\\u0001\u{7f}é\\b\\f\"");
    }

    #[test]
    fn numbers() {
        let writer = JsonWriter::new().compact(true);
        let value = Value::from(vec![
            Value::from(3),
            Value::Number(Number::F32(2.0)),
            Value::Number(Number::F64(0.1)),
            Value::Number(Number::U64(u64::MAX)),
            Value::Number(Number::F64(f64::NAN)),
            Value::Number(Number::F32(f32::INFINITY)),
        ]);
        assert_eq!(writer.write(&value), "[3,2.0,0.1,18446744073709551615,null,null]");
    }

    #[test]
    fn empty_containers() {
        let mut map = Lookup::new();
        map.insert("a".into(), Value::Sequence(vec![]));
        map.insert("b".into(), Value::Lookup(Lookup::new()));
        assert_eq!(JsonWriter::new().write(&Value::Lookup(map)), "{\n  \"a\": [],\n  \"b\": {}\n}");
    }

    #[test]
    fn agrees_with_serde_json() {
        let text = r#"{"s":"line\nbreak \u0000 \"q\"","n":[-1,0.25,1e-7,12345678901234],"t":true,"z":null}"#;
        let expected: serde_json::Value = serde_json::from_str(text).unwrap();
        let value: Value = serde_json::from_str(text).unwrap();
        for writer in [JsonWriter::new(), JsonWriter::new().compact(true)] {
            let written = writer.write(&value);
            let reparsed: serde_json::Value = serde_json::from_str(&written).unwrap();
            assert_eq!(reparsed, expected);
        }
    }
}
