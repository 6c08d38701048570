use alloc::string::{String, ToString};

use plaid_mapper::MapError;
use thiserror::Error;

/// What went wrong while reading JSON text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JsonErrorKind {
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEnd { expected: &'static str },
    #[error("unexpected `{found}`, expected {expected}")]
    UnexpectedChar { found: char, expected: &'static str },
    #[error("invalid number `{0}`")]
    InvalidNumber(String),
    #[error("number `{0}` is out of range")]
    NumberOutOfRange(String),
    #[error("invalid escape sequence")]
    InvalidEscape,
    #[error("unescaped control character in string")]
    ControlCharacter,
    #[error("duplicate key `{0}`")]
    DuplicateKey(String),
    #[error("trailing characters after the document")]
    TrailingCharacters,
    #[error("nesting deeper than {0} levels")]
    DepthLimitExceeded(usize),
}

/// A JSON parse failure with its position in the input.
///
/// `line` and `column` are 1-based, the column counts characters; `offset`
/// is the byte offset.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind} at line {line}, column {column}")]
pub struct JsonError {
    pub kind: JsonErrorKind,
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl JsonError {
    /// Locates `offset` in `input`.
    pub(crate) fn at(input: &str, offset: usize, kind: JsonErrorKind) -> Self {
        let offset = offset.min(input.len());
        let before = input.get(..offset).unwrap_or(input);
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;
        Self {
            kind,
            line,
            column,
            offset,
        }
    }
}

impl From<JsonError> for MapError {
    fn from(err: JsonError) -> Self {
        MapError::MalformedWireData {
            format: "json",
            line: err.line,
            column: err.column,
            message: err.kind.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{JsonError, JsonErrorKind};

    #[test]
    fn positions() {
        let input = "{\n  \"é\": x";
        let err = JsonError::at(input, input.len() - 1, JsonErrorKind::InvalidEscape);
        assert_eq!((err.line, err.column), (2, 8));
        assert_eq!(err.to_string(), "invalid escape sequence at line 2, column 8");
    }
}
