use alloc::string::{String, ToString};

use plaid_mapper::MapError;
use thiserror::Error;

/// What went wrong while reading XML text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum XmlErrorKind {
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEnd { expected: &'static str },
    #[error("unexpected `{found}`, expected {expected}")]
    UnexpectedChar { found: char, expected: &'static str },
    #[error("closing tag `{found}` does not match `{expected}`")]
    MismatchedTag { expected: String, found: String },
    #[error("unknown entity `&{0};`")]
    UnknownEntity(String),
    #[error("invalid character reference `&{0};`")]
    InvalidCharReference(String),
    #[error("duplicate attribute `{0}`")]
    DuplicateAttribute(String),
    #[error("the document has no root element")]
    MissingRoot,
    #[error("content after the root element")]
    TrailingContent,
    #[error("nesting deeper than {0} levels")]
    DepthLimitExceeded(usize),
}

/// An XML parse failure with its 1-based position.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind} at line {line}, column {column}")]
pub struct XmlError {
    pub kind: XmlErrorKind,
    pub line: usize,
    pub column: usize,
}

impl XmlError {
    pub(crate) fn at(input: &str, offset: usize, kind: XmlErrorKind) -> Self {
        let before = input.get(..offset.min(input.len())).unwrap_or(input);
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        Self {
            kind,
            line: before.matches('\n').count() + 1,
            column: before[line_start..].chars().count() + 1,
        }
    }
}

impl From<XmlError> for MapError {
    fn from(err: XmlError) -> Self {
        MapError::MalformedWireData {
            format: "xml",
            line: err.line,
            column: err.column,
            message: err.kind.to_string(),
        }
    }
}
