use alloc::string::String;
use core::any::TypeId;

use thiserror::Error;

/// Errors of the member reflection cache.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReflectionCacheError {
    /// Members were requested for a type id that is not a registered marker type.
    #[error("`{type_id:?}` is not a registered marker type")]
    NotAMarker { type_id: TypeId },
    /// A member was looked up on a type whose hierarchy does not declare it.
    #[error("member `{member}` (declared on `{declaring}`) is not part of `{owner}`'s hierarchy")]
    MemberNotInHierarchy {
        member: &'static str,
        declaring: &'static str,
        owner: &'static str,
    },
}

/// Errors of polymorphic type resolution.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeResolutionError {
    /// Two unrelated types matched the data at the same hierarchy level.
    #[error("discriminators for `{requested}` match both `{first}` and `{second}`")]
    Ambiguous {
        requested: &'static str,
        first: &'static str,
        second: &'static str,
    },
    /// The resolved type cannot be allocated.
    #[error("resolved type `{type_path}` cannot be instantiated")]
    NotInstantiable { type_path: &'static str },
    /// A value does not fit the polymorphic slot it was assigned to.
    #[error("`{value}` is not assignable to `{slot}`")]
    NotAssignable {
        value: &'static str,
        slot: &'static str,
    },
}

/// Errors of constrained collection insertion.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CollectionError {
    /// Insert outside a fixed-size collection.
    #[error("index {index} is out of bounds for `{collection}` with capacity {capacity}")]
    OutOfBounds {
        collection: &'static str,
        index: usize,
        capacity: usize,
    },
    /// Insert into a read-only collection.
    #[error("`{collection}` is read-only, cannot insert at {index}")]
    ReadOnly { collection: &'static str, index: usize },
    /// The collection refused the element after conversion.
    #[error("`{collection}` rejected an element at {index}")]
    Rejected {
        collection: &'static str,
        index: usize,
    },
}

/// The error type of every mapping operation.
///
/// All variants abort the current call, nothing is retried internally.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MapError {
    /// Invalid serialization definition, e.g. an empty processor list.
    #[error("invalid serialization definition: {0}")]
    Configuration(String),
    /// No processor claims a value or target type.
    #[error("no processor accepts {what}")]
    UnsupportedValue { what: String },
    /// A required member was absent, or null while null-checked.
    #[error("required member `{member}` of `{owner}` is {reason}")]
    RequiredMemberMissing {
        member: &'static str,
        owner: &'static str,
        reason: &'static str,
    },
    #[error(transparent)]
    TypeResolution(#[from] TypeResolutionError),
    /// A text codec failed to parse its input.
    #[error("malformed {format} at line {line}, column {column}: {message}")]
    MalformedWireData {
        format: &'static str,
        line: usize,
        column: usize,
        message: String,
    },
    #[error(transparent)]
    ReflectionCache(#[from] ReflectionCacheError),
    #[error(transparent)]
    Collection(#[from] CollectionError),
    /// A value could not be converted into the requested type.
    #[error("cannot convert {from} into `{to}`")]
    Conversion { from: String, to: &'static str },
}

impl MapError {
    #[inline]
    pub(crate) fn unsupported(what: impl Into<String>) -> Self {
        Self::UnsupportedValue { what: what.into() }
    }

    #[inline]
    pub(crate) fn conversion(from: impl Into<String>, to: &'static str) -> Self {
        Self::Conversion {
            from: from.into(),
            to,
        }
    }

    /// Returns `true` for failures that only concern one collection element.
    ///
    /// Such elements are dropped with a warning instead of failing the
    /// whole collection.
    pub fn is_element_failure(&self) -> bool {
        matches!(self, Self::Conversion { .. } | Self::UnsupportedValue { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::{MapError, ReflectionCacheError};

    #[test]
    fn display() {
        let err = MapError::RequiredMemberMissing {
            member: "id",
            owner: "User",
            reason: "missing",
        };
        assert_eq!(err.to_string(), "required member `id` of `User` is missing");

        let err: MapError = ReflectionCacheError::MemberNotInHierarchy {
            member: "x",
            declaring: "A",
            owner: "B",
        }
        .into();
        assert!(err.to_string().contains("not part of `B`"));
    }

    #[test]
    fn element_failures() {
        assert!(MapError::conversion("string", "i32").is_element_failure());
        assert!(!MapError::Configuration("x".into()).is_element_failure());
    }
}
