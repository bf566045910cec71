//! Error types for memdb core.

use crate::field::FieldKind;
use memdb_codec::Value;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in store operations.
///
/// A lookup that simply finds nothing is not an error: finds return
/// `None` or an empty `Vec`, and removes return `false`.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Record codec error.
    #[error("codec error: {0}")]
    Codec(#[from] memdb_codec::CodecError),

    /// The record type has no field named like the configured identifier field.
    #[error("record has no identifier field '{field}'")]
    MissingIdentifierField {
        /// The configured identifier field name.
        field: String,
    },

    /// The identifier field is not a signed integer, unsigned integer or text.
    #[error("identifier field '{field}' has unsupported type {kind}")]
    UnsupportedIdentifierType {
        /// The identifier field name.
        field: String,
        /// Declared kind of the field.
        kind: FieldKind,
    },

    /// A query or update referenced a field the record type does not have.
    #[error("unknown field '{field}'")]
    UnknownField {
        /// The field name.
        field: String,
    },

    /// No record matched an update or a required lookup.
    #[error("record not found in collection {collection}")]
    NotFound {
        /// The collection searched.
        collection: String,
    },

    /// A value of the wrong shape was written into a field.
    #[error("type mismatch on field '{field}': expected {expected}, found {found}")]
    TypeMismatch {
        /// The field name.
        field: String,
        /// Declared kind of the field.
        expected: FieldKind,
        /// Variant name of the offered value.
        found: &'static str,
    },

    /// A collection was accessed with a different record type than it holds.
    #[error("collection {collection} holds {expected}, not {actual}")]
    RecordTypeMismatch {
        /// The collection name.
        collection: String,
        /// Record type the collection was created with.
        expected: &'static str,
        /// Record type used by the caller.
        actual: &'static str,
    },

    /// The next identifier does not fit the identifier field's declared width.
    #[error("identifier {value} overflows field '{field}' of type {kind}")]
    IdentifierOverflow {
        /// The identifier field name.
        field: String,
        /// Declared kind of the field.
        kind: FieldKind,
        /// The identifier that did not fit.
        value: u64,
    },

    /// Stored bytes do not describe a record of the requested shape.
    #[error("invalid record format: {message}")]
    InvalidFormat {
        /// Description of the format issue.
        message: String,
    },
}

impl CoreError {
    /// Creates a missing identifier field error.
    pub fn missing_identifier_field(field: impl Into<String>) -> Self {
        Self::MissingIdentifierField {
            field: field.into(),
        }
    }

    /// Creates an unknown field error.
    pub fn unknown_field(field: impl Into<String>) -> Self {
        Self::UnknownField {
            field: field.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(collection: impl Into<String>) -> Self {
        Self::NotFound {
            collection: collection.into(),
        }
    }

    /// Creates a type mismatch error for a value offered to a field.
    pub fn type_mismatch(field: impl Into<String>, expected: FieldKind, found: &Value) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            expected,
            found: found.type_name(),
        }
    }

    /// Creates an invalid format error.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// Returns true for [`CoreError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_field() {
        let err = CoreError::missing_identifier_field("Id");
        assert_eq!(err.to_string(), "record has no identifier field 'Id'");

        let err = CoreError::type_mismatch("Age", FieldKind::Int32, &Value::from("x"));
        assert_eq!(
            err.to_string(),
            "type mismatch on field 'Age': expected i32, found text"
        );
    }

    #[test]
    fn codec_errors_convert() {
        let err: CoreError = memdb_codec::CodecError::UnexpectedEof.into();
        assert!(matches!(err, CoreError::Codec(_)));
        assert!(!err.is_not_found());
        assert!(CoreError::not_found("users").is_not_found());
    }
}
