//! Field kinds and typed field conversion.
//!
//! [`FieldKind`] is the declared type of a record field as reported by
//! [`Record::field_kind`](crate::Record::field_kind). [`FieldType`] converts
//! a concrete Rust field type to and from a [`Value`].

use std::fmt;

use memdb_codec::{CodecResult, Value};

/// Declared type of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// `i8`
    Int8,
    /// `i16`
    Int16,
    /// `i32`
    Int32,
    /// `i64` or `isize`
    Int64,
    /// `u8`
    UInt8,
    /// `u16`
    UInt16,
    /// `u32`
    UInt32,
    /// `u64` or `usize`
    UInt64,
    /// `f64`
    Float,
    /// `bool`
    Bool,
    /// `String`
    Text,
    /// `Vec<u8>`
    Bytes,
    /// A sequence of values.
    Array,
    /// An untyped [`Value`].
    Any,
}

/// Broad category of a [`FieldKind`], used by identifier assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldCategory {
    /// Signed integer of any width.
    SignedInt,
    /// Unsigned integer of any width.
    UnsignedInt,
    /// Text.
    Text,
    /// Anything else.
    Other,
}

impl FieldKind {
    /// Returns the category of this kind.
    #[must_use]
    pub const fn category(self) -> FieldCategory {
        match self {
            Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64 => FieldCategory::SignedInt,
            Self::UInt8 | Self::UInt16 | Self::UInt32 | Self::UInt64 => {
                FieldCategory::UnsignedInt
            }
            Self::Text => FieldCategory::Text,
            Self::Float | Self::Bool | Self::Bytes | Self::Array | Self::Any => {
                FieldCategory::Other
            }
        }
    }

    /// Largest identifier a field of this kind can hold, or `None` if the
    /// kind cannot carry identifiers at all.
    ///
    /// `UInt64` stops at `i64::MAX` because identifiers travel as
    /// [`Value::Integer`].
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub const fn max_identifier(self) -> Option<u64> {
        match self {
            Self::Int8 => Some(i8::MAX as u64),
            Self::Int16 => Some(i16::MAX as u64),
            Self::Int32 => Some(i32::MAX as u64),
            Self::Int64 | Self::UInt64 => Some(i64::MAX as u64),
            Self::UInt8 => Some(u8::MAX as u64),
            Self::UInt16 => Some(u16::MAX as u64),
            Self::UInt32 => Some(u32::MAX as u64),
            Self::Text => Some(u64::MAX),
            Self::Float | Self::Bool | Self::Bytes | Self::Array | Self::Any => None,
        }
    }

    /// Short type name, as it would be written in Rust.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int8 => "i8",
            Self::Int16 => "i16",
            Self::Int32 => "i32",
            Self::Int64 => "i64",
            Self::UInt8 => "u8",
            Self::UInt16 => "u16",
            Self::UInt32 => "u32",
            Self::UInt64 => "u64",
            Self::Float => "f64",
            Self::Bool => "bool",
            Self::Text => "text",
            Self::Bytes => "bytes",
            Self::Array => "array",
            Self::Any => "any",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A Rust type usable as a record field.
///
/// Implemented for the integer types, `f64`, `bool`, `String`, `Vec<u8>`,
/// `Vec<String>`, `Option<T>` and [`Value`] itself.
pub trait FieldType: Sized {
    /// Declared kind of fields of this type.
    const KIND: FieldKind;

    /// Converts the field to a value.
    ///
    /// # Errors
    ///
    /// Fails only when the field cannot be represented, e.g. a `u64` above
    /// `i64::MAX`.
    fn to_value(&self) -> CodecResult<Value>;

    /// Converts a value back into the field type.
    ///
    /// Returns the value unchanged if it has the wrong shape or range.
    fn from_value(value: Value) -> Result<Self, Value>;
}

macro_rules! integer_field {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl FieldType for $ty {
                const KIND: FieldKind = FieldKind::$kind;

                fn to_value(&self) -> CodecResult<Value> {
                    Ok(Value::Integer(i64::from(*self)))
                }

                fn from_value(value: Value) -> Result<Self, Value> {
                    match value {
                        Value::Integer(n) => <$ty>::try_from(n).map_err(|_| value),
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

integer_field!(
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
);

impl FieldType for u64 {
    const KIND: FieldKind = FieldKind::UInt64;

    fn to_value(&self) -> CodecResult<Value> {
        Value::try_from(*self)
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Integer(n) => u64::try_from(n).map_err(|_| value),
            other => Err(other),
        }
    }
}

impl FieldType for usize {
    const KIND: FieldKind = FieldKind::UInt64;

    fn to_value(&self) -> CodecResult<Value> {
        i64::try_from(*self)
            .map(Value::Integer)
            .map_err(|_| memdb_codec::CodecError::IntegerOverflow)
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Integer(n) => usize::try_from(n).map_err(|_| value),
            other => Err(other),
        }
    }
}

impl FieldType for isize {
    const KIND: FieldKind = FieldKind::Int64;

    fn to_value(&self) -> CodecResult<Value> {
        i64::try_from(*self)
            .map(Value::Integer)
            .map_err(|_| memdb_codec::CodecError::IntegerOverflow)
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Integer(n) => isize::try_from(n).map_err(|_| value),
            other => Err(other),
        }
    }
}

impl FieldType for f64 {
    const KIND: FieldKind = FieldKind::Float;

    fn to_value(&self) -> CodecResult<Value> {
        Ok(Value::Float(*self))
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Float(f) => Ok(f),
            other => Err(other),
        }
    }
}

impl FieldType for bool {
    const KIND: FieldKind = FieldKind::Bool;

    fn to_value(&self) -> CodecResult<Value> {
        Ok(Value::Bool(*self))
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(other),
        }
    }
}

impl FieldType for String {
    const KIND: FieldKind = FieldKind::Text;

    fn to_value(&self) -> CodecResult<Value> {
        Ok(Value::Text(self.clone()))
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Text(s) => Ok(s),
            other => Err(other),
        }
    }
}

impl FieldType for Vec<u8> {
    const KIND: FieldKind = FieldKind::Bytes;

    fn to_value(&self) -> CodecResult<Value> {
        Ok(Value::Bytes(self.clone()))
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Bytes(b) => Ok(b),
            other => Err(other),
        }
    }
}

impl FieldType for Vec<String> {
    const KIND: FieldKind = FieldKind::Array;

    fn to_value(&self) -> CodecResult<Value> {
        Ok(Value::Array(self.iter().map(Value::from).collect()))
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        let Value::Array(items) = value else {
            return Err(value);
        };
        if !items.iter().all(|v| v.as_text().is_some()) {
            return Err(Value::Array(items));
        }
        Ok(items
            .into_iter()
            .filter_map(|v| match v {
                Value::Text(s) => Some(s),
                _ => None,
            })
            .collect())
    }
}

/// Optional fields take the kind of their inner type and store `None` as null.
impl<T: FieldType> FieldType for Option<T> {
    const KIND: FieldKind = T::KIND;

    fn to_value(&self) -> CodecResult<Value> {
        match self {
            Some(inner) => inner.to_value(),
            None => Ok(Value::Null),
        }
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl FieldType for Value {
    const KIND: FieldKind = FieldKind::Any;

    fn to_value(&self) -> CodecResult<Value> {
        Ok(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        Ok(value)
    }
}
