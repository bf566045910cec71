//! Dynamic field value type.

use crate::error::{CodecError, CodecResult};

/// A dynamic record value.
///
/// Records are converted to a [`Value::Map`] keyed by field name before they
/// are encoded, and every field read through the store surfaces as a
/// `Value`. Integers of every width share the [`Value::Integer`] variant, so
/// an `i32` field holding 22 and a `u8` field holding 22 compare equal.
/// Values of different variants are never equal. Maps compare as sets of
/// fields, so key order does not matter.
#[derive(Debug, Clone)]
pub enum Value {
    /// Null value, used for absent optional fields.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value (full i64 range).
    Integer(i64),
    /// 64-bit float. NaN is rejected by the encoder.
    Float(f64),
    /// Byte string.
    Bytes(Vec<u8>),
    /// Text string (UTF-8).
    Text(String),
    /// Array of values.
    Array(Vec<Value>),
    /// Field name to value pairs. The encoder sorts them canonically.
    Map(Vec<(String, Value)>),
}

impl Value {
    /// Build a map value from `(field, value)` pairs.
    pub fn map<K, I>(pairs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Map(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Short name of this value's variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Bytes(_) => "bytes",
            Value::Text(_) => "text",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
        }
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get this value as a boolean, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get this value as an integer, if it is one.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Get this value as a float, if it is one.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get this value as bytes, if it is a byte string.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Get this value as a string, if it is a text string.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get this value as an array, if it is one.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Get this value as a map, if it is one.
    pub fn as_map(&self) -> Option<&[(String, Value)]> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Look up a field in this map value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Take a field out of this map value.
    ///
    /// Returns `None` if the key is missing or this is not a map.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        match self {
            Value::Map(pairs) => {
                let pos = pairs.iter().position(|(k, _)| k == key)?;
                Some(pairs.remove(pos).1)
            }
            _ => None,
        }
    }

    /// Consume this value as a map, or fail with a structural error.
    pub fn into_map(self) -> CodecResult<Vec<(String, Value)>> {
        match self {
            Value::Map(pairs) => Ok(pairs),
            other => Err(CodecError::invalid_structure(format!(
                "expected map, found {}",
                other.type_name()
            ))),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => {
                a.len() == b.len() && contains_all(a, b) && contains_all(b, a)
            }
            _ => false,
        }
    }
}

/// True if every field of `a` appears in `b` with an equal value.
fn contains_all(a: &[(String, Value)], b: &[(String, Value)]) -> bool {
    a.iter()
        .all(|(key, value)| b.iter().any(|(k, v)| k == key && v == value))
}

macro_rules! integer_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Integer(i64::from(n))
                }
            }
        )*
    };
}

integer_from!(i8, i16, i32, i64, u8, u16, u32);

impl TryFrom<u64> for Value {
    type Error = CodecError;

    fn try_from(n: u64) -> CodecResult<Self> {
        i64::try_from(n)
            .map(Value::Integer)
            .map_err(|_| CodecError::IntegerOverflow)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Text(s.clone())
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Value::Null
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_of_any_width_compare_equal() {
        assert_eq!(Value::from(22u8), Value::from(22i64));
        assert_eq!(Value::from(-7i16), Value::Integer(-7));
        assert_ne!(Value::from(22i32), Value::from("22"));
    }

    #[test]
    fn different_variants_never_equal() {
        assert_ne!(Value::Integer(1), Value::Float(1.0));
        assert_ne!(Value::Null, Value::Bool(false));
        assert_ne!(Value::Text(String::new()), Value::Bytes(vec![]));
    }

    #[test]
    fn map_equality_ignores_key_order() {
        let a = Value::map([("zz", Value::from(1)), ("a", Value::from(2))]);
        let b = Value::map([("a", Value::from(2)), ("zz", Value::from(1))]);
        assert_eq!(a, b);

        let nested = Value::Array(vec![a.clone()]);
        assert_eq!(nested, Value::Array(vec![b]));

        assert_ne!(a, Value::map([("a", Value::from(2))]));
        assert_ne!(a, Value::map([("zz", Value::from(1)), ("a", Value::from(3))]));
        assert_ne!(
            Value::map([("a", Value::Null), ("a", Value::Null)]),
            Value::map([("a", Value::Null), ("b", Value::Null)])
        );
    }

    #[test]
    fn u64_conversion_checks_range() {
        assert_eq!(Value::try_from(42u64).unwrap(), Value::Integer(42));
        assert_eq!(
            Value::try_from(u64::MAX).unwrap_err(),
            CodecError::IntegerOverflow
        );
    }

    #[test]
    fn option_maps_none_to_null() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Text("x".into()));
    }

    #[test]
    fn value_accessors() {
        assert!(Value::Null.is_null());
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Integer(42).as_integer(), Some(42));
        assert_eq!(Value::Text("42".into()).as_integer(), None);
        assert_eq!(Value::Float(0.5).as_float(), Some(0.5));
        assert_eq!(Value::Bytes(vec![1, 2]).as_bytes(), Some(&[1, 2][..]));
        assert_eq!(Value::Integer(1).type_name(), "integer");
    }

    #[test]
    fn map_get_and_remove() {
        let mut map = Value::map([
            ("Name", Value::from("Alice")),
            ("Age", Value::from(30)),
        ]);

        assert_eq!(map.get("Name"), Some(&Value::Text("Alice".into())));
        assert_eq!(map.get("missing"), None);

        assert_eq!(map.remove("Age"), Some(Value::Integer(30)));
        assert_eq!(map.get("Age"), None);
        assert_eq!(map.as_map().map(<[_]>::len), Some(1));
    }

    #[test]
    fn into_map_rejects_scalars() {
        assert!(Value::map([("a", Value::Null)]).into_map().is_ok());
        assert!(matches!(
            Value::Integer(1).into_map(),
            Err(CodecError::InvalidStructure { .. })
        ));
    }
}
