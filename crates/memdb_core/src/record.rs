//! Record trait and the `record!` macro.

use memdb_codec::Value;

use crate::error::{CoreError, CoreResult};
use crate::field::{FieldKind, FieldType};

/// Trait for types that can be stored in a [`Store`](crate::Store).
///
/// A record exposes its fields by name so the store can assign
/// identifiers and match fields without knowing the concrete type, and it
/// encodes itself so the store never shares memory with a caller's value.
///
/// Most types implement this through [`record!`](crate::record):
///
/// ```
/// use memdb_core::{record, FieldKind, Record, Value};
///
/// record! {
///     #[derive(Debug, Clone, PartialEq, Default)]
///     pub struct User {
///         "Id" => pub id: String,
///         "Age" => pub age: i32,
///     }
/// }
///
/// let mut user = User { id: String::new(), age: 30 };
/// assert_eq!(User::field_kind("Age"), Some(FieldKind::Int32));
/// user.set_field("Id", Value::from("7")).unwrap();
///
/// let copy = User::decode(&user.encode().unwrap()).unwrap();
/// assert_eq!(copy, user);
/// ```
pub trait Record: Sized {
    /// Declared kind of the named field, or `None` if the type has no such
    /// field.
    fn field_kind(field: &str) -> Option<FieldKind>;

    /// Reads the named field.
    ///
    /// # Errors
    ///
    /// [`CoreError::UnknownField`] if the type has no such field.
    fn get_field(&self, field: &str) -> CoreResult<Value>;

    /// Writes the named field.
    ///
    /// # Errors
    ///
    /// [`CoreError::UnknownField`] if the type has no such field, or
    /// [`CoreError::TypeMismatch`] if the value does not fit the field.
    fn set_field(&mut self, field: &str, value: Value) -> CoreResult<()>;

    /// Encodes the record to canonical CBOR.
    ///
    /// Identical records must produce identical bytes.
    fn encode(&self) -> CoreResult<Vec<u8>>;

    /// Decodes a record produced by [`Record::encode`].
    fn decode(bytes: &[u8]) -> CoreResult<Self>;
}

/// Stores `value` into `slot`, reporting a type mismatch against `field`.
#[doc(hidden)]
pub fn assign_field<T: FieldType>(slot: &mut T, field: &str, value: Value) -> CoreResult<()> {
    match T::from_value(value) {
        Ok(v) => {
            *slot = v;
            Ok(())
        }
        Err(found) => Err(CoreError::type_mismatch(field, T::KIND, &found)),
    }
}

/// Removes `name` from decoded map pairs and converts it to `T`.
///
/// An absent key reads as null, so optional fields decode to `None`.
#[doc(hidden)]
pub fn take_field<T: FieldType>(pairs: &mut Vec<(String, Value)>, name: &str) -> CoreResult<T> {
    let value = match pairs.iter().position(|(k, _)| k == name) {
        Some(pos) => pairs.swap_remove(pos).1,
        None => Value::Null,
    };
    T::from_value(value).map_err(|found| {
        CoreError::invalid_format(format!(
            "field '{name}' expects {}, found {}",
            T::KIND,
            found.type_name()
        ))
    })
}

/// Implements [`Record`] for a struct from a list of named fields.
///
/// Each entry maps a stored field name to a struct field and its type.
/// The struct form declares the struct too; the `impl` form targets an
/// existing struct and must list every one of its fields.
///
/// ```
/// use memdb_core::{record, Record};
///
/// #[derive(Debug, Default)]
/// struct Point {
///     id: u32,
///     x: i64,
///     y: i64,
/// }
///
/// record!(impl Point {
///     "Id" => id: u32,
///     "X" => x: i64,
///     "Y" => y: i64,
/// });
///
/// assert!(Point::field_kind("X").is_some());
/// assert!(Point::field_kind("z").is_none());
/// ```
#[macro_export]
macro_rules! record {
    (
        impl $ty:ty {
            $($key:literal => $field:ident : $fty:ty),+ $(,)?
        }
    ) => {
        impl $crate::Record for $ty {
            fn field_kind(field: &str) -> ::core::option::Option<$crate::FieldKind> {
                match field {
                    $($key => ::core::option::Option::Some(<$fty as $crate::FieldType>::KIND),)+
                    _ => ::core::option::Option::None,
                }
            }

            fn get_field(&self, field: &str) -> $crate::CoreResult<$crate::Value> {
                match field {
                    $($key => ::core::result::Result::Ok(
                        <$fty as $crate::FieldType>::to_value(&self.$field)?,
                    ),)+
                    _ => ::core::result::Result::Err($crate::CoreError::unknown_field(field)),
                }
            }

            fn set_field(
                &mut self,
                field: &str,
                value: $crate::Value,
            ) -> $crate::CoreResult<()> {
                match field {
                    $($key => $crate::record::assign_field(&mut self.$field, field, value),)+
                    _ => ::core::result::Result::Err($crate::CoreError::unknown_field(field)),
                }
            }

            fn encode(&self) -> $crate::CoreResult<::std::vec::Vec<u8>> {
                let map = $crate::Value::Map(::std::vec![
                    $((
                        ::std::string::String::from($key),
                        <$fty as $crate::FieldType>::to_value(&self.$field)?,
                    ),)+
                ]);
                ::core::result::Result::Ok($crate::codec::to_canonical_cbor(&map)?)
            }

            fn decode(bytes: &[u8]) -> $crate::CoreResult<Self> {
                let mut pairs = $crate::codec::from_cbor(bytes)?.into_map()?;
                ::core::result::Result::Ok(Self {
                    $($field: $crate::record::take_field::<$fty>(&mut pairs, $key)?,)+
                })
            }
        }
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $($(#[$fmeta:meta])* $key:literal => $fvis:vis $field:ident : $fty:ty),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $($(#[$fmeta])* $fvis $field: $fty,)+
        }

        $crate::record!(impl $name {
            $($key => $field : $fty),+
        });
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use memdb_codec::{from_cbor, to_canonical_cbor};

    crate::record! {
        #[derive(Debug, Clone, PartialEq, Default)]
        struct Person {
            "Id" => id: i64,
            "Name" => name: String,
            "Nickname" => nickname: Option<String>,
            "Tags" => tags: Vec<String>,
            "Score" => score: f64,
        }
    }

    /// Hand-written impl, the way a caller without the macro would do it.
    #[derive(Debug, Clone, PartialEq)]
    struct Counter {
        key: String,
        hits: u16,
    }

    impl Record for Counter {
        fn field_kind(field: &str) -> Option<FieldKind> {
            match field {
                "Key" => Some(FieldKind::Text),
                "Hits" => Some(FieldKind::UInt16),
                _ => None,
            }
        }

        fn get_field(&self, field: &str) -> CoreResult<Value> {
            match field {
                "Key" => Ok(Value::from(&self.key)),
                "Hits" => Ok(Value::from(self.hits)),
                _ => Err(CoreError::unknown_field(field)),
            }
        }

        fn set_field(&mut self, field: &str, value: Value) -> CoreResult<()> {
            match field {
                "Key" => assign_field(&mut self.key, field, value),
                "Hits" => assign_field(&mut self.hits, field, value),
                _ => Err(CoreError::unknown_field(field)),
            }
        }

        fn encode(&self) -> CoreResult<Vec<u8>> {
            let map = Value::map([
                ("Key", Value::from(&self.key)),
                ("Hits", Value::from(self.hits)),
            ]);
            Ok(to_canonical_cbor(&map)?)
        }

        fn decode(bytes: &[u8]) -> CoreResult<Self> {
            let mut pairs = from_cbor(bytes)?.into_map()?;
            Ok(Self {
                key: take_field(&mut pairs, "Key")?,
                hits: take_field(&mut pairs, "Hits")?,
            })
        }
    }

    fn alice() -> Person {
        Person {
            id: 1,
            name: "Alice".into(),
            nickname: None,
            tags: vec!["admin".into()],
            score: 9.5,
        }
    }

    #[test]
    fn field_kinds() {
        assert_eq!(Person::field_kind("Id"), Some(FieldKind::Int64));
        assert_eq!(Person::field_kind("Nickname"), Some(FieldKind::Text));
        assert_eq!(Person::field_kind("Tags"), Some(FieldKind::Array));
        assert_eq!(Person::field_kind("Score"), Some(FieldKind::Float));
        assert_eq!(Person::field_kind("id"), None);
    }

    #[test]
    fn get_and_set_fields() {
        let mut p = alice();
        assert_eq!(p.get_field("Name").unwrap(), Value::from("Alice"));
        assert_eq!(p.get_field("Nickname").unwrap(), Value::Null);

        p.set_field("Nickname", Value::from("Al")).unwrap();
        p.set_field("Id", Value::Integer(42)).unwrap();
        assert_eq!(p.nickname.as_deref(), Some("Al"));
        assert_eq!(p.id, 42);
    }

    #[test]
    fn set_field_rejects_wrong_shape() {
        let mut p = alice();
        let err = p.set_field("Id", Value::from("42")).unwrap_err();
        assert!(matches!(
            err,
            CoreError::TypeMismatch {
                expected: FieldKind::Int64,
                found: "text",
                ..
            }
        ));
        assert_eq!(p.id, 1);

        let err = p.set_field("Missing", Value::Null).unwrap_err();
        assert!(matches!(err, CoreError::UnknownField { .. }));
    }

    #[test]
    fn encode_decode_roundtrip() {
        let p = alice();
        let decoded = Person::decode(&p.encode().unwrap()).unwrap();
        assert_eq!(decoded, p);
    }

    #[test]
    fn deterministic_encoding() {
        assert_eq!(alice().encode().unwrap(), alice().clone().encode().unwrap());
    }

    #[test]
    fn absent_optional_field_decodes_to_none() {
        let bytes = to_canonical_cbor(&Value::map([
            ("Id", Value::Integer(3)),
            ("Name", Value::from("Bob")),
            ("Tags", Value::Array(vec![])),
            ("Score", Value::Float(0.0)),
        ]))
        .unwrap();
        let p = Person::decode(&bytes).unwrap();
        assert_eq!(p.nickname, None);
        assert_eq!(p.name, "Bob");
    }

    #[test]
    fn decode_rejects_wrong_shape() {
        let bytes = to_canonical_cbor(&Value::map([("Key", Value::Integer(1))])).unwrap();
        assert!(matches!(
            Counter::decode(&bytes),
            Err(CoreError::InvalidFormat { .. })
        ));

        let bytes = to_canonical_cbor(&Value::Integer(1)).unwrap();
        assert!(matches!(Counter::decode(&bytes), Err(CoreError::Codec(_))));
    }

    #[test]
    fn hand_written_record() {
        let mut c = Counter {
            key: "home".into(),
            hits: 3,
        };
        c.set_field("Hits", Value::Integer(4)).unwrap();
        assert!(c.set_field("Hits", Value::Integer(70_000)).is_err());
        assert_eq!(Counter::decode(&c.encode().unwrap()).unwrap(), c);
    }
}
