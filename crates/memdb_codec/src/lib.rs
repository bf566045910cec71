//! # memdb Codec
//!
//! Value model and record codec for memdb.
//!
//! Records are stored as canonical CBOR so that the store never shares
//! memory with a caller-held record:
//! - Identical records produce identical bytes
//! - Maps are keyed by field name and sorted canonically
//! - Integers use the shortest encoding, floats always use 8 bytes
//! - No indefinite-length items, no NaN
//!
//! ## Usage
//!
//! ```
//! use memdb_codec::{from_cbor, to_canonical_cbor, Value};
//!
//! let record = Value::map([("Id", Value::from(1)), ("Name", Value::from("Alice"))]);
//! let bytes = to_canonical_cbor(&record).unwrap();
//! assert_eq!(from_cbor(&bytes).unwrap().get("Name"), Some(&Value::from("Alice")));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod decoder;
mod encoder;
mod error;
mod value;

pub use decoder::{from_cbor, CanonicalDecoder};
pub use encoder::{to_canonical_cbor, CanonicalEncoder};
pub use error::{CodecError, CodecResult};
pub use value::Value;
