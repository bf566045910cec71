//! # memdb Core
//!
//! A concurrent, in-process record store.
//!
//! Records are plain structs implementing [`Record`], usually through the
//! [`record!`] macro. A [`Store`] groups them into named collections,
//! assigns each added record the next identifier of its collection and
//! supports lookup, update and removal by identifier or by field value.
//!
//! Key properties:
//! - **Isolation**: records are stored as canonical CBOR, reads decode
//!   fresh copies
//! - **Stable identifiers**: a collection's counter never goes backwards,
//!   updates keep the stored identifier
//! - **Thread safety**: one reader-writer lock over the whole store
//!
//! ## Example
//!
//! ```
//! use memdb_core::{record, Filter, Store};
//!
//! record! {
//!     #[derive(Debug, Clone, Default)]
//!     pub struct Product {
//!         "Id" => pub id: u32,
//!         "Name" => pub name: String,
//!         "Stock" => pub stock: i32,
//!     }
//! }
//!
//! let store = Store::new();
//! for (name, stock) in [("bolt", 0), ("nut", 12), ("gear", 0)] {
//!     let mut p = Product { name: name.into(), stock, ..Default::default() };
//!     store.add("products", &mut p).unwrap();
//! }
//!
//! let empty: Vec<Product> = store.find_where("products", &Filter::eq("Stock", 0)).unwrap();
//! assert_eq!(empty.len(), 2);
//! assert!(store.remove::<Product>("products", 1).unwrap());
//! assert_eq!(store.count("products"), 2);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod collection;
mod config;
mod error;
mod field;
mod filter;
#[doc(hidden)]
pub mod record;
mod stats;
mod store;

pub use memdb_codec as codec;
pub use memdb_codec::Value;

pub use config::{Config, DEFAULT_ID_FIELD};
pub use error::{CoreError, CoreResult};
pub use field::{FieldCategory, FieldKind, FieldType};
pub use filter::Filter;
pub use record::Record;
pub use stats::{StatsSnapshot, StoreStats};
pub use store::Store;
