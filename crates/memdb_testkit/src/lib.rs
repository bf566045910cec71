//! # memdb Testkit
//!
//! Test utilities for memdb.
//!
//! This crate provides:
//! - Sample record types and store fixtures
//! - Property-based test generators using proptest
//! - Concurrency stress helpers
//!
//! Cross-crate behavior tests live under `tests/`.
//!
//! ## Usage
//!
//! ```
//! use memdb_testkit::prelude::*;
//!
//! let store = populated_store(3);
//! let users: Vec<User> = store.find_all(USERS).unwrap();
//! assert_eq!(users.len(), 3);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod stress;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::stress::*;
}

pub use fixtures::*;
pub use generators::*;
pub use stress::*;
