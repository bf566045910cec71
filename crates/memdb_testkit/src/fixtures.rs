//! Test fixtures and store helpers.
//!
//! Provides sample record types and convenience functions for setting up
//! stores in common test scenarios.

use memdb_core::{record, Config, Store};

record! {
    /// A user keyed by a text identifier.
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct User {
        /// Assigned identifier, in decimal.
        "Id" => pub id: String,
        /// Display name.
        "Name" => pub name: String,
        /// Age in years.
        "Age" => pub age: i64,
    }
}

impl User {
    /// Creates a user that has not been added yet.
    pub fn new(name: impl Into<String>, age: i64) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            age,
        }
    }
}

record! {
    /// A product keyed by a numeric identifier.
    #[derive(Debug, Clone, PartialEq, Default)]
    pub struct Product {
        /// Assigned identifier.
        "Id" => pub id: u32,
        /// Product name.
        "Name" => pub name: String,
        /// Unit price.
        "Price" => pub price: f64,
        /// Free-form labels.
        "Tags" => pub tags: Vec<String>,
        /// Discontinued products have no stock count.
        "Stock" => pub stock: Option<u16>,
    }
}

impl Product {
    /// Creates a product that has not been added yet.
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
            ..Self::default()
        }
    }
}

/// Name of the collection used by the fixtures.
pub const USERS: &str = "users";

/// Name of the product collection used by the fixtures.
pub const PRODUCTS: &str = "products";

/// Installs a `tracing` subscriber for tests, filtered by `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// Runs a test with a fresh store.
///
/// # Example
///
/// ```
/// use memdb_testkit::{with_store, User, USERS};
///
/// with_store(|store| {
///     store.add(USERS, &mut User::new("Ann", 40)).unwrap();
///     assert_eq!(store.count(USERS), 1);
/// });
/// ```
pub fn with_store<F, T>(f: F) -> T
where
    F: FnOnce(&Store) -> T,
{
    let store = Store::new();
    f(&store)
}

/// Runs a test with a fresh store built from `config`.
pub fn with_store_config<F, T>(config: Config, f: F) -> T
where
    F: FnOnce(&Store) -> T,
{
    let store = Store::with_config(config);
    f(&store)
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;

    /// Creates a store holding `count` users named `user-<n>`, aged `n % 100`.
    pub fn populated_store(count: usize) -> Store {
        let store = Store::new();
        for n in 0..count {
            let age = i64::try_from(n % 100).expect("age fits in i64");
            store
                .add(USERS, &mut User::new(format!("user-{n}"), age))
                .expect("Failed to add user");
        }
        store
    }

    /// Creates a store holding users with the given ages, in order.
    pub fn store_with_ages(ages: &[i64]) -> Store {
        let store = Store::new();
        for (n, age) in ages.iter().enumerate() {
            store
                .add(USERS, &mut User::new(format!("user-{n}"), *age))
                .expect("Failed to add user");
        }
        store
    }
}

pub use scenarios::*;
