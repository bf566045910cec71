//! Benchmark utilities.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use memdb_core::{record, Store};
use rand::distributions::Alphanumeric;
use rand::Rng;

record! {
    /// Record type used by the store benchmarks.
    #[derive(Debug, Clone, Default)]
    pub struct Account {
        /// Assigned identifier.
        "Id" => pub id: u64,
        /// Owner name.
        "Owner" => pub owner: String,
        /// Bucket used by field lookups.
        "Bucket" => pub bucket: i32,
        /// Opaque payload.
        "Payload" => pub payload: Vec<u8>,
    }
}

/// Collection used by the store benchmarks.
pub const ACCOUNTS: &str = "accounts";

/// Generate random payload bytes of the specified size.
pub fn random_data(size: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..size).map(|_| rng.gen()).collect()
}

/// Generate an account that has not been added yet.
pub fn random_account(buckets: i32, payload_size: usize) -> Account {
    let mut rng = rand::thread_rng();
    let owner: String = (&mut rng)
        .sample_iter(&Alphanumeric)
        .take(12)
        .map(char::from)
        .collect();
    Account {
        id: 0,
        owner,
        bucket: rng.gen_range(0..buckets.max(1)),
        payload: random_data(payload_size),
    }
}

/// Creates a store holding `count` random accounts.
pub fn populated_store(count: usize, buckets: i32, payload_size: usize) -> Store {
    let store = Store::new();
    for _ in 0..count {
        let mut account = random_account(buckets, payload_size);
        if store.add(ACCOUNTS, &mut account).is_err() {
            break;
        }
    }
    store
}
