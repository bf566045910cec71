//! Property-based test generators using proptest.

use proptest::prelude::*;

use crate::fixtures::{Product, User};

/// Strategy for generating collection names.
pub fn collection_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_]{0,15}").expect("Invalid regex")
}

/// Strategy for generating users that have not been added yet.
pub fn user_strategy() -> impl Strategy<Value = User> {
    ("[A-Z][a-z]{0,11}", 0i64..120).prop_map(|(name, age)| User::new(name, age))
}

/// Strategy for generating products that have not been added yet.
pub fn product_strategy() -> impl Strategy<Value = Product> {
    (
        "[a-z]{1,12}",
        0.0f64..1_000.0,
        prop::collection::vec("[a-z]{1,6}", 0..4),
        prop::option::of(any::<u16>()),
    )
        .prop_map(|(name, price, tags, stock)| Product {
            id: 0,
            name,
            price,
            tags,
            stock,
        })
}

/// An operation against the user collection.
#[derive(Debug, Clone)]
pub enum StoreOperation {
    /// Add a user.
    Add(User),
    /// Replace the user with the given identifier.
    Update {
        /// Identifier to target, possibly absent.
        id: u64,
        /// Replacement value.
        user: User,
    },
    /// Remove the user with the given identifier.
    Remove {
        /// Identifier to target, possibly absent.
        id: u64,
    },
    /// Look up users by age.
    FindByAge {
        /// Age to match.
        age: i64,
    },
}

/// Strategy for generating store operations.
pub fn store_operation_strategy() -> impl Strategy<Value = StoreOperation> {
    prop_oneof![
        3 => user_strategy().prop_map(StoreOperation::Add),
        1 => (1u64..32, user_strategy()).prop_map(|(id, user)| StoreOperation::Update { id, user }),
        1 => (1u64..32).prop_map(|id| StoreOperation::Remove { id }),
        2 => (0i64..120).prop_map(|age| StoreOperation::FindByAge { age }),
    ]
}

/// Strategy for generating a sequence of operations.
pub fn operation_sequence_strategy(
    min_ops: usize,
    max_ops: usize,
) -> impl Strategy<Value = Vec<StoreOperation>> {
    prop::collection::vec(store_operation_strategy(), min_ops..max_ops)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memdb_core::Record;

    proptest! {
        #![proptest_config(PropTestConfig::quick().to_proptest_config())]

        #[test]
        fn collection_name_is_valid(name in collection_name_strategy()) {
            let first = name.chars().next();
            prop_assert!(first.is_some_and(|c| c.is_ascii_lowercase()));
        }

        #[test]
        fn generated_users_have_no_id(user in user_strategy()) {
            prop_assert!(user.id.is_empty());
            prop_assert!(user.age < 120);
        }

        #[test]
        fn generated_products_encode(product in product_strategy()) {
            let decoded = Product::decode(&product.encode().unwrap()).unwrap();
            prop_assert_eq!(decoded, product);
        }
    }
}
