//! Store configuration.

/// Identifier field name used when none is configured.
pub const DEFAULT_ID_FIELD: &str = "Id";

/// Configuration for creating a [`Store`](crate::Store).
#[derive(Debug, Clone)]
pub struct Config {
    /// Name of the field holding each record's identifier.
    pub id_field: String,

    /// Capacity reserved for a collection when it is created.
    pub initial_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            id_field: DEFAULT_ID_FIELD.to_string(),
            initial_capacity: 0,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the identifier field name.
    #[must_use]
    pub fn id_field(mut self, name: impl Into<String>) -> Self {
        self.id_field = name.into();
        self
    }

    /// Sets the per-collection capacity hint.
    #[must_use]
    pub const fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }
}
