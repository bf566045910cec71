//! The store: named collections behind one lock.

use std::collections::HashMap;

use memdb_codec::Value;
use parking_lot::RwLock;
use tracing::{debug, trace, warn};

use crate::collection::{identifier_value, Collection};
use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::field::{FieldCategory, FieldKind};
use crate::filter::Filter;
use crate::record::Record;
use crate::stats::{StatsSnapshot, StoreStats};

/// Lock-protected part of a store.
struct StoreState {
    collections: HashMap<String, Collection>,
    id_field: String,
}

/// An in-memory store of records grouped into named collections.
///
/// Each collection hands out its own increasing identifiers, written into
/// the record field named by [`Store::identifier_field`] (default `"Id"`).
/// Records are stored encoded, so a caller's value and the stored copy
/// never share state: every read returns a fresh decoded record.
///
/// A single reader-writer lock guards the whole store. Lookups share it,
/// mutations take it exclusively. Share a store between threads with
/// `Arc<Store>`.
///
/// ```
/// use memdb_core::{record, Store};
///
/// record! {
///     #[derive(Debug, Clone, PartialEq, Default)]
///     pub struct User {
///         "Id" => pub id: String,
///         "Name" => pub name: String,
///         "Age" => pub age: i64,
///     }
/// }
///
/// let store = Store::new();
/// let mut user = User { name: "Ann".into(), age: 15, ..Default::default() };
/// store.add("users", &mut user).unwrap();
/// assert_eq!(user.id, "1");
///
/// user.age = 20;
/// store.update("users", "1", &mut user).unwrap();
///
/// let found: Option<User> = store.find_by_id("users", "1").unwrap();
/// assert_eq!(found.unwrap().age, 20);
/// ```
pub struct Store {
    state: RwLock<StoreState>,
    config: Config,
    stats: StoreStats,
}

impl Store {
    /// Creates an empty store with the default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates an empty store with the given configuration.
    pub fn with_config(config: Config) -> Self {
        Self {
            state: RwLock::new(StoreState {
                collections: HashMap::new(),
                id_field: config.id_field.clone(),
            }),
            config,
            stats: StoreStats::new(),
        }
    }

    /// Returns the configuration the store was created with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the current identifier field name.
    pub fn identifier_field(&self) -> String {
        self.state.read().id_field.clone()
    }

    /// Changes the identifier field name.
    ///
    /// The new name applies to every operation issued afterwards, including
    /// operations on collections that already hold records.
    pub fn set_identifier_field(&self, name: impl Into<String>) {
        let name = name.into();
        let mut state = self.state.write();
        if state.id_field == name {
            return;
        }
        let populated = state.collections.values().filter(|c| !c.is_empty()).count();
        if populated > 0 {
            warn!(
                from = %state.id_field,
                to = %name,
                populated,
                "identifier field changed while collections hold records"
            );
        }
        debug!("Identifier field changed from {:?} to {:?}", state.id_field, name);
        state.id_field = name;
    }

    /// Adds a record to a collection, creating the collection if needed.
    ///
    /// The next identifier of the collection is written into the record's
    /// identifier field, on the caller's value as well as the stored copy,
    /// and returned. A failed add leaves the store and the counter unchanged.
    ///
    /// # Errors
    ///
    /// - [`CoreError::MissingIdentifierField`] if `R` has no identifier field
    /// - [`CoreError::UnsupportedIdentifierType`] if that field is not an
    ///   integer or text
    /// - [`CoreError::IdentifierOverflow`] if the identifier does not fit
    /// - [`CoreError::RecordTypeMismatch`] if the collection holds another type
    /// - [`CoreError::Codec`] if `record` cannot be encoded
    pub fn add<R: Record>(&self, collection: &str, record: &mut R) -> CoreResult<Value> {
        let mut state = self.state.write();
        let result = self.add_locked(&mut state, collection, record);
        self.track(result)
    }

    /// Returns every record of a collection in insertion order.
    ///
    /// An unknown collection yields an empty list.
    pub fn find_all<R: Record>(&self, collection: &str) -> CoreResult<Vec<R>> {
        self.find_where(collection, &Filter::new())
    }

    /// Returns the record with the given identifier, if any.
    ///
    /// `u64` identifiers have no lossless `Into<Value>`; convert them with
    /// `Value::try_from`, as in `find_by_id(c, Value::try_from(id)?)`.
    ///
    /// # Errors
    ///
    /// [`CoreError::MissingIdentifierField`] if `R` has no identifier field.
    pub fn find_by_id<R: Record>(
        &self,
        collection: &str,
        id: impl Into<Value>,
    ) -> CoreResult<Option<R>> {
        let state = self.state.read();
        let result = id_filter::<R>(&state.id_field, id.into())
            .and_then(|filter| self.select(&state, collection, &filter, Some(1)));
        self.track(result).map(|mut found| found.pop())
    }

    /// Like [`Store::find_by_id`], but an absent record is an error.
    ///
    /// # Errors
    ///
    /// [`CoreError::NotFound`] if no record has the identifier.
    pub fn get_by_id<R: Record>(&self, collection: &str, id: impl Into<Value>) -> CoreResult<R> {
        let found = self.find_by_id(collection, id)?;
        let result = found.ok_or_else(|| CoreError::not_found(collection));
        self.track(result)
    }

    /// Returns the first record whose `field` equals `value`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::UnknownField`] if `R` has no such field and the
    ///   collection exists
    /// - [`CoreError::RecordTypeMismatch`] if the collection holds another type
    pub fn find_one_by<R: Record>(
        &self,
        collection: &str,
        field: &str,
        value: impl Into<Value>,
    ) -> CoreResult<Option<R>> {
        let state = self.state.read();
        let filter = Filter::eq(field, value);
        let result = self.select(&state, collection, &filter, Some(1));
        self.track(result).map(|mut found| found.pop())
    }

    /// Returns every record whose `field` equals `value`, in insertion order.
    ///
    /// # Errors
    ///
    /// [`CoreError::UnknownField`] if `R` has no such field and the
    /// collection exists.
    pub fn find_by<R: Record>(
        &self,
        collection: &str,
        field: &str,
        value: impl Into<Value>,
    ) -> CoreResult<Vec<R>> {
        self.find_where(collection, &Filter::eq(field, value))
    }

    /// Returns every record satisfying all clauses of `filter`.
    pub fn find_where<R: Record>(&self, collection: &str, filter: &Filter) -> CoreResult<Vec<R>> {
        let state = self.state.read();
        let result = self.select(&state, collection, filter, None);
        self.track(result)
    }

    /// Replaces the record with identifier `id`.
    ///
    /// The stored identifier is written back into `record`, so the
    /// identifier never changes through an update. If the update fails,
    /// `record` keeps the identifier it had. `u64` identifiers go through
    /// `Value::try_from`, as for [`Store::find_by_id`].
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] if the collection or the record is absent
    /// - [`CoreError::MissingIdentifierField`] if `R` has no identifier field
    /// - [`CoreError::Codec`] if `record` cannot be encoded
    pub fn update<R: Record>(
        &self,
        collection: &str,
        id: impl Into<Value>,
        record: &mut R,
    ) -> CoreResult<()> {
        let mut state = self.state.write();
        let result = id_filter::<R>(&state.id_field, id.into())
            .and_then(|filter| self.replace_first(&mut state, collection, &filter, record));
        self.track(result).map(|_| ())
    }

    /// Replaces the first record satisfying `filter` and returns its
    /// identifier, which is carried over into `record`.
    ///
    /// # Errors
    ///
    /// [`CoreError::NotFound`] if nothing matches.
    pub fn update_where<R: Record>(
        &self,
        collection: &str,
        filter: &Filter,
        record: &mut R,
    ) -> CoreResult<Value> {
        let mut state = self.state.write();
        let result = self.replace_first(&mut state, collection, filter, record);
        self.track(result)
    }

    /// Removes the record with identifier `id`.
    ///
    /// Returns `false` if there was nothing to remove. The collection's
    /// identifier counter is not affected. `u64` identifiers go through
    /// `Value::try_from`, as for [`Store::find_by_id`].
    ///
    /// # Errors
    ///
    /// [`CoreError::MissingIdentifierField`] if `R` has no identifier field.
    pub fn remove<R: Record>(&self, collection: &str, id: impl Into<Value>) -> CoreResult<bool> {
        let mut state = self.state.write();
        let result = id_filter::<R>(&state.id_field, id.into())
            .and_then(|filter| self.remove_first::<R>(&mut state, collection, &filter));
        self.track(result)
    }

    /// Removes the first record whose `field` equals `value`.
    pub fn remove_by<R: Record>(
        &self,
        collection: &str,
        field: &str,
        value: impl Into<Value>,
    ) -> CoreResult<bool> {
        let mut state = self.state.write();
        let filter = Filter::eq(field, value);
        let result = self.remove_first::<R>(&mut state, collection, &filter);
        self.track(result)
    }

    /// Number of records in a collection.
    pub fn count(&self, collection: &str) -> usize {
        self.state
            .read()
            .collections
            .get(collection)
            .map_or(0, Collection::len)
    }

    /// Names of all collections, sorted.
    pub fn collection_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.state.read().collections.keys().cloned().collect();
        names.sort();
        names
    }

    /// Last identifier handed out by a collection, or `None` if it does
    /// not exist.
    pub fn last_id(&self, collection: &str) -> Option<u64> {
        self.state
            .read()
            .collections
            .get(collection)
            .map(Collection::last_id)
    }

    /// Returns a snapshot of the operation counters.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    fn track<T>(&self, result: CoreResult<T>) -> CoreResult<T> {
        result.inspect_err(|_| self.stats.record_error())
    }

    fn add_locked<R: Record>(
        &self,
        state: &mut StoreState,
        name: &str,
        record: &mut R,
    ) -> CoreResult<Value> {
        let StoreState {
            collections,
            id_field,
        } = state;
        let id_field = id_field.as_str();
        let kind = identifier_kind::<R>(id_field)?;

        let (next, id) = match collections.get(name) {
            Some(collection) => {
                collection.check_type::<R>(name)?;
                collection.next_identifier(id_field, kind)?
            }
            None => (1, identifier_value(1, id_field, kind)?),
        };

        let bytes = encode_with_id(record, id_field, &id)?;
        self.stats.record_add(bytes.len() as u64);

        let collection = collections.entry(name.to_string()).or_insert_with(|| {
            debug!("Created collection {:?} for {}", name, std::any::type_name::<R>());
            Collection::new::<R>(self.config.initial_capacity)
        });
        collection.push(bytes, next);
        trace!(collection = name, id = ?id, "record added");
        Ok(id)
    }

    fn select<R: Record>(
        &self,
        state: &StoreState,
        name: &str,
        filter: &Filter,
        limit: Option<usize>,
    ) -> CoreResult<Vec<R>> {
        let Some(collection) = state.collections.get(name) else {
            return Ok(Vec::new());
        };
        collection.check_type::<R>(name)?;
        filter.validate::<R>()?;

        self.stats.record_scan();
        let found = collection.matching::<R>(filter, limit)?;
        Ok(found
            .into_iter()
            .map(|(pos, record)| {
                self.stats.record_read(collection.encoded_len(pos) as u64);
                record
            })
            .collect())
    }

    fn replace_first<R: Record>(
        &self,
        state: &mut StoreState,
        name: &str,
        filter: &Filter,
        record: &mut R,
    ) -> CoreResult<Value> {
        let StoreState {
            collections,
            id_field,
        } = state;
        let id_field = id_field.as_str();
        let Some(collection) = collections.get_mut(name) else {
            return Err(CoreError::not_found(name));
        };
        collection.check_type::<R>(name)?;
        filter.validate::<R>()?;
        if R::field_kind(id_field).is_none() {
            return Err(CoreError::missing_identifier_field(id_field));
        }

        self.stats.record_scan();
        let Some((pos, current)) = collection.first_match::<R>(filter)? else {
            return Err(CoreError::not_found(name));
        };

        let id = current.get_field(id_field)?;
        let bytes = encode_with_id(record, id_field, &id)?;
        self.stats.record_update(bytes.len() as u64);
        collection.replace(pos, bytes);
        trace!(collection = name, id = ?id, "record updated");
        Ok(id)
    }

    fn remove_first<R: Record>(
        &self,
        state: &mut StoreState,
        name: &str,
        filter: &Filter,
    ) -> CoreResult<bool> {
        let Some(collection) = state.collections.get_mut(name) else {
            return Ok(false);
        };
        collection.check_type::<R>(name)?;
        filter.validate::<R>()?;

        self.stats.record_scan();
        match collection.first_match::<R>(filter)? {
            Some((pos, _)) => {
                collection.remove(pos);
                self.stats.record_remove();
                trace!(collection = name, position = pos, "record removed");
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("Store")
            .field("id_field", &state.id_field)
            .field("collections", &state.collections.len())
            .finish_non_exhaustive()
    }
}

/// Declared kind of `R`'s identifier field, if it can hold identifiers.
fn identifier_kind<R: Record>(id_field: &str) -> CoreResult<FieldKind> {
    let kind = R::field_kind(id_field)
        .ok_or_else(|| CoreError::missing_identifier_field(id_field))?;
    match kind.category() {
        FieldCategory::SignedInt | FieldCategory::UnsignedInt | FieldCategory::Text => Ok(kind),
        FieldCategory::Other => Err(CoreError::UnsupportedIdentifierType {
            field: id_field.to_string(),
            kind,
        }),
    }
}

/// Writes `id` into `record` and encodes it. If encoding fails the
/// record's previous identifier is put back.
fn encode_with_id<R: Record>(record: &mut R, id_field: &str, id: &Value) -> CoreResult<Vec<u8>> {
    let previous = record.get_field(id_field)?;
    record.set_field(id_field, id.clone())?;
    record.encode().or_else(|err| {
        record.set_field(id_field, previous)?;
        Err(err)
    })
}

/// Filter selecting records by identifier.
fn id_filter<R: Record>(id_field: &str, id: Value) -> CoreResult<Filter> {
    if R::field_kind(id_field).is_none() {
        return Err(CoreError::missing_identifier_field(id_field));
    }
    Ok(Filter::eq(id_field, id))
}
