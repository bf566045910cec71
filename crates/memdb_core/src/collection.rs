//! Per-collection record storage and identifier sequencing.

use std::any::type_name;

use memdb_codec::Value;

use crate::error::{CoreError, CoreResult};
use crate::field::{FieldCategory, FieldKind};
use crate::filter::Filter;
use crate::record::Record;

/// Encoded records of one collection plus its identifier counter.
///
/// Records are kept in insertion order. The counter holds the last
/// identifier handed out and never goes backwards, even when records are
/// removed.
#[derive(Debug)]
pub(crate) struct Collection {
    record_type: &'static str,
    records: Vec<Vec<u8>>,
    last_id: u64,
}

impl Collection {
    /// Creates an empty collection for records of type `R`.
    pub(crate) fn new<R: Record>(capacity: usize) -> Self {
        Self {
            record_type: type_name::<R>(),
            records: Vec::with_capacity(capacity),
            last_id: 0,
        }
    }

    /// Fails if this collection was created for a different record type.
    pub(crate) fn check_type<R: Record>(&self, name: &str) -> CoreResult<()> {
        let actual = type_name::<R>();
        if actual == self.record_type {
            Ok(())
        } else {
            Err(CoreError::RecordTypeMismatch {
                collection: name.to_string(),
                expected: self.record_type,
                actual,
            })
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) fn last_id(&self) -> u64 {
        self.last_id
    }

    /// Computes the identifier the next add would receive, typed for a
    /// field of `kind`. Does not advance the counter.
    pub(crate) fn next_identifier(&self, field: &str, kind: FieldKind) -> CoreResult<(u64, Value)> {
        let next = self.last_id.checked_add(1).ok_or_else(|| CoreError::IdentifierOverflow {
            field: field.to_string(),
            kind,
            value: self.last_id,
        })?;
        Ok((next, identifier_value(next, field, kind)?))
    }

    /// Appends an encoded record and commits `id` as the last identifier.
    pub(crate) fn push(&mut self, bytes: Vec<u8>, id: u64) {
        self.records.push(bytes);
        self.last_id = id;
    }

    pub(crate) fn replace(&mut self, pos: usize, bytes: Vec<u8>) {
        self.records[pos] = bytes;
    }

    /// Removes the record at `pos`, keeping the order of the rest.
    pub(crate) fn remove(&mut self, pos: usize) {
        self.records.remove(pos);
    }

    /// Encoded size of the record at `pos`.
    pub(crate) fn encoded_len(&self, pos: usize) -> usize {
        self.records[pos].len()
    }

    /// Decodes records matching `filter`, with their positions, stopping
    /// after `limit` matches if one is given.
    pub(crate) fn matching<R: Record>(
        &self,
        filter: &Filter,
        limit: Option<usize>,
    ) -> CoreResult<Vec<(usize, R)>> {
        let mut found = Vec::new();
        for (pos, bytes) in self.records.iter().enumerate() {
            if limit.is_some_and(|n| found.len() >= n) {
                break;
            }
            let record = R::decode(bytes)?;
            if filter.matches(&record)? {
                found.push((pos, record));
            }
        }
        Ok(found)
    }

    /// Position and decoded value of the first record matching `filter`.
    pub(crate) fn first_match<R: Record>(&self, filter: &Filter) -> CoreResult<Option<(usize, R)>> {
        Ok(self.matching(filter, Some(1))?.into_iter().next())
    }
}

/// Converts a counter value into the identifier stored in a field of `kind`.
///
/// Integer fields get the number itself and fail rather than wrap when it
/// exceeds the field's width. Text fields get its decimal form.
pub(crate) fn identifier_value(id: u64, field: &str, kind: FieldKind) -> CoreResult<Value> {
    let overflow = || CoreError::IdentifierOverflow {
        field: field.to_string(),
        kind,
        value: id,
    };
    match (kind.category(), kind.max_identifier()) {
        (FieldCategory::Text, _) => Ok(Value::Text(id.to_string())),
        (FieldCategory::SignedInt | FieldCategory::UnsignedInt, Some(max)) => {
            if id > max {
                return Err(overflow());
            }
            i64::try_from(id).map(Value::Integer).map_err(|_| overflow())
        }
        _ => Err(CoreError::UnsupportedIdentifierType {
            field: field.to_string(),
            kind,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::record! {
        #[derive(Debug, Clone, PartialEq)]
        struct Item {
            "Id" => id: u8,
            "Label" => label: String,
        }
    }

    crate::record! {
        #[derive(Debug, Clone, PartialEq)]
        struct Other {
            "Id" => id: String,
        }
    }

    fn item(id: u8, label: &str) -> Vec<u8> {
        Item {
            id,
            label: label.into(),
        }
        .encode()
        .unwrap()
    }

    #[test]
    fn identifiers_by_kind() {
        assert_eq!(
            identifier_value(5, "Id", FieldKind::Int32).unwrap(),
            Value::Integer(5)
        );
        assert_eq!(
            identifier_value(5, "Id", FieldKind::Text).unwrap(),
            Value::from("5")
        );
        assert!(matches!(
            identifier_value(5, "Id", FieldKind::Bool),
            Err(CoreError::UnsupportedIdentifierType { .. })
        ));
    }

    #[test]
    fn narrow_identifier_overflows_explicitly() {
        assert_eq!(
            identifier_value(127, "Id", FieldKind::Int8).unwrap(),
            Value::Integer(127)
        );
        assert!(matches!(
            identifier_value(128, "Id", FieldKind::Int8),
            Err(CoreError::IdentifierOverflow { value: 128, .. })
        ));
        assert!(identifier_value(1 << 63, "Id", FieldKind::UInt64).is_err());
    }

    #[test]
    fn counter_only_moves_on_push() {
        let mut c = Collection::new::<Item>(0);
        let (next, value) = c.next_identifier("Id", FieldKind::UInt8).unwrap();
        assert_eq!((next, value), (1, Value::Integer(1)));
        assert_eq!(c.last_id(), 0);

        c.push(item(1, "a"), next);
        assert_eq!(c.last_id(), 1);
        c.remove(0);
        assert!(c.is_empty());
        assert_eq!(c.next_identifier("Id", FieldKind::UInt8).unwrap().0, 2);
    }

    #[test]
    fn record_type_is_remembered() {
        let c = Collection::new::<Item>(4);
        assert!(c.check_type::<Item>("items").is_ok());
        assert!(matches!(
            c.check_type::<Other>("items"),
            Err(CoreError::RecordTypeMismatch { .. })
        ));
    }

    #[test]
    fn matching_keeps_insertion_order() {
        let mut c = Collection::new::<Item>(0);
        for (id, label) in [(1, "x"), (2, "y"), (3, "x"), (4, "x")] {
            c.push(item(id, label), u64::from(id));
        }

        let filter = Filter::eq("Label", "x");
        let all: Vec<usize> = c
            .matching::<Item>(&filter, None)
            .unwrap()
            .into_iter()
            .map(|(pos, _)| pos)
            .collect();
        assert_eq!(all, vec![0, 2, 3]);
        assert_eq!(c.matching::<Item>(&filter, Some(2)).unwrap().len(), 2);

        let (pos, first) = c.first_match::<Item>(&Filter::eq("Id", 2)).unwrap().unwrap();
        assert_eq!(pos, 1);
        assert_eq!(first.label, "y");
        assert!(c.first_match::<Item>(&Filter::eq("Id", 9)).unwrap().is_none());
    }

    #[test]
    fn replace_in_place() {
        let mut c = Collection::new::<Item>(0);
        c.push(item(1, "a"), 1);
        c.push(item(2, "b"), 2);
        c.replace(0, item(1, "z"));
        let labels: Vec<String> = c
            .matching::<Item>(&Filter::new(), None)
            .unwrap()
            .into_iter()
            .map(|(_, r)| r.label)
            .collect();
        assert_eq!(labels, vec!["z", "b"]);
        assert_eq!(c.len(), 2);
        assert!(c.encoded_len(0) > 0);
    }
}
