//! Field-equality filters.

use memdb_codec::Value;

use crate::error::{CoreError, CoreResult};
use crate::record::Record;

/// A conjunction of `field == value` clauses.
///
/// Values compare structurally: integers of every width compare by numeric
/// value, and values of different variants are simply unequal.
///
/// ```
/// use memdb_core::Filter;
///
/// let filter = Filter::eq("Age", 22).and_eq("Name", "Bob");
/// assert_eq!(filter.clauses().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Filter {
    clauses: Vec<(String, Value)>,
}

impl Filter {
    /// Creates an empty filter, which matches every record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a filter with a single equality clause.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new().and_eq(field, value)
    }

    /// Adds an equality clause.
    #[must_use]
    pub fn and_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push((field.into(), value.into()));
        self
    }

    /// Returns the clauses in insertion order.
    pub fn clauses(&self) -> &[(String, Value)] {
        &self.clauses
    }

    /// Returns true if the filter has no clauses.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Checks that every referenced field exists on `R`.
    ///
    /// # Errors
    ///
    /// [`CoreError::UnknownField`] naming the first unknown field.
    pub fn validate<R: Record>(&self) -> CoreResult<()> {
        match self.clauses.iter().find(|(f, _)| R::field_kind(f).is_none()) {
            Some((field, _)) => Err(CoreError::unknown_field(field.as_str())),
            None => Ok(()),
        }
    }

    /// Returns true if `record` satisfies every clause.
    pub fn matches<R: Record>(&self, record: &R) -> CoreResult<bool> {
        for (field, expected) in &self.clauses {
            if record.get_field(field)? != *expected {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::record! {
        #[derive(Debug, Clone, PartialEq)]
        struct Row {
            "Id" => id: u8,
            "Name" => name: String,
            "Age" => age: i16,
        }
    }

    fn row(age: i16) -> Row {
        Row {
            id: 1,
            name: "Ann".into(),
            age,
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(Filter::new().is_empty());
        assert!(Filter::new().matches(&row(3)).unwrap());
    }

    #[test]
    fn integers_compare_across_widths() {
        assert!(Filter::eq("Age", 34i64).matches(&row(34)).unwrap());
        assert!(Filter::eq("Age", 34u8).matches(&row(34)).unwrap());
        assert!(!Filter::eq("Age", 35).matches(&row(34)).unwrap());
    }

    #[test]
    fn different_variants_never_match() {
        assert!(!Filter::eq("Age", "34").matches(&row(34)).unwrap());
        assert!(!Filter::eq("Id", Value::Null).matches(&row(34)).unwrap());
    }

    #[test]
    fn all_clauses_must_hold() {
        let f = Filter::eq("Age", 34).and_eq("Name", "Ann");
        assert!(f.matches(&row(34)).unwrap());
        let f = f.and_eq("Id", 2);
        assert!(!f.matches(&row(34)).unwrap());
    }

    #[test]
    fn validate_names_unknown_field() {
        assert!(Filter::eq("Age", 1).validate::<Row>().is_ok());
        let err = Filter::eq("Age", 1)
            .and_eq("Height", 2)
            .validate::<Row>()
            .unwrap_err();
        assert!(matches!(err, CoreError::UnknownField { field } if field == "Height"));
    }
}
