use crate::value::Value;
use derive_more::Deref;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, rc::Rc};
use thiserror::Error as ThisError;

///
/// Record
///
/// One loosely-typed row: a mapping from field name to value.
/// Read-only once produced by the loader; field presence is not
/// guaranteed uniform across records.
///

#[derive(Clone, Debug, Default, Deref, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record(BTreeMap<String, Value>);

impl Record {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Build a record from owned (field, value) entries.
    ///
    /// Later duplicates win, mirroring the loader's object semantics.
    pub fn from_entries<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Fallible field accessor; absence is a first-class outcome here.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }
}

/// Materialized row sequence shared between handles and the result cache.
pub type Rows = Vec<Rc<Record>>;

///
/// StoreLoadError
///

#[derive(Debug, ThisError)]
pub enum StoreLoadError {
    #[error("record collection failed to parse: {0}")]
    Parse(#[from] serde_json::Error),
}

///
/// RecordStore
///
/// The ordered record sequence supplied by the external loader.
/// Immutable for the lifetime of the engine; rows are reference-counted so
/// materialized result sets share them instead of cloning.
///

#[derive(Clone, Debug, Default, Deref)]
pub struct RecordStore(Vec<Rc<Record>>);

impl RecordStore {
    #[must_use]
    pub fn new(records: Vec<Record>) -> Self {
        Self(records.into_iter().map(Rc::new).collect())
    }

    /// Load a store from a JSON document containing an array of objects.
    ///
    /// This is the conventional loader boundary; any other source just needs
    /// to produce `Vec<Record>`.
    pub fn from_json_str(source: &str) -> Result<Self, StoreLoadError> {
        let records: Vec<Record> = serde_json::from_str(source)?;

        Ok(Self::new(records))
    }

    #[must_use]
    pub fn rows(&self) -> &[Rc<Record>] {
        self.0.as_slice()
    }
}

impl FromIterator<Record> for RecordStore {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self(iter.into_iter().map(Rc::new).collect())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::{Record, RecordStore};
    use crate::value::Value;

    #[test]
    fn field_access_distinguishes_absent_from_null() {
        let record = Record::from_entries([("present", Value::Null)]);

        assert_eq!(record.field("present"), Some(&Value::Null));
        assert_eq!(record.field("absent"), None);
    }

    #[test]
    fn json_loader_preserves_row_order() {
        let store = RecordStore::from_json_str(
            r#"[{"name":"a","age":5},{"name":"b","age":9},{"name":"c","age":5}]"#,
        )
        .expect("well-formed document");

        let names: Vec<_> = store
            .rows()
            .iter()
            .map(|r| r.field("name").cloned().expect("name present"))
            .collect();
        assert_eq!(
            names,
            vec![
                Value::Text("a".to_string()),
                Value::Text("b".to_string()),
                Value::Text("c".to_string()),
            ]
        );
    }

    #[test]
    fn json_loader_rejects_non_array_documents() {
        assert!(RecordStore::from_json_str(r#"{"name":"a"}"#).is_err());
    }
}
