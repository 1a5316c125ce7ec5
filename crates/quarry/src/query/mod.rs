//! The filter-expression engine: lookup grammar, per-row evaluation,
//! conjunction matching, exclusion, signatures, caching, and the
//! chainable query handle.

pub mod cache;
pub mod lookup;
pub mod queryset;
pub mod signature;

mod eval;
mod exclude;
mod matcher;

#[cfg(test)]
mod tests;

use crate::value::Value;
use derive_more::{Deref, IntoIterator};
use std::collections::BTreeMap;

// re-exports
pub use cache::{BoundedFifo, Disabled, EvictionPolicy, NeverEvict, ResultCache};
pub use eval::EvalError;
pub use lookup::{Command, Conjunction, Lookup, LookupError};
pub use queryset::{Engine, QuerySet};
pub use signature::QuerySignature;

///
/// FilterSet
///
/// One invocation's criteria: lookup-key string → expected value.
/// BTreeMap-backed, so key order is canonical regardless of how callers
/// assembled the set; merging is last-insert-wins.
///

#[derive(Clone, Debug, Default, Deref, Eq, IntoIterator, PartialEq)]
pub struct FilterSet(BTreeMap<String, Value>);

impl FilterSet {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Merge `other` over `self`; colliding keys take the newer value.
    pub fn merge(&mut self, other: &Self) {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// Inherited-plus-new criteria as one canonical set.
    #[must_use]
    pub fn merged_with(&self, other: &Self) -> Self {
        let mut merged = self.clone();
        merged.merge(other);

        merged
    }
}

impl<K, V> FromIterator<(K, V)> for FilterSet
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K, V> Extend<(K, V)> for FilterSet
where
    K: Into<String>,
    V: Into<Value>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.0
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}
