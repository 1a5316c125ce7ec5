//! Canonical filter-set signatures for cache addressing.
//!
//! The signature must be order-independent and collision-safe across the
//! inclusion/exclusion boundary: two queries share a signature iff their
//! merged criteria are semantically identical.

use crate::{query::FilterSet, value::Value};
use sha2::{Digest, Sha256};
use std::fmt;

// Domain separation: signature stream layout version.
const SIG_VERSION: u8 = 0x01;
const SECTION_FILTERS: u8 = 0x01;
const SECTION_EXCLUDE: u8 = 0x02;

///
/// QuerySignature
///
/// 32-byte digest identifying one (filters, exclusions) pair.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct QuerySignature([u8; 32]);

impl QuerySignature {
    /// Digest one query's inclusion and exclusion criteria.
    ///
    /// Both sets iterate in sorted key order, so construction order can
    /// never split the cache.
    #[must_use]
    pub fn of_query(filters: &FilterSet, exclude: &FilterSet) -> Self {
        let mut hasher = Sha256::new();
        write_tag(&mut hasher, SIG_VERSION);

        write_section(&mut hasher, SECTION_FILTERS, filters);
        write_section(&mut hasher, SECTION_EXCLUDE, exclude);

        Self(hasher.finalize().into())
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for QuerySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

fn write_section(hasher: &mut Sha256, section: u8, set: &FilterSet) {
    write_tag(hasher, section);
    write_u32(hasher, u32::try_from(set.len()).unwrap_or(u32::MAX));
    for (key, value) in set.iter() {
        write_str(hasher, key);
        write_value(hasher, value);
    }
}

fn write_tag(hasher: &mut Sha256, tag: u8) {
    hasher.update([tag]);
}

fn write_u32(hasher: &mut Sha256, n: u32) {
    hasher.update(n.to_be_bytes());
}

fn write_str(hasher: &mut Sha256, s: &str) {
    write_u32(hasher, u32::try_from(s.len()).unwrap_or(u32::MAX));
    hasher.update(s.as_bytes());
}

// Tagged, length-prefixed value encoding; recursion covers lists and maps.
fn write_value(hasher: &mut Sha256, value: &Value) {
    write_tag(hasher, value.canonical_tag().to_u8());

    match value {
        Value::Null => {}
        Value::Bool(b) => write_tag(hasher, u8::from(*b)),
        Value::Int(i) => hasher.update(i.to_be_bytes()),
        Value::Uint(u) => hasher.update(u.to_be_bytes()),
        Value::Float(f) => hasher.update(f.to_be_bytes()),
        Value::Text(s) => write_str(hasher, s),
        Value::List(items) => {
            write_u32(hasher, u32::try_from(items.len()).unwrap_or(u32::MAX));
            for item in items {
                write_value(hasher, item);
            }
        }
        Value::Map(entries) => {
            write_u32(hasher, u32::try_from(entries.len()).unwrap_or(u32::MAX));
            for (key, entry) in entries {
                write_str(hasher, key);
                write_value(hasher, entry);
            }
        }
    }
}

///
/// TESTS
///
