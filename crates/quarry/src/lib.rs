//! Quarry: an in-memory query engine over loosely-typed records.
//!
//! Criteria are compound lookup keys (`field__command__conjunction`)
//! mapped to expected values; handles chain `filter` / `exclude` /
//! `order_by` / projection the way an object-relational builder does,
//! with materializations memoized under canonical query signatures.
#![warn(unreachable_pub)]

mod macros;

// public exports are one module level down
pub mod error;
pub mod obs;
pub mod query;
pub mod record;
pub mod value;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No caches, programs, signatures, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        error::QueryError,
        query::{Engine, FilterSet, QuerySet},
        record::{Record, RecordStore},
        value::Value,
    };
}
