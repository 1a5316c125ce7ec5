use crate::query::{EvalError, LookupError};
use thiserror::Error as ThisError;

///
/// QueryError
///
/// Everything a query surface can fail with. All variants are programming
/// or input errors: surfaced immediately, never retried, and the failing
/// operation returns no partial results.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum QueryError {
    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error("field '{field}' is absent from a record in the result set")]
    FieldAbsent { field: String },
}

impl QueryError {
    pub(crate) fn field_absent(field: impl Into<String>) -> Self {
        Self::FieldAbsent {
            field: field.into(),
        }
    }
}
