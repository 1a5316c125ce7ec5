use crate::{
    query::{
        eval::{EvalError, eval},
        matcher::FilterProgram,
    },
    record::Record,
};
use std::rc::Rc;

/// Remove every row that satisfies ALL exclusion lookups.
///
/// Exclusion shares the lookup grammar but not the conjunction machinery:
/// the set is a plain conjunction, and a row is dropped only when its pass
/// count reaches the full set size. A field that is absent or falsy never
/// counts toward an exclusion match.
pub(crate) fn exclude_rows(
    rows: &[Rc<Record>],
    program: &FilterProgram,
) -> Result<Vec<Rc<Record>>, EvalError> {
    if program.is_empty() {
        return Ok(rows.to_vec());
    }

    let mut kept = Vec::with_capacity(rows.len());
    for row in rows {
        if !excludes(row, program)? {
            kept.push(Rc::clone(row));
        }
    }

    Ok(kept)
}

/// Decide whether one row matches the full exclusion set.
pub(crate) fn excludes(row: &Record, program: &FilterProgram) -> Result<bool, EvalError> {
    let mut passed = 0_usize;
    for bound in program.filters() {
        let Some(actual) = row.field(&bound.lookup.field) else {
            continue;
        };
        if !actual.is_truthy() {
            continue;
        }

        if eval(bound.lookup.command, Some(actual), &bound.expected)? {
            passed += 1;
        }
    }

    Ok(passed == program.len())
}

///
/// TESTS
///
