use crate::value::{Value, tag};
use std::cmp::Ordering;

// Integer window within which an f64 comparison is exact.
const F64_SAFE: i128 = 1_i128 << 53;

///
/// NumericRepr
///
/// Unified numeric form for cross-variant comparison.
/// Integers stay integral; only comparisons against floats go through f64,
/// and only inside the 2^53-safe window.
///

enum NumericRepr {
    Int(i128),
    F64(f64),
}

fn numeric_repr(value: &Value) -> Option<NumericRepr> {
    match value {
        Value::Int(i) => Some(NumericRepr::Int(i128::from(*i))),
        Value::Uint(u) => Some(NumericRepr::Int(i128::from(*u))),
        Value::Float(f) => Some(NumericRepr::F64(f.get())),
        _ => None,
    }
}

#[expect(clippy::cast_precision_loss)]
const fn int_to_f64_exact(i: i128) -> Option<f64> {
    if -F64_SAFE <= i && i <= F64_SAFE {
        Some(i as f64)
    } else {
        None
    }
}

/// Cross-variant numeric comparison.
///
/// Returns `None` when either side is non-numeric, or when an integer
/// outside the f64-safe window meets a float (no silent precision loss).
#[must_use]
pub fn cmp_numeric(left: &Value, right: &Value) -> Option<Ordering> {
    match (numeric_repr(left)?, numeric_repr(right)?) {
        (NumericRepr::Int(a), NumericRepr::Int(b)) => Some(a.cmp(&b)),
        (NumericRepr::F64(a), NumericRepr::F64(b)) => a.partial_cmp(&b),
        (NumericRepr::Int(a), NumericRepr::F64(b)) => int_to_f64_exact(a)?.partial_cmp(&b),
        (NumericRepr::F64(a), NumericRepr::Int(b)) => a.partial_cmp(&int_to_f64_exact(b)?),
    }
}

/// Total canonical comparator used by ordering and map-key surfaces.
///
/// Ordering rules:
/// 1. Mutually-numeric values compare numerically.
/// 2. Otherwise canonical variant rank.
/// 3. Variant-specific comparison for same-ranked values.
///
/// Mixed-variant comparisons are rank-only and must remain deterministic.
#[must_use]
pub(crate) fn canonical_cmp(left: &Value, right: &Value) -> Ordering {
    if let Some(cmp) = cmp_numeric(left, right) {
        return cmp;
    }

    let rank = tag::canonical_rank(left).cmp(&tag::canonical_rank(right));
    if rank != Ordering::Equal {
        return rank;
    }

    canonical_cmp_same_rank(left, right)
}

/// Strict comparator backing the ordered predicate commands.
///
/// Returns `None` for pairs the engine refuses to order: collections,
/// nulls, and mismatched non-numeric variants.
#[must_use]
pub(crate) fn strict_order_cmp(left: &Value, right: &Value) -> Option<Ordering> {
    if let Some(cmp) = cmp_numeric(left, right) {
        return Some(cmp);
    }

    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn canonical_cmp_same_rank(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Int(a), Value::Int(b)) => a.cmp(b),
        (Value::Uint(a), Value::Uint(b)) => a.cmp(b),
        (Value::Float(a), Value::Float(b)) => a.cmp(b),
        (Value::Text(a), Value::Text(b)) => a.cmp(b),
        (Value::List(a), Value::List(b)) => canonical_cmp_value_list(a, b),
        (Value::Map(a), Value::Map(b)) => canonical_cmp_value_map(a, b),
        _ => Ordering::Equal,
    }
}

fn canonical_cmp_value_list(left: &[Value], right: &[Value]) -> Ordering {
    for (left, right) in left.iter().zip(right.iter()) {
        let cmp = canonical_cmp(left, right);
        if cmp != Ordering::Equal {
            return cmp;
        }
    }

    left.len().cmp(&right.len())
}

fn canonical_cmp_value_map(left: &[(String, Value)], right: &[(String, Value)]) -> Ordering {
    for ((left_key, left_value), (right_key, right_value)) in left.iter().zip(right.iter()) {
        let key_cmp = left_key.cmp(right_key);
        if key_cmp != Ordering::Equal {
            return key_cmp;
        }

        let value_cmp = canonical_cmp(left_value, right_value);
        if value_cmp != Ordering::Equal {
            return value_cmp;
        }
    }

    left.len().cmp(&right.len())
}
