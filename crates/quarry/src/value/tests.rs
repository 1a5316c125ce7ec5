use crate::value::{Float64, MapValueError, Value};
use std::cmp::Ordering;

// ---- helpers -----------------------------------------------------------

fn v_f(x: f64) -> Value {
    Value::Float(Float64::try_new(x).expect("finite f64"))
}
fn v_i(x: i64) -> Value {
    Value::Int(x)
}
fn v_txt(s: &str) -> Value {
    Value::Text(s.to_string())
}

// ---- float normalization -----------------------------------------------

#[test]
fn float_rejects_non_finite_values() {
    assert!(Float64::try_new(f64::NAN).is_none());
    assert!(Float64::try_new(f64::INFINITY).is_none());
    assert!(Float64::try_new(f64::NEG_INFINITY).is_none());
}

#[test]
fn float_canonicalizes_negative_zero() {
    let zero = Float64::try_new(-0.0).expect("finite");
    assert_eq!(zero.get().to_bits(), 0.0_f64.to_bits());
    assert_eq!(v_f(-0.0), v_f(0.0));
}

// ---- loose equality -----------------------------------------------------

#[test]
fn eq_loose_bridges_numeric_variants() {
    assert!(v_i(5).eq_loose(&v_f(5.0)));
    assert!(!v_i(5).eq_loose(&Value::Uint(u64::MAX)));
    assert!(Value::from(5_u64).eq_loose(&v_i(5)));
    assert!(!v_i(5).eq_loose(&v_f(5.5)));
}

#[test]
fn eq_loose_stays_strict_across_kinds() {
    assert!(!v_i(1).eq_loose(&Value::Bool(true)));
    assert!(!v_txt("5").eq_loose(&v_i(5)));
    assert!(!Value::Null.eq_loose(&Value::Bool(false)));
}

#[test]
fn eq_loose_recurses_into_lists() {
    let left = Value::from_list(vec![v_i(1), v_f(2.0)]);
    let right = Value::from_list(vec![v_f(1.0), v_i(2)]);
    assert!(left.eq_loose(&right));

    let shorter = Value::from_list(vec![v_i(1)]);
    assert!(!left.eq_loose(&shorter));
}

// ---- numeric comparison --------------------------------------------------

#[test]
fn cmp_numeric_spans_int_uint_float() {
    use crate::value::cmp_numeric;

    assert_eq!(cmp_numeric(&v_i(3), &v_f(3.5)), Some(Ordering::Less));
    assert_eq!(
        cmp_numeric(&Value::Uint(u64::MAX), &v_i(-1)),
        Some(Ordering::Greater)
    );
    assert_eq!(cmp_numeric(&v_txt("3"), &v_i(3)), None);
}

#[test]
fn cmp_numeric_refuses_unsafe_int_float_mix() {
    use crate::value::cmp_numeric;

    // Beyond 2^53 an f64 comparison would silently lose precision.
    let big = Value::Uint(u64::MAX);
    assert_eq!(cmp_numeric(&big, &v_f(1.0)), None);
}

// ---- canonical ordering --------------------------------------------------

#[test]
fn canonical_cmp_orders_numerics_before_rank() {
    assert_eq!(
        Value::canonical_cmp(&v_i(2), &v_f(2.5)),
        Ordering::Less,
        "mutually-numeric values must compare numerically, not by rank",
    );
}

#[test]
fn canonical_cmp_is_total_across_variants() {
    let values = [
        Value::Null,
        Value::Bool(false),
        v_i(1),
        v_f(1.5),
        v_txt("a"),
        Value::from_list(vec![v_i(1)]),
    ];

    for left in &values {
        for right in &values {
            // never panics and stays antisymmetric
            let forward = Value::canonical_cmp(left, right);
            let backward = Value::canonical_cmp(right, left);
            assert_eq!(forward, backward.reverse());
        }
    }
}

#[test]
fn strict_order_cmp_rejects_collections_and_null() {
    assert!(Value::strict_order_cmp(&Value::Null, &v_i(1)).is_none());
    assert!(
        Value::strict_order_cmp(&Value::from_list(vec![v_i(1)]), &Value::from_list::<Value>(vec![]))
            .is_none()
    );
    assert_eq!(
        Value::strict_order_cmp(&v_txt("a"), &v_txt("b")),
        Some(Ordering::Less)
    );
}

// ---- truthiness ----------------------------------------------------------

#[test]
fn truthiness_matches_loose_record_semantics() {
    assert!(!Value::Null.is_truthy());
    assert!(!Value::Bool(false).is_truthy());
    assert!(!v_i(0).is_truthy());
    assert!(!v_f(0.0).is_truthy());
    assert!(!v_txt("").is_truthy());
    assert!(!Value::List(vec![]).is_truthy());

    assert!(v_i(-1).is_truthy());
    assert!(v_txt("x").is_truthy());
}

// ---- map normalization ---------------------------------------------------

#[test]
fn from_map_sorts_entries_and_rejects_duplicates() {
    let map = Value::from_map(vec![("b", v_i(2)), ("a", v_i(1))]).expect("unique keys");
    let entries = map.as_map().expect("map variant");
    assert_eq!(entries[0].0, "a");
    assert_eq!(entries[1].0, "b");

    let dup = Value::from_map(vec![("a", v_i(1)), ("a", v_i(2))]);
    assert_eq!(
        dup,
        Err(MapValueError::DuplicateKey {
            key: "a".to_string()
        })
    );
}

// ---- membership ----------------------------------------------------------

#[test]
fn in_list_uses_loose_equality() {
    let haystack = Value::from_list(vec![v_f(1.0), v_txt("x")]);
    assert_eq!(v_i(1).in_list(&haystack), Some(true));
    assert_eq!(v_txt("y").in_list(&haystack), Some(false));
    assert_eq!(v_i(1).in_list(&v_txt("not a list")), None);
}

// ---- serde ---------------------------------------------------------------

#[test]
fn json_round_trip_preserves_variants() {
    let source = r#"{"name":"a","age":5,"score":1.5,"tags":["x","y"],"gone":null}"#;
    let value: Value = serde_json::from_str(source).expect("well-formed JSON");

    let entries = value.as_map().expect("object parses to map");
    let get = |key: &str| {
        entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .expect("key present")
    };

    assert_eq!(get("age"), v_i(5));
    assert_eq!(get("score"), v_f(1.5));
    assert_eq!(get("gone"), Value::Null);
    assert_eq!(get("tags"), Value::from_list(vec![v_txt("x"), v_txt("y")]));

    let encoded = serde_json::to_string(&value).expect("serializable");
    let decoded: Value = serde_json::from_str(&encoded).expect("round trip");
    assert_eq!(decoded, value);
}

#[test]
fn json_large_unsigned_stays_uint() {
    let value: Value = serde_json::from_str("18446744073709551615").expect("u64 max");
    assert_eq!(value, Value::Uint(u64::MAX));

    let small: Value = serde_json::from_str("42").expect("small int");
    assert_eq!(small, Value::Int(42));
}
