//! Structural equality over [`Value`]s.
//!
//! Comparison walks both values with an explicit work stack instead of the
//! call stack, so deeply nested lists, maps and records cannot overflow it.
//! Pointer-identical payloads are skipped without descending.

use std::sync::Arc;

use crate::value::Value;

/// Returns `true` if `a` and `b` are structurally equal.
///
/// - numbers compare by value across `Int` and `Float`; `NaN` equals nothing
/// - lists compare element-wise in order
/// - sets compare by membership, maps by key then value
/// - records need the same name and equal fields, looked up by name
/// - opaque values are equal only to themselves
#[must_use]
pub fn is_equal(a: &Value, b: &Value) -> bool {
    let mut pending: Vec<(&Value, &Value)> = vec![(a, b)];

    while let Some((a, b)) = pending.pop() {
        match (a, b) {
            (Value::List(x), Value::List(y)) => {
                if Arc::ptr_eq(x, y) {
                    continue;
                }
                if x.len() != y.len() {
                    return false;
                }
                pending.extend(x.iter().zip(y.iter()));
            }
            (Value::Set(x), Value::Set(y)) => {
                if x.ptr_eq(y) {
                    continue;
                }
                if x.len() != y.len() || !x.keys().all(|item| y.contains_key(item)) {
                    return false;
                }
            }
            (Value::Map(x), Value::Map(y)) => {
                if x.ptr_eq(y) {
                    continue;
                }
                if x.len() != y.len() {
                    return false;
                }
                for (key, left) in x {
                    match y.get(key) {
                        Some(right) => pending.push((left, right)),
                        None => return false,
                    }
                }
            }
            (Value::Record(x), Value::Record(y)) => {
                if Arc::ptr_eq(x, y) {
                    continue;
                }
                if x.name() != y.name() || x.fields().len() != y.fields().len() {
                    return false;
                }
                for (name, left) in x.fields() {
                    match y.field(name) {
                        Some(right) => pending.push((left, right)),
                        None => return false,
                    }
                }
            }
            _ => {
                if !is_equal_scalar(a, b) {
                    return false;
                }
            }
        }
    }

    true
}

/// Compares two values without descending into containers.
///
/// Containers compare by pointer identity here.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn is_equal_scalar(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Nil, Value::Nil) | (Value::Undefined, Value::Undefined) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::Float(x), Value::Float(y)) => x == y,
        (Value::Int(i), Value::Float(f)) | (Value::Float(f), Value::Int(i)) => int_equals_float(*i, *f),
        (Value::Text(x), Value::Text(y)) => x == y,
        (Value::Bytes(x), Value::Bytes(y)) => x == y,
        (Value::List(x), Value::List(y)) => Arc::ptr_eq(x, y),
        (Value::Set(x), Value::Set(y)) => x.ptr_eq(y),
        (Value::Map(x), Value::Map(y)) => x.ptr_eq(y),
        (Value::Record(x), Value::Record(y)) => Arc::ptr_eq(x, y),
        (Value::Opaque(x), Value::Opaque(y)) => x.ptr_eq(y),
        _ => false,
    }
}

/// Floats in `[-2^63, 2^63)`, the range that converts to `i64` without saturating.
const I64_RANGE: std::ops::Range<f64> = -9_223_372_036_854_775_808.0..9_223_372_036_854_775_808.0;

/// `i == f` as numbers: `f` must be integral and convert to `i` exactly.
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn int_equals_float(i: i64, f: f64) -> bool {
    I64_RANGE.contains(&f) && f.fract() == 0.0 && f as i64 == i
}
