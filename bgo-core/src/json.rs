//! Helpers over raw provider JSON.

use anyhow::{Context, Result};
use serde_json::{Number, Value};

/// Round every floating-point number in `value` to the nearest integer,
/// halves away from zero. Integers, strings and other leaves are left alone.
pub fn round_values(value: &mut Value) {
    match value {
        Value::Object(map) => map.values_mut().for_each(round_values),
        Value::Array(items) => items.iter_mut().for_each(round_values),
        Value::Number(n) if n.is_f64() => {
            if let Some(rounded) = n.as_f64().map(f64::round).and_then(Number::from_f64) {
                *n = rounded;
            }
        }
        _ => {}
    }
}

/// Pretty-print a payload the way `--full-info` shows it.
pub fn to_pretty_json(value: &Value) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize response as JSON")
}
