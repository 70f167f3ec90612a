//! Field-level deserializers that never reject a snapshot.
//!
//! A tracker running an older build can emit fields with a different shape.
//! Every helper here falls back to the field's default instead of failing the
//! whole payload.

use chrono::{DateTime, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Signed integer that may arrive as a whole float (`200.0`).
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(i64_from_value(&value).unwrap_or_default())
}

pub fn lenient_opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(i64_from_value(&value))
}

/// Unsigned counter that may arrive as a whole float (`1.5e6`).
pub fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(u64_from_value(&value).unwrap_or_default())
}

/// Accepts RFC 3339 strings or epoch milliseconds.
pub fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(timestamp_from_value(&value))
}

pub fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let items = match value {
        Value::Array(items) => items,
        _ => return Ok(Vec::new()),
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

/// Whole finite float, as `f64`. Fractions and non-numbers yield `None`.
fn whole_float(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .filter(|float| float.is_finite() && float.fract() == 0.0)
}

fn i64_from_value(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        whole_float(value)
            .filter(|float| *float >= -9_223_372_036_854_775_808.0 && *float < 9_223_372_036_854_775_808.0)
            .map(|float| float as i64)
    })
}

fn u64_from_value(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        whole_float(value)
            .filter(|float| *float >= 0.0 && *float < 18_446_744_073_709_551_616.0)
            .map(|float| float as u64)
    })
}

fn timestamp_from_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(raw) => DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|parsed| parsed.with_timezone(&Utc)),
        Value::Number(number) => number
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn timestamps_parse_from_string_or_millis() {
        let from_string = timestamp_from_value(&json!("2024-03-01T12:30:05Z")).unwrap();
        let from_millis = timestamp_from_value(&json!(1_709_296_205_000_i64)).unwrap();
        assert_eq!(from_string, from_millis);
        assert!(timestamp_from_value(&json!(true)).is_none());
        assert!(timestamp_from_value(&json!("yesterday")).is_none());
    }

    #[test]
    fn whole_floats_count_as_integers() {
        assert_eq!(i64_from_value(&json!(200.0)), Some(200));
        assert_eq!(i64_from_value(&json!(-63)), Some(-63));
        assert_eq!(u64_from_value(&json!(1.5e6)), Some(1_500_000));
        assert_eq!(u64_from_value(&json!(-4)), None);
        assert_eq!(u64_from_value(&json!(-4.0)), None);
        assert_eq!(i64_from_value(&json!(200.5)), None);
        assert_eq!(i64_from_value(&json!(1e300)), None);
        assert_eq!(i64_from_value(&json!("200")), None);
    }
}
