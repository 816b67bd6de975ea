//! Conversions between JSON and the well-known protobuf types.
//!
//! `google.protobuf.Struct`, `Value` and `Timestamp` have dedicated JSON
//! forms in the proto3 mapping: a `Struct` is a plain object, a `Value` is any
//! JSON value, and a `Timestamp` is an RFC 3339 string in UTC.

use chrono::{DateTime, SecondsFormat, Utc};
use prost_types::value::Kind;
use prost_types::{ListValue, Struct, Timestamp, Value};
use serde_json::{Map, Number};

/// Largest magnitude at which every integer is exactly representable as f64.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Errors converting well-known types back to JSON.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum WellKnownError {
    /// JSON has no spelling for NaN or infinities inside a `Value`.
    #[error("non-finite number {0} cannot be represented in a Value")]
    NonFiniteNumber(f64),

    /// The timestamp is outside the range `chrono` can represent.
    #[error("timestamp out of range: {seconds}s {nanos}ns")]
    TimestampOutOfRange {
        /// Seconds since the Unix epoch.
        seconds: i64,
        /// Nanosecond fraction.
        nanos: i32,
    },

    /// The string is not an RFC 3339 timestamp.
    #[error("invalid timestamp {value:?}: {reason}")]
    InvalidTimestamp {
        /// The rejected input.
        value: String,
        /// Parser diagnostic.
        reason: String,
    },
}

/// Converts an arbitrary JSON value into a `google.protobuf.Value`.
#[must_use]
pub fn value_from_json(json: &serde_json::Value) -> Value {
    let kind = match json {
        serde_json::Value::Null => Kind::NullValue(0),
        serde_json::Value::Bool(b) => Kind::BoolValue(*b),
        // Every number in a Value is a double on the wire.
        serde_json::Value::Number(n) => Kind::NumberValue(n.as_f64().unwrap_or(f64::NAN)),
        serde_json::Value::String(s) => Kind::StringValue(s.clone()),
        serde_json::Value::Array(items) => Kind::ListValue(ListValue {
            values: items.iter().map(value_from_json).collect(),
        }),
        serde_json::Value::Object(map) => Kind::StructValue(struct_from_json(map)),
    };
    Value { kind: Some(kind) }
}

/// Converts a JSON object into a `google.protobuf.Struct`.
#[must_use]
pub fn struct_from_json(map: &Map<String, serde_json::Value>) -> Struct {
    Struct {
        fields: map
            .iter()
            .map(|(key, value)| (key.clone(), value_from_json(value)))
            .collect(),
    }
}

/// Converts a `google.protobuf.Value` back into JSON.
///
/// Integral doubles inside the safe-integer range come back as JSON integers
/// so that counts and byte sizes in audit details keep their original
/// spelling. A `Value` without a kind is read as `null`.
pub fn value_to_json(value: &Value) -> Result<serde_json::Value, WellKnownError> {
    Ok(match &value.kind {
        None | Some(Kind::NullValue(_)) => serde_json::Value::Null,
        Some(Kind::BoolValue(b)) => serde_json::Value::Bool(*b),
        Some(Kind::NumberValue(n)) => serde_json::Value::Number(number_to_json(*n)?),
        Some(Kind::StringValue(s)) => serde_json::Value::String(s.clone()),
        Some(Kind::ListValue(list)) => serde_json::Value::Array(
            list.values
                .iter()
                .map(value_to_json)
                .collect::<Result<_, _>>()?,
        ),
        Some(Kind::StructValue(s)) => serde_json::Value::Object(struct_to_json(s)?),
    })
}

/// Converts a `google.protobuf.Struct` back into a JSON object.
pub fn struct_to_json(value: &Struct) -> Result<Map<String, serde_json::Value>, WellKnownError> {
    value
        .fields
        .iter()
        .map(|(key, v)| Ok((key.clone(), value_to_json(v)?)))
        .collect()
}

#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn number_to_json(n: f64) -> Result<Number, WellKnownError> {
    if !n.is_finite() {
        return Err(WellKnownError::NonFiniteNumber(n));
    }
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        return Ok(Number::from(n as i64));
    }
    Number::from_f64(n).ok_or(WellKnownError::NonFiniteNumber(n))
}

/// Parses an RFC 3339 string into a `Timestamp`, normalising to UTC.
pub fn timestamp_from_json(text: &str) -> Result<Timestamp, WellKnownError> {
    let parsed =
        DateTime::parse_from_rfc3339(text).map_err(|e| WellKnownError::InvalidTimestamp {
            value: text.to_string(),
            reason: e.to_string(),
        })?;
    let utc = parsed.with_timezone(&Utc);
    // chrono reports a leap second as a nanosecond fraction of 1e9 or more,
    // which a `Timestamp` cannot hold.
    let nanos = utc.timestamp_subsec_nanos();
    let nanos = i32::try_from(nanos)
        .ok()
        .filter(|n| *n < 1_000_000_000)
        .ok_or_else(|| WellKnownError::InvalidTimestamp {
            value: text.to_string(),
            reason: "leap seconds are not representable".to_string(),
        })?;
    Ok(Timestamp {
        seconds: utc.timestamp(),
        nanos,
    })
}

/// Formats a `Timestamp` the way the proto3 JSON mapping does: UTC with a
/// `Z` suffix and 0, 3, 6 or 9 fractional digits.
pub fn timestamp_to_json(ts: &Timestamp) -> Result<String, WellKnownError> {
    let out_of_range = || WellKnownError::TimestampOutOfRange {
        seconds: ts.seconds,
        nanos: ts.nanos,
    };
    let nanos = u32::try_from(ts.nanos).map_err(|_| out_of_range())?;
    let utc = DateTime::<Utc>::from_timestamp(ts.seconds, nanos).ok_or_else(out_of_range)?;

    let format = if nanos == 0 {
        SecondsFormat::Secs
    } else if nanos % 1_000_000 == 0 {
        SecondsFormat::Millis
    } else if nanos % 1_000 == 0 {
        SecondsFormat::Micros
    } else {
        SecondsFormat::Nanos
    };
    Ok(utc.to_rfc3339_opts(format, true))
}
