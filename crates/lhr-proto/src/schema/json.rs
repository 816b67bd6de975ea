//! `serde` adapters implementing the proto3 JSON mapping for schema fields.
//!
//! The schema messages derive both `prost::Message` and serde's traits; the
//! field attributes point at the adapters below. Common rules:
//!
//! - `null` reads as the field default, except for `google.protobuf.Value`
//!   fields where `null` is itself a value.
//! - Fields holding their default are skipped on output (see [`is_default`]).

use serde::Deserialize;
use serde::de::{self, Deserializer};
use serde::ser::{self, Serializer};

use super::enums::JsonEnum;
use super::well_known;

/// Skip predicate for scalar, repeated and map fields.
pub fn is_default<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}

/// Reads `null` as the type's default.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Enum fields stored as `i32` and spelled by value name in JSON.
pub mod enumeration {
    use super::{Deserialize, Deserializer, JsonEnum, Serializer, de};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Name(String),
        Number(i32),
    }

    pub fn serialize<E, S>(value: &i32, serializer: S) -> Result<S::Ok, S::Error>
    where
        E: JsonEnum,
        S: Serializer,
    {
        // Values outside the declared set are emitted as plain integers.
        match E::try_from(*value) {
            Ok(known) => serializer.serialize_str(known.as_json_name()),
            Err(_) => serializer.serialize_i32(*value),
        }
    }

    pub fn deserialize<'de, E, D>(deserializer: D) -> Result<i32, D::Error>
    where
        E: JsonEnum,
        D: Deserializer<'de>,
    {
        match Option::<Repr>::deserialize(deserializer)? {
            None => Ok(0),
            Some(Repr::Number(n)) => Ok(n),
            Some(Repr::Name(name)) => E::from_json_name(&name).map(Into::into).ok_or_else(|| {
                de::Error::custom(format!("unknown value {name:?} for enum {}", E::TYPE_NAME))
            }),
        }
    }
}

/// Number or string spelling of a `double`.
#[derive(Deserialize)]
#[serde(untagged)]
enum DoubleRepr {
    Number(f64),
    Text(String),
}

impl DoubleRepr {
    fn into_f64<E: de::Error>(self) -> Result<f64, E> {
        match self {
            Self::Number(n) => Ok(n),
            Self::Text(text) => match text.as_str() {
                "NaN" => Ok(f64::NAN),
                "Infinity" => Ok(f64::INFINITY),
                "-Infinity" => Ok(f64::NEG_INFINITY),
                _ => text
                    .parse()
                    .map_err(|_| E::custom(format!("invalid number string {text:?}"))),
            },
        }
    }
}

fn serialize_finite<S: Serializer>(value: f64, serializer: S) -> Result<S::Ok, S::Error> {
    if !value.is_finite() {
        return Err(ser::Error::custom(format!(
            "non-finite number {value} has no JSON spelling"
        )));
    }
    serializer.serialize_f64(value)
}

/// `double` fields: a number, a numeric string or `null` (read as `0`).
pub mod double {
    use super::{Deserialize, DoubleRepr, Deserializer, Serializer};

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        super::serialize_finite(*value, serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Option::<DoubleRepr>::deserialize(deserializer)?
            .map_or(Ok(0.0), DoubleRepr::into_f64)
    }
}

/// `google.protobuf.DoubleValue` fields: like [`double`], but `null` leaves
/// the wrapper unset and a set `0.0` stays set.
pub mod wrapped_double {
    use super::{Deserialize, DoubleRepr, Deserializer, Serializer};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(n) => super::serialize_finite(*n, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        Option::<DoubleRepr>::deserialize(deserializer)?
            .map(DoubleRepr::into_f64)
            .transpose()
    }
}

/// `google.protobuf.Timestamp` fields.
pub mod timestamp {
    use prost_types::Timestamp;

    use super::{Deserialize, Deserializer, Serializer, de, ser, well_known};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(
        value: &Option<Timestamp>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(ts) => {
                let text = well_known::timestamp_to_json(ts).map_err(ser::Error::custom)?;
                serializer.serialize_str(&text)
            },
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Timestamp>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|text| well_known::timestamp_from_json(&text).map_err(de::Error::custom))
            .transpose()
    }
}

/// `google.protobuf.Struct` fields.
pub mod structure {
    use prost_types::Struct;
    use serde::Serialize;
    use serde_json::Value;

    use super::{Deserialize, Deserializer, Serializer, de, ser, well_known};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(value: &Option<Struct>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(s) => well_known::struct_to_json(s)
                .map_err(ser::Error::custom)?
                .serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Struct>, D::Error> {
        match Option::<Value>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Value::Object(map)) => Ok(Some(well_known::struct_from_json(&map))),
            Some(other) => Err(de::Error::custom(format!(
                "expected an object for google.protobuf.Struct, found {}",
                kind_of(&other)
            ))),
        }
    }

    fn kind_of(value: &Value) -> &'static str {
        match value {
            Value::Null => "null",
            Value::Bool(_) => "a boolean",
            Value::Number(_) => "a number",
            Value::String(_) => "a string",
            Value::Array(_) => "an array",
            Value::Object(_) => "an object",
        }
    }
}

/// `google.protobuf.Value` fields. A present `null` is kept as a null value,
/// an absent field stays unset.
pub mod value {
    use prost_types::Value;
    use serde::Serialize;

    use super::{Deserialize, Deserializer, Serializer, ser, well_known};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(value: &Option<Value>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => well_known::value_to_json(v)
                .map_err(ser::Error::custom)?
                .serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
        let json = serde_json::Value::deserialize(deserializer)?;
        Ok(Some(well_known::value_from_json(&json)))
    }
}
