//! Forgiving field decoders for stored records
//!
//! Stored JSON may come from older builds or hand edits. A field with the
//! wrong shape decodes to its neutral value instead of failing the whole
//! collection it sits in.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::entry::WorkoutType;

/// Finite number from a JSON number or numeric string
fn as_number(value: &Value) -> Option<f64> {
  let number = match value {
    Value::Number(n) => n.as_f64(),
    Value::String(s) => s.trim().parse::<f64>().ok(),
    _ => None,
  };
  number.filter(|v| v.is_finite())
}

/// Any finite number; everything else is 0
pub fn number_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
  let value = Value::deserialize(deserializer)?;
  Ok(as_number(&value).unwrap_or(0.0))
}

/// Finite number, or None for null and anything unparseable
pub fn optional_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
  let value = Value::deserialize(deserializer)?;
  Ok(as_number(&value))
}

/// Whole, non-negative count; fractions are rounded
pub fn count_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
  let value = Value::deserialize(deserializer)?;
  Ok(as_number(&value).map(|v| v.round().clamp(0.0, f64::from(u32::MAX)) as u32).unwrap_or(0))
}

pub fn optional_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
  let value = Value::deserialize(deserializer)?;
  Ok(as_number(&value).map(|v| v.round().max(0.0) as u64))
}

pub fn string_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
  match Value::deserialize(deserializer)? {
    Value::String(s) => Ok(s),
    _ => Ok(String::new()),
  }
}

pub fn bool_or_false<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
  Ok(matches!(Value::deserialize(deserializer)?, Value::Bool(true)))
}

/// Known workout type name, else the default (cardio)
pub fn workout_type<'de, D: Deserializer<'de>>(deserializer: D) -> Result<WorkoutType, D::Error> {
  Ok(optional_workout_type(deserializer)?.unwrap_or_default())
}

pub fn optional_workout_type<'de, D: Deserializer<'de>>(
  deserializer: D,
) -> Result<Option<WorkoutType>, D::Error> {
  match Value::deserialize(deserializer)? {
    Value::String(s) => Ok(s.parse().ok()),
    _ => Ok(None),
  }
}

/// Raw enum name as stored. Non-string values (including null) carry no name.
#[derive(Debug, Clone, Default)]
pub struct RawName(pub Option<String>);

impl<'de> Deserialize<'de> for RawName {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    match Value::deserialize(deserializer)? {
      Value::String(s) => Ok(Self(Some(s))),
      _ => Ok(Self(None)),
    }
  }
}
