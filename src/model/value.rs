// Copyright 2024 OctoFHIR Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Core value types for ROXX expressions

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Core value type for ROXX expressions
///
/// Every literal the tokenizer produces, every operand on the evaluation stack and
/// every context/property value is a `RoxxValue`. `Undefined` is the distinguished
/// "no value" sentinel and is distinct from every legal literal, including `false`
/// and the empty string.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RoxxValue {
    /// The "no value" sentinel
    #[default]
    Undefined,

    /// Boolean value
    Boolean(bool),

    /// Integer value (64-bit signed)
    Integer(i64),

    /// Floating point value
    Float(f64),

    /// String value
    String(Arc<str>),

    /// Array literal or array-typed context value
    Array(Arc<Vec<RoxxValue>>),

    /// Dict literal or map-typed context value, insertion ordered
    Dict(Arc<IndexMap<String, RoxxValue>>),

    /// Point in time, produced by date-time custom properties
    Timestamp(DateTime<Utc>),
}

impl RoxxValue {
    /// Create a string value
    pub fn string(value: impl AsRef<str>) -> Self {
        Self::String(Arc::from(value.as_ref()))
    }

    /// Create an array value
    pub fn array(items: impl IntoIterator<Item = RoxxValue>) -> Self {
        Self::Array(Arc::new(items.into_iter().collect()))
    }

    /// Create a dict value
    pub fn dict(entries: impl IntoIterator<Item = (String, RoxxValue)>) -> Self {
        Self::Dict(Arc::new(entries.into_iter().collect()))
    }

    /// Short type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Boolean(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Dict(_) => "dict",
            Self::Timestamp(_) => "timestamp",
        }
    }

    /// Check for the `Undefined` sentinel
    #[inline]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Borrow the string payload
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean payload
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Array items
    pub fn as_array(&self) -> Option<&[RoxxValue]> {
        match self {
            Self::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Numeric payload of integer and float values only
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Numeric coercion used by ordering operators: integers, floats and numeric strings
    pub fn coerce_number(&self) -> Option<f64> {
        match self {
            Self::String(s) => s.trim().parse::<f64>().ok().filter(|n| !n.is_nan()),
            other => other.as_number(),
        }
    }

    /// Replace `Undefined` with `false`, leaving every other value untouched
    pub fn undefined_as_false(self) -> Self {
        match self {
            Self::Undefined => Self::Boolean(false),
            other => other,
        }
    }

    /// Structural equality with integers and floats compared as numbers
    ///
    /// There is no coercion between any other types: `3` never equals `"3"`.
    pub fn structural_eq(&self, other: &RoxxValue) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Integer(_) | Self::Float(_), Self::Integer(_) | Self::Float(_)) => {
                self.as_number() == other.as_number()
            }
            (Self::Array(a), Self::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.structural_eq(y))
            }
            (Self::Dict(a), Self::Dict(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(k, v)| b.get(k).is_some_and(|w| v.structural_eq(w)))
            }
            _ => self == other,
        }
    }
}

impl fmt::Display for RoxxValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => write!(f, "undefined"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Dict(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
            Self::Timestamp(ts) => write!(f, "{}", ts.to_rfc3339()),
        }
    }
}

impl From<bool> for RoxxValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for RoxxValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for RoxxValue {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<f64> for RoxxValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for RoxxValue {
    fn from(value: &str) -> Self {
        Self::String(Arc::from(value))
    }
}

impl From<String> for RoxxValue {
    fn from(value: String) -> Self {
        Self::String(Arc::from(value))
    }
}

impl From<Vec<RoxxValue>> for RoxxValue {
    fn from(value: Vec<RoxxValue>) -> Self {
        Self::Array(Arc::new(value))
    }
}

impl From<DateTime<Utc>> for RoxxValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

impl<T: Into<RoxxValue>> From<Option<T>> for RoxxValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Undefined, Into::into)
    }
}

impl From<serde_json::Value> for RoxxValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Self::Undefined,
            Value::Bool(b) => Self::Boolean(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Integer(i),
                None => n.as_f64().map_or(Self::Undefined, Self::Float),
            },
            Value::String(s) => Self::from(s),
            Value::Array(items) => Self::array(items.into_iter().map(Self::from)),
            Value::Object(map) => Self::dict(map.into_iter().map(|(k, v)| (k, Self::from(v)))),
        }
    }
}

impl From<&RoxxValue> for serde_json::Value {
    fn from(value: &RoxxValue) -> Self {
        use serde_json::Value;

        match value {
            RoxxValue::Undefined => Value::Null,
            RoxxValue::Boolean(b) => Value::Bool(*b),
            RoxxValue::Integer(i) => Value::from(*i),
            RoxxValue::Float(f) => Value::from(*f),
            RoxxValue::String(s) => Value::String(s.to_string()),
            RoxxValue::Array(items) => Value::Array(items.iter().map(Value::from).collect()),
            RoxxValue::Dict(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::from(v)))
                    .collect(),
            ),
            RoxxValue::Timestamp(ts) => Value::String(ts.to_rfc3339()),
        }
    }
}
