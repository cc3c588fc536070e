//! Typed property values used by the dynamic filter layer.
//!
//! Entities expose their properties as [`FieldValue`]s and every filter
//! value is coerced into the declared [`FieldKind`] of the property it
//! targets before any comparison happens.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Declared type of an entity property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// 64-bit signed integer.
    Integer,
    /// 64-bit float.
    Float,
    /// UTF-8 text.
    Text,
    /// Boolean flag.
    Boolean,
    /// UTC timestamp.
    Timestamp,
    /// Navigation to a related entity; not comparable.
    Relation,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Text => "text",
            Self::Boolean => "boolean",
            Self::Timestamp => "timestamp",
            Self::Relation => "relation",
        };
        f.write_str(name)
    }
}

/// A runtime-typed property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Absent value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Integer(i64),
    /// Floating-point value.
    Float(f64),
    /// Timestamp value.
    Timestamp(DateTime<Utc>),
    /// Text value.
    Text(String),
}

impl FieldValue {
    /// Whether this value is [`FieldValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Convert a loosely typed JSON value into the given property kind.
    ///
    /// Returns `None` when the value cannot represent that kind, and for
    /// JSON `null` and relation kinds.
    pub fn coerce(raw: &serde_json::Value, kind: FieldKind) -> Option<Self> {
        use serde_json::Value as Json;

        match (kind, raw) {
            (_, Json::Null) | (FieldKind::Relation, _) => None,

            (FieldKind::Integer, Json::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| is_exact_i64(*f)).map(|f| f as i64))
                .map(Self::Integer),
            (FieldKind::Integer, Json::String(s)) => s.trim().parse().ok().map(Self::Integer),
            (FieldKind::Integer, Json::Bool(b)) => Some(Self::Integer(i64::from(*b))),

            (FieldKind::Float, Json::Number(n)) => n.as_f64().map(Self::Float),
            (FieldKind::Float, Json::String(s)) => s.trim().parse().ok().map(Self::Float),

            (FieldKind::Text, Json::String(s)) => Some(Self::Text(s.clone())),
            (FieldKind::Text, Json::Number(n)) => Some(Self::Text(n.to_string())),
            (FieldKind::Text, Json::Bool(b)) => Some(Self::Text(b.to_string())),

            (FieldKind::Boolean, Json::Bool(b)) => Some(Self::Bool(*b)),
            (FieldKind::Boolean, Json::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Some(Self::Bool(true)),
                "false" | "0" => Some(Self::Bool(false)),
                _ => None,
            },
            (FieldKind::Boolean, Json::Number(n)) => match n.as_i64() {
                Some(0) => Some(Self::Bool(false)),
                Some(1) => Some(Self::Bool(true)),
                _ => None,
            },

            (FieldKind::Timestamp, Json::String(s)) => parse_timestamp(s.trim()).map(Self::Timestamp),
            (FieldKind::Timestamp, Json::Number(n)) => n
                .as_i64()
                .and_then(|secs| DateTime::from_timestamp(secs, 0))
                .map(Self::Timestamp),

            _ => None,
        }
    }

    /// Compare two values of compatible kinds.
    ///
    /// Integers and floats compare numerically with each other. Text uses
    /// ordinal comparison. Mismatched kinds and nulls are incomparable.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => Some(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Integer(a), Self::Float(b)) => (*a as f64).partial_cmp(b),
            (Self::Float(a), Self::Integer(b)) => a.partial_cmp(&(*b as f64)),
            (Self::Text(a), Self::Text(b)) => Some(a.as_str().cmp(b.as_str())),
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            (Self::Timestamp(a), Self::Timestamp(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Timestamp(ts) => write!(f, "{}", ts.to_rfc3339()),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Timestamp(v)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Self::Null)
    }
}

/// Integral and inside the `i64` range, so `as i64` neither truncates nor
/// saturates. `i64::MAX as f64` rounds up to 2^63, hence the strict bound.
fn is_exact_i64(f: f64) -> bool {
    f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64
}
