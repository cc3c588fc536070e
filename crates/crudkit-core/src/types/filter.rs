//! Filter descriptors for dynamic query building.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Filter comparison operator.
///
/// Accepts the symbolic forms (`==`, `!=`, `>`, `<`, `>=`, `<=`) and the
/// names (`eq`, `neq`/`ne`, `gt`, `lt`, `gte`, `lte`) in any case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FilterOperator {
    /// Exact equality.
    #[default]
    Eq,
    /// Not equal.
    Neq,
    /// Greater than.
    Gt,
    /// Less than.
    Lt,
    /// Greater than or equal.
    Gte,
    /// Less than or equal.
    Lte,
}

impl FilterOperator {
    /// Return the symbolic form of the operator.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Neq => "!=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Gte => ">=",
            Self::Lte => "<=",
        }
    }

    /// Return the SQL comparison for this operator.
    ///
    /// `Neq` renders as the null-safe `IS DISTINCT FROM` so that rows with a
    /// null column still satisfy it.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Neq => "IS DISTINCT FROM",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Gte => ">=",
            Self::Lte => "<=",
        }
    }

    /// Decide whether a comparison outcome satisfies this operator.
    ///
    /// `None` means the operands were incomparable (null or mismatched),
    /// which only satisfies `Neq`.
    pub fn accepts(&self, outcome: Option<Ordering>) -> bool {
        match (self, outcome) {
            (Self::Neq, None) => true,
            (_, None) => false,
            (Self::Eq, Some(o)) => o == Ordering::Equal,
            (Self::Neq, Some(o)) => o != Ordering::Equal,
            (Self::Gt, Some(o)) => o == Ordering::Greater,
            (Self::Lt, Some(o)) => o == Ordering::Less,
            (Self::Gte, Some(o)) => o != Ordering::Less,
            (Self::Lte, Some(o)) => o != Ordering::Greater,
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for FilterOperator {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let op = match s.trim().to_ascii_lowercase().as_str() {
            "==" | "=" | "eq" => Self::Eq,
            "!=" | "<>" | "neq" | "ne" => Self::Neq,
            ">" | "gt" => Self::Gt,
            "<" | "lt" => Self::Lt,
            ">=" | "gte" => Self::Gte,
            "<=" | "lte" => Self::Lte,
            _ => return Err(AppError::unsupported_operator(s)),
        };
        Ok(op)
    }
}

impl TryFrom<String> for FilterOperator {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FilterOperator> for String {
    fn from(op: FilterOperator) -> Self {
        op.symbol().to_string()
    }
}

/// A single condition on a named entity property.
///
/// A list of descriptors is interpreted as a conjunction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterDescriptor {
    /// Name of the property to test (matched case-insensitively).
    #[serde(alias = "property_name")]
    pub property_name: String,
    /// Comparison operator.
    #[serde(default)]
    pub operator: FilterOperator,
    /// Value to compare against, coerced to the property's type.
    pub value: serde_json::Value,
}

impl FilterDescriptor {
    /// Create a new filter descriptor.
    pub fn new(
        property_name: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        Self {
            property_name: property_name.into(),
            operator,
            value: value.into(),
        }
    }

    /// Shorthand for an equality filter.
    pub fn eq(property_name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self::new(property_name, FilterOperator::Eq, value)
    }

    /// Whether this descriptor names a property and carries a value.
    ///
    /// Descriptors that fail this check are skipped rather than compiled.
    pub fn is_applicable(&self) -> bool {
        !self.property_name.trim().is_empty() && !self.value.is_null()
    }
}
