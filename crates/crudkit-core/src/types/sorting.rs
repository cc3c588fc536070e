//! Sorting types for filtered queries.

use serde::{Deserialize, Serialize};

/// Sort direction derived from the integer order code callers send.
///
/// `1` is ascending, `2` is descending. Any other code means the caller
/// asked for no particular order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
    /// No ordering applied.
    Unordered,
}

impl Default for SortOrder {
    fn default() -> Self {
        Self::Asc
    }
}

impl SortOrder {
    /// Ascending order code.
    pub const ASC_CODE: i32 = 1;
    /// Descending order code.
    pub const DESC_CODE: i32 = 2;

    /// Interpret an order code.
    pub fn from_code(code: i32) -> Self {
        match code {
            Self::ASC_CODE => Self::Asc,
            Self::DESC_CODE => Self::Desc,
            _ => Self::Unordered,
        }
    }

    /// Return the SQL keyword for this direction, if any.
    pub fn as_sql(&self) -> Option<&'static str> {
        match self {
            Self::Asc => Some("ASC"),
            Self::Desc => Some("DESC"),
            Self::Unordered => None,
        }
    }
}
