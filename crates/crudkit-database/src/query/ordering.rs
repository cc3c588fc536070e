//! Single-key ordering derived from a filter list.

use std::cmp::Ordering;

use tracing::warn;

use crudkit_core::result::AppResult;
use crudkit_core::traits::{Entity, PropertyDef};
use crudkit_core::types::{FieldValue, FilterDescriptor, SortOrder};

use super::predicate::compile_condition;

/// Sort on one property in one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    /// Resolved sort property.
    pub property: &'static PropertyDef,
    /// `Asc` or `Desc`; never `Unordered`.
    pub direction: SortOrder,
}

impl OrderBy {
    /// Compare two entities on the sort property. Nulls sort first.
    pub fn compare<E: Entity>(&self, a: &E, b: &E) -> Ordering {
        let left = a.property(self.property.name).unwrap_or(FieldValue::Null);
        let right = b.property(self.property.name).unwrap_or(FieldValue::Null);

        let ordering = match (left.is_null(), right.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => left.compare(&right).unwrap_or(Ordering::Equal),
        };

        match self.direction {
            SortOrder::Desc => ordering.reverse(),
            _ => ordering,
        }
    }
}

/// Derive the ordering for a filtered query.
///
/// Only the first applicable filter's property is used as the sort key;
/// there is no composite ordering. `order` follows [`SortOrder::from_code`].
pub fn compile_ordering<E: Entity>(
    filters: &[FilterDescriptor],
    order: i32,
) -> AppResult<Option<OrderBy>> {
    let Some(first) = filters.iter().find(|f| f.is_applicable()) else {
        return Ok(None);
    };

    let direction = SortOrder::from_code(order);
    if direction == SortOrder::Unordered {
        warn!(
            entity = E::NAME,
            order,
            "Unrecognized order code, results are returned in no particular order"
        );
        return Ok(None);
    }

    let condition = compile_condition::<E>(first)?;
    Ok(Some(OrderBy {
        property: condition.property,
        direction,
    }))
}
