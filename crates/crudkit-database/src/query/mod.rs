//! Compilation of filter descriptors into store-agnostic queries.
//!
//! A list of [`FilterDescriptor`]s becomes a conjunctive [`Predicate`]
//! plus an optional single-key [`OrderBy`]. Both can be evaluated in
//! memory or rendered to SQL by [`sql`].

pub mod ordering;
pub mod predicate;
pub mod sql;

pub use ordering::{OrderBy, compile_ordering};
pub use predicate::{Condition, Predicate, compile_filters};

use crudkit_core::result::AppResult;
use crudkit_core::traits::Entity;
use crudkit_core::types::{FilterDescriptor, PageRequest};

/// Everything a store needs to answer one read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityQuery {
    /// Rows must satisfy every condition.
    pub predicate: Predicate,
    /// Optional sort key.
    pub order_by: Option<OrderBy>,
    /// Optional page window.
    pub window: Option<PageRequest>,
}

impl EntityQuery {
    /// A query matching every row, unordered and unpaged.
    pub fn all() -> Self {
        Self::default()
    }

    /// Compile descriptors and an order code into a query.
    pub fn from_filters<E: Entity>(filters: &[FilterDescriptor], order: i32) -> AppResult<Self> {
        Ok(Self {
            predicate: compile_filters::<E>(filters)?,
            order_by: compile_ordering::<E>(filters, order)?,
            window: None,
        })
    }

    /// Restrict the query to one page.
    pub fn with_window(mut self, page: PageRequest) -> Self {
        self.window = Some(page);
        self
    }

    /// Apply this query to an in-memory row set.
    pub fn apply<E: Entity>(&self, rows: &[E]) -> Vec<E> {
        let mut matched: Vec<E> = rows
            .iter()
            .filter(|row| self.predicate.matches(*row))
            .cloned()
            .collect();

        if let Some(order_by) = &self.order_by {
            matched.sort_by(|a, b| order_by.compare(a, b));
        }

        match self.window {
            Some(page) => matched
                .into_iter()
                .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
                .take(usize::try_from(page.limit()).unwrap_or(usize::MAX))
                .collect(),
            None => matched,
        }
    }
}
