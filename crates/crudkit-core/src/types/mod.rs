//! Core type definitions used across the CrudKit workspace.

pub mod filter;
pub mod pagination;
pub mod sorting;
pub mod value;

pub use filter::{FilterDescriptor, FilterOperator};
pub use pagination::{PageRequest, PaginatedResult};
pub use sorting::SortOrder;
pub use value::{FieldKind, FieldValue};
