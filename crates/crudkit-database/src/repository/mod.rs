//! Generic repository and eager-loading of relations.

pub mod generic;
pub mod relation;

pub use generic::GenericRepository;
pub use relation::{BelongsTo, RelationLoader};
