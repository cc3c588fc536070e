//! # crudkit-entity
//!
//! Entity models served by the generic CrudKit stack. Every struct in this
//! crate represents a database table row, implements the runtime
//! [`Entity`](crudkit_core::traits::Entity) capability, and derives
//! `sqlx::FromRow`.

pub mod fixtures;
pub mod pokemon;
pub mod trainer;

pub use pokemon::Pokemon;
pub use trainer::Trainer;
