//! # crudkit-database
//!
//! Compiles filter descriptors into predicates, runs them against a
//! backing store (in-memory or PostgreSQL), and exposes the
//! [`GenericRepository`] that services build on.

pub mod connection;
pub mod migration;
pub mod query;
pub mod repository;
pub mod store;

pub use connection::DatabasePool;
pub use query::{EntityQuery, OrderBy, Predicate};
pub use repository::{BelongsTo, GenericRepository, RelationLoader};
pub use store::{EntityStore, MemoryStore, PgStore};
