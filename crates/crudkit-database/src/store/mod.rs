//! Backing store abstraction for the generic repository.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;

use crudkit_core::result::AppResult;
use crudkit_core::traits::Entity;

use crate::query::{EntityQuery, Predicate};

/// A set of entities that can be filtered, ordered, and paged.
///
/// Implementations never validate identifiers or resolve includes; the
/// repository does that before delegating.
#[async_trait]
pub trait EntityStore<E: Entity>: Send + Sync + 'static {
    /// Look up one row by its identifier.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<E>>;

    /// Return the rows selected by `query`.
    async fn fetch(&self, query: &EntityQuery) -> AppResult<Vec<E>>;

    /// Count rows matching `predicate`, ignoring any window.
    async fn count(&self, predicate: &Predicate) -> AppResult<u64>;

    /// Persist a new row and return it with its assigned identifier.
    /// The caller's identifier is never written.
    async fn insert(&self, entity: &E) -> AppResult<E>;

    /// Overwrite an existing row. Returns `None` when no row has that id.
    async fn update(&self, entity: &E) -> AppResult<Option<E>>;

    /// Remove a row. Returns `false` when no row has that id.
    async fn delete(&self, id: i64) -> AppResult<bool>;

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}
