//! In-process store backed by a vector behind an async lock.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crudkit_core::result::AppResult;
use crudkit_core::traits::Entity;

use super::EntityStore;
use crate::query::{EntityQuery, Predicate};

/// Store that keeps every row in memory.
///
/// Inserting an entity whose id is `0` assigns the next free id.
#[derive(Debug)]
pub struct MemoryStore<E> {
    rows: Arc<RwLock<Vec<E>>>,
}

impl<E> Clone for MemoryStore<E> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
        }
    }
}

impl<E: Entity> MemoryStore<E> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::seeded(Vec::new())
    }

    /// Create a store pre-populated with `rows`.
    pub fn seeded(rows: Vec<E>) -> Self {
        Self {
            rows: Arc::new(RwLock::new(rows)),
        }
    }

    /// Number of rows currently held.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Whether the store holds no rows.
    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

impl<E: Entity> Default for MemoryStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: Entity> EntityStore<E> for MemoryStore<E> {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<E>> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|row| row.id() == id).cloned())
    }

    async fn fetch(&self, query: &EntityQuery) -> AppResult<Vec<E>> {
        let rows = self.rows.read().await;
        Ok(query.apply(&rows))
    }

    async fn count(&self, predicate: &Predicate) -> AppResult<u64> {
        let rows = self.rows.read().await;
        Ok(rows.iter().filter(|row| predicate.matches(*row)).count() as u64)
    }

    async fn insert(&self, entity: &E) -> AppResult<E> {
        let mut rows = self.rows.write().await;
        let mut entity = entity.clone();

        let next = rows.iter().map(Entity::id).max().unwrap_or(0) + 1;
        entity.set_id(next);

        debug!(entity = E::NAME, id = entity.id(), "Inserted row");
        rows.push(entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: &E) -> AppResult<Option<E>> {
        let mut rows = self.rows.write().await;
        match rows.iter_mut().find(|row| row.id() == entity.id()) {
            Some(row) => {
                *row = entity.clone();
                Ok(Some(entity.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|row| row.id() != id);
        Ok(rows.len() < before)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
