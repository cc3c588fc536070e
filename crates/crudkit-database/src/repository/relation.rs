//! Eager-loading of related entities.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crudkit_core::result::AppResult;
use crudkit_core::traits::Entity;

use crate::store::EntityStore;

/// Populates one navigation property on a batch of loaded entities.
#[async_trait]
pub trait RelationLoader<E>: Send + Sync + 'static {
    /// Attach the related data to every entity in `entities`.
    async fn load(&self, entities: &mut [E]) -> AppResult<()>;
}

/// Loads a many-to-one relation through a foreign key.
pub struct BelongsTo<E, R> {
    store: Arc<dyn EntityStore<R>>,
    foreign_key: fn(&E) -> Option<i64>,
    attach: fn(&mut E, Option<R>),
}

impl<E, R> BelongsTo<E, R> {
    /// Create a loader reading related rows from `store`.
    pub fn new(
        store: Arc<dyn EntityStore<R>>,
        foreign_key: fn(&E) -> Option<i64>,
        attach: fn(&mut E, Option<R>),
    ) -> Self {
        Self {
            store,
            foreign_key,
            attach,
        }
    }
}

#[async_trait]
impl<E: Entity, R: Entity> RelationLoader<E> for BelongsTo<E, R> {
    async fn load(&self, entities: &mut [E]) -> AppResult<()> {
        let mut cache: HashMap<i64, Option<R>> = HashMap::new();

        for entity in entities.iter_mut() {
            let related = match (self.foreign_key)(entity) {
                Some(id) => {
                    if !cache.contains_key(&id) {
                        let row = self.store.find_by_id(id).await?;
                        cache.insert(id, row);
                    }
                    cache.get(&id).cloned().flatten()
                }
                None => None,
            };
            (self.attach)(entity, related);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crudkit_entity::{Pokemon, Trainer, fixtures};

    #[tokio::test]
    async fn test_belongs_to_attaches_trainer() {
        let trainers: Arc<dyn EntityStore<Trainer>> =
            Arc::new(MemoryStore::seeded(fixtures::trainers()));
        let loader = BelongsTo::new(
            trainers,
            |p: &Pokemon| p.trainer_id,
            |p: &mut Pokemon, t| p.trainer = t,
        );

        let mut rows = fixtures::pokemon();
        rows[2].trainer_id = None;
        loader.load(&mut rows).await.unwrap();

        assert_eq!(rows[0].trainer.as_ref().map(|t| t.name.as_str()), Some("Ash Ketchum"));
        assert_eq!(rows[1].trainer.as_ref().map(|t| t.hometown.as_str()), Some("Cerulean City"));
        assert!(rows[2].trainer.is_none());
    }
}
