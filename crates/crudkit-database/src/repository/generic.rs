//! Generic repository over any [`EntityStore`].

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{error, info, warn};

use crudkit_core::error::AppError;
use crudkit_core::result::AppResult;
use crudkit_core::traits::Entity;
use crudkit_core::types::{FilterDescriptor, PageRequest, PaginatedResult};

use super::relation::RelationLoader;
use crate::query::{EntityQuery, Predicate, compile_filters};
use crate::store::EntityStore;

/// Entity queries with filtering, pagination, and eager-loading.
///
/// Reads validate their arguments before touching the store. Writes log
/// store failures and return them as persistence errors with the cause
/// attached.
pub struct GenericRepository<E: Entity> {
    store: Arc<dyn EntityStore<E>>,
    relations: HashMap<&'static str, Arc<dyn RelationLoader<E>>>,
}

impl<E: Entity> Clone for GenericRepository<E> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            relations: self.relations.clone(),
        }
    }
}

impl<E: Entity> std::fmt::Debug for GenericRepository<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenericRepository")
            .field("entity", &E::NAME)
            .field("backend", &self.store.backend())
            .field("relations", &self.relations.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<E: Entity> GenericRepository<E> {
    /// Create a repository over a store.
    pub fn new(store: Arc<dyn EntityStore<E>>) -> Self {
        Self {
            store,
            relations: HashMap::new(),
        }
    }

    /// Register the loader for a declared relation.
    ///
    /// Names that are not declared relations of `E` are ignored with a
    /// warning.
    pub fn with_relation(mut self, name: &str, loader: Arc<dyn RelationLoader<E>>) -> Self {
        match E::find_property(name) {
            Some(property) if property.is_relation() => {
                self.relations.insert(property.name, loader);
            }
            _ => warn!(
                entity = E::NAME,
                relation = name,
                "Not registering loader for undeclared relation"
            ),
        }
        self
    }

    /// Find one entity by id. `Ok(None)` when no row matches.
    pub async fn get_by_id(&self, id: i64, includes: &[String]) -> AppResult<Option<E>> {
        if id <= 0 {
            return Err(AppError::validation(format!(
                "{} id must be positive, got {id}",
                E::NAME
            )));
        }

        let Some(entity) = self.store.find_by_id(id).await? else {
            info!(entity = E::NAME, id, "Entity not found");
            return Ok(None);
        };

        let mut rows = vec![entity];
        self.load_includes(&mut rows, includes).await?;
        Ok(rows.pop())
    }

    /// Return every row.
    pub async fn get_all(&self, includes: &[String]) -> AppResult<Vec<E>> {
        let mut rows = self.store.fetch(&EntityQuery::all()).await?;
        self.load_includes(&mut rows, includes).await?;
        Ok(rows)
    }

    /// Return one page of all rows, with the unfiltered total.
    pub async fn get_paginated(
        &self,
        page_number: u64,
        page_size: u64,
        includes: &[String],
    ) -> AppResult<PaginatedResult<E>> {
        let page = PageRequest::new(page_number, page_size)?;
        self.run_paginated(EntityQuery::all().with_window(page), includes)
            .await
    }

    /// Return every row matching all `filters`, ordered by the first
    /// filter's property according to `order`.
    pub async fn filter_by_filters(
        &self,
        filters: &[FilterDescriptor],
        order: i32,
        includes: &[String],
    ) -> AppResult<Vec<E>> {
        let query = EntityQuery::from_filters::<E>(filters, order)?;
        let mut rows = self.store.fetch(&query).await?;
        self.load_includes(&mut rows, includes).await?;
        Ok(rows)
    }

    /// Filtered and paged variant of [`Self::filter_by_filters`]. The total
    /// counts filtered rows across all pages.
    pub async fn filter_paginated(
        &self,
        filters: &[FilterDescriptor],
        page_number: u64,
        page_size: u64,
        order: i32,
        includes: &[String],
    ) -> AppResult<PaginatedResult<E>> {
        let page = PageRequest::new(page_number, page_size)?;
        let query = EntityQuery::from_filters::<E>(filters, order)?.with_window(page);
        self.run_paginated(query, includes).await
    }

    /// Count rows matching all `filters`.
    pub async fn count(&self, filters: &[FilterDescriptor]) -> AppResult<u64> {
        let predicate: Predicate = compile_filters::<E>(filters)?;
        self.store.count(&predicate).await
    }

    /// Persist a new entity and return it with its assigned id.
    ///
    /// The store always assigns the id. A negative id is rejected.
    pub async fn add(&self, entity: &E) -> AppResult<E> {
        if entity.id() < 0 {
            return Err(AppError::validation(format!(
                "{} id must not be negative, got {}",
                E::NAME,
                entity.id()
            )));
        }
        self.store.insert(entity).await.map_err(|e| {
            error!(entity = E::NAME, error = %e, "Failed to add entity");
            AppError::persistence(format!("Failed to add {}", E::NAME), e)
        })
    }

    /// Overwrite an existing entity.
    pub async fn update(&self, entity: &E) -> AppResult<E> {
        let id = Self::require_id(entity.id())?;
        match self.store.update(entity).await {
            Ok(Some(updated)) => Ok(updated),
            Ok(None) => Err(AppError::not_found(format!(
                "{} with id {id} does not exist",
                E::NAME
            ))),
            Err(e) => {
                error!(entity = E::NAME, id, error = %e, "Failed to update entity");
                Err(AppError::persistence(
                    format!("Failed to update {} {id}", E::NAME),
                    e,
                ))
            }
        }
    }

    /// Remove an entity.
    pub async fn delete(&self, entity: &E) -> AppResult<()> {
        self.delete_by_id(entity.id()).await
    }

    /// Remove an entity by id.
    pub async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        let id = Self::require_id(id)?;
        match self.store.delete(id).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(AppError::not_found(format!(
                "{} with id {id} does not exist",
                E::NAME
            ))),
            Err(e) => {
                error!(entity = E::NAME, id, error = %e, "Failed to delete entity");
                Err(AppError::persistence(
                    format!("Failed to delete {} {id}", E::NAME),
                    e,
                ))
            }
        }
    }

    /// Canonical relation names for the requested includes.
    ///
    /// Unknown names and non-relation properties are dropped with a warning.
    pub fn resolve_includes(&self, includes: &[String]) -> Vec<&'static str> {
        let mut resolved: Vec<&'static str> = Vec::new();
        for include in includes {
            match E::find_property(include) {
                Some(property) if property.is_relation() => {
                    if !resolved.contains(&property.name) {
                        resolved.push(property.name);
                    }
                }
                Some(_) => warn!(
                    entity = E::NAME,
                    include = %include,
                    "Ignoring include that is not a relation"
                ),
                None => warn!(
                    entity = E::NAME,
                    include = %include,
                    "Ignoring unknown include"
                ),
            }
        }
        resolved
    }

    async fn run_paginated(
        &self,
        query: EntityQuery,
        includes: &[String],
    ) -> AppResult<PaginatedResult<E>> {
        let Some(page) = query.window else {
            return Err(AppError::internal("Paginated query without a window"));
        };

        let total_count = self.store.count(&query.predicate).await?;
        let mut rows = self.store.fetch(&query).await?;
        self.load_includes(&mut rows, includes).await?;

        Ok(PaginatedResult::new(rows, page, total_count))
    }

    async fn load_includes(&self, rows: &mut [E], includes: &[String]) -> AppResult<()> {
        if rows.is_empty() || includes.is_empty() {
            return Ok(());
        }

        for relation in self.resolve_includes(includes) {
            match self.relations.get(relation) {
                Some(loader) => loader.load(rows).await?,
                None => warn!(
                    entity = E::NAME,
                    relation,
                    "No loader registered for relation, skipping include"
                ),
            }
        }
        Ok(())
    }

    fn require_id(id: i64) -> AppResult<i64> {
        if id <= 0 {
            return Err(AppError::validation(format!(
                "{} id must be positive, got {id}",
                E::NAME
            )));
        }
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::BelongsTo;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use crudkit_core::error::ErrorKind;
    use crudkit_core::types::FilterOperator;
    use crudkit_entity::{Pokemon, Trainer, fixtures};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn repository() -> GenericRepository<Pokemon> {
        let trainers: Arc<dyn EntityStore<Trainer>> =
            Arc::new(MemoryStore::seeded(fixtures::trainers()));
        GenericRepository::new(Arc::new(MemoryStore::seeded(fixtures::pokemon()))).with_relation(
            "trainer",
            Arc::new(BelongsTo::new(
                trainers,
                |p: &Pokemon| p.trainer_id,
                |p: &mut Pokemon, t| p.trainer = t,
            )),
        )
    }

    fn names(rows: &[Pokemon]) -> Vec<&str> {
        rows.iter().map(|p| p.name.as_str()).collect()
    }

    fn ash() -> Vec<FilterDescriptor> {
        vec![FilterDescriptor::new(
            "Owner",
            "==".parse().unwrap(),
            "Ash Ketchum",
        )]
    }

    /// Store that counts calls and always fails.
    #[derive(Default)]
    struct BrokenStore {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl EntityStore<Pokemon> for BrokenStore {
        async fn find_by_id(&self, _id: i64) -> AppResult<Option<Pokemon>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(AppError::database("store offline"))
        }
        async fn fetch(&self, _query: &EntityQuery) -> AppResult<Vec<Pokemon>> {
            Err(AppError::database("store offline"))
        }
        async fn count(&self, _predicate: &Predicate) -> AppResult<u64> {
            Err(AppError::database("store offline"))
        }
        async fn insert(&self, _entity: &Pokemon) -> AppResult<Pokemon> {
            Err(AppError::database("store offline"))
        }
        async fn update(&self, _entity: &Pokemon) -> AppResult<Option<Pokemon>> {
            Err(AppError::database("store offline"))
        }
        async fn delete(&self, _id: i64) -> AppResult<bool> {
            Err(AppError::database("store offline"))
        }
        fn backend(&self) -> &'static str {
            "broken"
        }
    }

    #[tokio::test]
    async fn test_get_by_id_rejects_non_positive_without_store_call() {
        let store = Arc::new(BrokenStore::default());
        let repo = GenericRepository::<Pokemon>::new(store.clone());

        for id in [0, -3] {
            let err = repo.get_by_id(id, &[]).await.unwrap_err();
            assert_eq!(err.kind, ErrorKind::Validation);
        }
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_get_by_id_found_and_missing() {
        let repo = repository();
        let pikachu = repo.get_by_id(1, &[]).await.unwrap().expect("exists");
        assert_eq!(pikachu.name, "Pikachu");
        assert!(pikachu.trainer.is_none());
        assert!(repo.get_by_id(99, &[]).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_paginated_counts_all_rows() {
        let repo = repository();
        for page_size in 1..=6 {
            for page_number in 1..=6 {
                let page = repo
                    .get_paginated(page_number, page_size, &[])
                    .await
                    .unwrap();
                assert!(page.items.len() as u64 <= page_size);
                assert_eq!(page.total_count, 5);
            }
        }
        let second = repo.get_paginated(2, 2, &[]).await.unwrap();
        assert_eq!(names(&second.items), vec!["Bulbasaur", "Squirtle"]);
    }

    #[tokio::test]
    async fn test_get_paginated_rejects_zero_bounds() {
        let repo = repository();
        assert!(repo.get_paginated(0, 5, &[]).await.is_err());
        assert!(repo.get_paginated(1, 0, &[]).await.is_err());
    }

    #[tokio::test]
    async fn test_filter_by_owner() {
        let repo = repository();
        let rows = repo.filter_by_filters(&ash(), 1, &[]).await.unwrap();
        assert_eq!(names(&rows), vec!["Pikachu", "Squirtle"]);
    }

    #[tokio::test]
    async fn test_filter_paginated_first_page() {
        let repo = repository();
        let page = repo.filter_paginated(&ash(), 1, 1, 1, &[]).await.unwrap();
        assert_eq!(names(&page.items), vec!["Pikachu"]);
        assert_eq!(page.total_count, 2);
    }

    #[tokio::test]
    async fn test_pagination_keeps_match_cardinality() {
        let repo = repository();
        let filters = vec![FilterDescriptor::new("Level", FilterOperator::Gt, json!(14))];
        for order in [1, 2] {
            let all = repo.filter_by_filters(&filters, order, &[]).await.unwrap();
            for page_size in 1..=4 {
                let page = repo
                    .filter_paginated(&filters, 1, page_size, order, &[])
                    .await
                    .unwrap();
                assert_eq!(page.total_count, all.len() as u64);
            }
        }
    }

    #[tokio::test]
    async fn test_empty_filters_equal_get_all() {
        let repo = repository();
        let filtered = repo.filter_by_filters(&[], 1, &[]).await.unwrap();
        let all = repo.get_all(&[]).await.unwrap();
        assert_eq!(filtered, all);
    }

    #[tokio::test]
    async fn test_unknown_include_is_ignored() {
        let repo = repository();
        let with = repo
            .filter_by_filters(&ash(), 1, &["Nonexistent".to_string()])
            .await
            .unwrap();
        let without = repo.filter_by_filters(&ash(), 1, &[]).await.unwrap();
        assert_eq!(with, without);
    }

    #[tokio::test]
    async fn test_include_is_case_insensitive() {
        let repo = repository();
        let rows = repo.get_all(&["TRAINER".to_string()]).await.unwrap();
        assert!(rows.iter().all(|p| p.trainer.is_some()));
        assert_eq!(
            repo.resolve_includes(&[
                "trainer".to_string(),
                "Trainer".to_string(),
                "Owner".to_string()
            ]),
            vec!["Trainer"]
        );
    }

    #[tokio::test]
    async fn test_writes_round_trip() {
        let repo = repository();
        let mut eevee = fixtures::pokemon()[0].clone();
        eevee.id = 0;
        eevee.name = "Eevee".into();

        let saved = repo.add(&eevee).await.unwrap();
        assert_eq!(saved.id, 6);

        let mut evolved = saved.clone();
        evolved.name = "Jolteon".into();
        assert_eq!(repo.update(&evolved).await.unwrap().name, "Jolteon");

        repo.delete(&evolved).await.unwrap();
        let err = repo.delete(&evolved).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_add_rejects_negative_id() {
        let repo = repository();
        let mut stray = fixtures::pokemon()[0].clone();
        stray.id = -7;

        let err = repo.add(&stray).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(repo.count(&[]).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_write_failures_carry_cause() {
        let repo = GenericRepository::<Pokemon>::new(Arc::new(BrokenStore::default()));
        let pikachu = fixtures::pokemon()[0].clone();

        let err = repo.add(&pikachu).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Persistence);
        let cause = std::error::Error::source(&err).expect("cause attached");
        assert!(cause.to_string().contains("store offline"));

        assert_eq!(repo.update(&pikachu).await.unwrap_err().kind, ErrorKind::Persistence);

        let mut unsaved = pikachu;
        unsaved.id = 0;
        assert_eq!(repo.update(&unsaved).await.unwrap_err().kind, ErrorKind::Validation);
    }
}
