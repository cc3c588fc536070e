//! Generic service over a [`GenericRepository`].

use std::fmt::Write as _;
use std::sync::Arc;

use tracing::{error, warn};

use crudkit_core::error::AppError;
use crudkit_core::traits::{Entity, EntityMapper};
use crudkit_core::types::{FilterDescriptor, PaginatedResult};
use crudkit_database::GenericRepository;

use crate::outcome::{Outcome, ServiceResult};

/// Message returned to callers in place of internal error details.
const INTERNAL_MESSAGE: &str = "An unexpected error occurred";

/// Maps repository results for entity `E` to view model `V`.
///
/// Every call returns a [`ServiceResult`]: empty results become
/// [`Outcome::NotFound`], invalid input and unmappable rows become
/// [`Outcome::BadRequest`], and anything else is logged with the entity
/// name and call context and reported as [`Outcome::InternalServerError`].
pub struct GenericService<E: Entity, V> {
    repository: GenericRepository<E>,
    mapper: Arc<dyn EntityMapper<E, V>>,
}

impl<E: Entity, V> Clone for GenericService<E, V> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
            mapper: Arc::clone(&self.mapper),
        }
    }
}

impl<E: Entity, V> std::fmt::Debug for GenericService<E, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenericService")
            .field("repository", &self.repository)
            .finish_non_exhaustive()
    }
}

impl<E: Entity, V: Send + Sync + 'static> GenericService<E, V> {
    /// Create a service from a repository and a view mapper.
    pub fn new(repository: GenericRepository<E>, mapper: Arc<dyn EntityMapper<E, V>>) -> Self {
        Self { repository, mapper }
    }

    /// The underlying repository.
    pub fn repository(&self) -> &GenericRepository<E> {
        &self.repository
    }

    /// Fetch one entity by id.
    pub async fn get_by_id(&self, id: i64, includes: &[String]) -> ServiceResult<Option<V>> {
        match self.repository.get_by_id(id, includes).await {
            Ok(Some(entity)) => self.map_one(&entity),
            Ok(None) => ServiceResult::failure(
                Outcome::NotFound,
                format!("{} {id} was not found", E::NAME),
            ),
            Err(e) => self.fail(e, &format!("id={id}")),
        }
    }

    /// Fetch every entity.
    pub async fn get_all(&self, includes: &[String]) -> ServiceResult<Vec<V>> {
        match self.repository.get_all(includes).await {
            Ok(rows) => self.map_many(&rows),
            Err(e) => self.fail(e, "all"),
        }
    }

    /// Fetch one page of all entities.
    pub async fn get_paginated(
        &self,
        page_number: u64,
        page_size: u64,
        includes: &[String],
    ) -> ServiceResult<PaginatedResult<V>> {
        match self
            .repository
            .get_paginated(page_number, page_size, includes)
            .await
        {
            Ok(page) => self.map_page(page),
            Err(e) => self.fail_with(
                e,
                &format!("page={page_number} size={page_size}"),
                PaginatedResult::empty(page_number, page_size),
            ),
        }
    }

    /// Fetch every entity matching all filters.
    pub async fn filter(
        &self,
        filters: &[FilterDescriptor],
        order: i32,
        includes: &[String],
    ) -> ServiceResult<Vec<V>> {
        match self
            .repository
            .filter_by_filters(filters, order, includes)
            .await
        {
            Ok(rows) => self.map_many(&rows),
            Err(e) => self.fail(e, &describe_filters(filters)),
        }
    }

    /// Fetch one page of the entities matching all filters.
    pub async fn filter_paginated(
        &self,
        filters: &[FilterDescriptor],
        page_number: u64,
        page_size: u64,
        order: i32,
        includes: &[String],
    ) -> ServiceResult<PaginatedResult<V>> {
        match self
            .repository
            .filter_paginated(filters, page_number, page_size, order, includes)
            .await
        {
            Ok(page) => self.map_page(page),
            Err(e) => self.fail_with(
                e,
                &format!(
                    "{} page={page_number} size={page_size}",
                    describe_filters(filters)
                ),
                PaginatedResult::empty(page_number, page_size),
            ),
        }
    }

    /// Persist a new entity.
    pub async fn add(&self, entity: &E) -> ServiceResult<Option<V>> {
        match self.repository.add(entity).await {
            Ok(created) => self.map_one(&created),
            Err(e) => self.fail(e, "add"),
        }
    }

    /// Overwrite an existing entity.
    pub async fn update(&self, entity: &E) -> ServiceResult<Option<V>> {
        match self.repository.update(entity).await {
            Ok(updated) => self.map_one(&updated),
            Err(e) => self.fail(e, &format!("id={}", entity.id())),
        }
    }

    /// Remove an entity by id.
    pub async fn delete(&self, id: i64) -> ServiceResult<bool> {
        match self.repository.delete_by_id(id).await {
            Ok(()) => ServiceResult::ok(true),
            Err(e) => self.fail(e, &format!("id={id}")),
        }
    }

    fn map_one(&self, entity: &E) -> ServiceResult<Option<V>> {
        match self.mapper.map(entity) {
            Some(view) => ServiceResult::ok(Some(view)),
            None => self.fail(
                AppError::mapping(format!("Could not map {} {}", E::NAME, entity.id())),
                &format!("id={}", entity.id()),
            ),
        }
    }

    fn map_many(&self, rows: &[E]) -> ServiceResult<Vec<V>> {
        if rows.is_empty() {
            return ServiceResult::failure(
                Outcome::NotFound,
                format!("No {} matched", E::NAME),
            );
        }
        let views: Option<Vec<V>> = rows.iter().map(|row| self.mapper.map(row)).collect();
        match views {
            Some(views) => ServiceResult::ok(views),
            None => self.fail(
                AppError::mapping(format!("Could not map {} rows", E::NAME)),
                "list",
            ),
        }
    }

    /// Failed pages keep the requested coordinates and the match count.
    fn map_page(&self, page: PaginatedResult<E>) -> ServiceResult<PaginatedResult<V>> {
        let (page_number, page_size) = (page.page_number, page.page_size);
        if page.items.is_empty() {
            return ServiceResult::failure_with(
                Outcome::NotFound,
                format!("No {} on page {page_number}", E::NAME),
                PaginatedResult {
                    total_count: page.total_count,
                    ..PaginatedResult::empty(page_number, page_size)
                },
            );
        }
        match page.try_map(|row| self.mapper.map(&row)) {
            Some(mapped) => ServiceResult::ok(mapped),
            None => self.fail_with(
                AppError::mapping(format!("Could not map {} rows", E::NAME)),
                &format!("page={page_number}"),
                PaginatedResult::empty(page_number, page_size),
            ),
        }
    }

    fn fail<T: Default>(&self, err: AppError, context: &str) -> ServiceResult<T> {
        self.fail_with(err, context, T::default())
    }

    fn fail_with<T>(&self, err: AppError, context: &str, data: T) -> ServiceResult<T> {
        let outcome = Outcome::from_error(&err);
        match outcome {
            Outcome::InternalServerError => {
                error!(entity = E::NAME, context, error = %err, "Service call failed");
                ServiceResult::failure_with(outcome, INTERNAL_MESSAGE, data)
            }
            _ => {
                warn!(entity = E::NAME, context, error = %err, "Service call rejected");
                ServiceResult::failure_with(outcome, err.message, data)
            }
        }
    }
}

fn describe_filters(filters: &[FilterDescriptor]) -> String {
    let mut out = String::from("filters=[");
    for (i, f) in filters.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{} {} {}", f.property_name, f.operator, f.value);
    }
    out.push(']');
    out
}
