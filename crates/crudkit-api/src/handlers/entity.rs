//! Generic CRUD handlers, instantiated once per entity type.

use axum::extract::{Path, State};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crudkit_core::error::AppError;
use crudkit_core::traits::Entity;
use crudkit_core::types::PaginatedResult;

use crate::dto::request::{FilterPageRequest, FilterRequest, IncludeQuery, PageQuery};
use crate::dto::response::Envelope;
use crate::extractors::{JsonBody, Language, ValidatedJson, ValidatedQuery};
use crate::state::EntityState;

/// GET /api/{entity}/{id}
pub async fn get_by_id<E, V>(
    State(state): State<EntityState<E, V>>,
    Language(language): Language,
    Path(id): Path<i64>,
    ValidatedQuery(include): ValidatedQuery<IncludeQuery>,
) -> Envelope<Option<V>>
where
    E: Entity,
    V: Serialize + Send + Sync + 'static,
{
    let result = state.service.get_by_id(id, &include.names()).await;
    Envelope::from_result(result, state.localizer.as_ref(), &language)
}

/// GET /api/{entity}
pub async fn get_all<E, V>(
    State(state): State<EntityState<E, V>>,
    Language(language): Language,
    ValidatedQuery(include): ValidatedQuery<IncludeQuery>,
) -> Envelope<Vec<V>>
where
    E: Entity,
    V: Serialize + Send + Sync + 'static,
{
    let result = state.service.get_all(&include.names()).await;
    Envelope::from_result(result, state.localizer.as_ref(), &language)
}

/// GET /api/{entity}/paged
pub async fn get_paginated<E, V>(
    State(state): State<EntityState<E, V>>,
    Language(language): Language,
    ValidatedQuery(page): ValidatedQuery<PageQuery>,
    ValidatedQuery(include): ValidatedQuery<IncludeQuery>,
) -> Envelope<PaginatedResult<V>>
where
    E: Entity,
    V: Serialize + Send + Sync + 'static,
{
    let page_size = page.page_size(&state.pagination);
    let result = state
        .service
        .get_paginated(page.page_number, page_size, &include.names())
        .await;
    Envelope::from_result(result, state.localizer.as_ref(), &language)
}

/// POST /api/{entity}/filter
pub async fn filter<E, V>(
    State(state): State<EntityState<E, V>>,
    Language(language): Language,
    ValidatedQuery(include): ValidatedQuery<IncludeQuery>,
    ValidatedJson(body): ValidatedJson<FilterRequest>,
) -> Result<Envelope<Vec<V>>, AppError>
where
    E: Entity,
    V: Serialize + Send + Sync + 'static,
{
    let order = body.order;
    let filters = body.descriptors()?;
    let result = state
        .service
        .filter(&filters, order, &include.names())
        .await;
    Ok(Envelope::from_result(
        result,
        state.localizer.as_ref(),
        &language,
    ))
}

/// POST /api/{entity}/filter/paged
pub async fn filter_paginated<E, V>(
    State(state): State<EntityState<E, V>>,
    Language(language): Language,
    ValidatedQuery(include): ValidatedQuery<IncludeQuery>,
    ValidatedJson(body): ValidatedJson<FilterPageRequest>,
) -> Result<Envelope<PaginatedResult<V>>, AppError>
where
    E: Entity,
    V: Serialize + Send + Sync + 'static,
{
    let page_number = body.page_number;
    let page_size = body.resolved_page_size(&state.pagination);
    let order = body.order;
    let filters = body.descriptors()?;
    let result = state
        .service
        .filter_paginated(&filters, page_number, page_size, order, &include.names())
        .await;
    Ok(Envelope::from_result(
        result,
        state.localizer.as_ref(),
        &language,
    ))
}

/// POST /api/{entity}
pub async fn add<E, V>(
    State(state): State<EntityState<E, V>>,
    Language(language): Language,
    JsonBody(entity): JsonBody<E>,
) -> Envelope<Option<V>>
where
    E: Entity + DeserializeOwned,
    V: Serialize + Send + Sync + 'static,
{
    let result = state.service.add(&entity).await;
    Envelope::from_result(result, state.localizer.as_ref(), &language)
}

/// PUT /api/{entity}
pub async fn update<E, V>(
    State(state): State<EntityState<E, V>>,
    Language(language): Language,
    JsonBody(entity): JsonBody<E>,
) -> Envelope<Option<V>>
where
    E: Entity + DeserializeOwned,
    V: Serialize + Send + Sync + 'static,
{
    let result = state.service.update(&entity).await;
    Envelope::from_result(result, state.localizer.as_ref(), &language)
}

/// DELETE /api/{entity}/{id}
pub async fn delete<E, V>(
    State(state): State<EntityState<E, V>>,
    Language(language): Language,
    Path(id): Path<i64>,
) -> Envelope<bool>
where
    E: Entity,
    V: Serialize + Send + Sync + 'static,
{
    let result = state.service.delete(id).await;
    Envelope::from_result(result, state.localizer.as_ref(), &language)
}
