//! Route definitions for the CrudKit HTTP API.
//!
//! Each entity type gets the same generic route set, nested under
//! `/api/{segment}`.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tower_http::compression::CompressionLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crudkit_core::traits::Entity;

use crate::handlers;
use crate::middleware;
use crate::middleware::cors::build_cors_layer;
use crate::state::{AppState, EntityState};

/// Build the complete Axum router with all routes and middleware.
///
/// The envelope middleware sits innermost so it sees uncompressed bodies.
pub fn build_router(state: AppState) -> Router {
    let max_request_body = state.config.server.max_request_body_bytes;

    let api_routes = Router::new()
        .route("/health", get(handlers::health::health))
        .nest("/pokemon", entity_routes(state.pokemon.clone()))
        .nest("/trainers", entity_routes(state.trainers.clone()));

    Router::new()
        .nest("/api", api_routes)
        .layer(axum_middleware::from_fn_with_state(
            state.envelope_settings(),
            middleware::envelope::rewrite_envelope,
        ))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_request_body))
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(&state.config.server.cors))
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Generic CRUD routes for one entity type.
pub fn entity_routes<E, V, S>(state: EntityState<E, V>) -> Router<S>
where
    E: Entity + DeserializeOwned,
    V: Serialize + Send + Sync + 'static,
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/",
            get(handlers::entity::get_all::<E, V>)
                .post(handlers::entity::add::<E, V>)
                .put(handlers::entity::update::<E, V>),
        )
        .route("/paged", get(handlers::entity::get_paginated::<E, V>))
        .route("/filter", post(handlers::entity::filter::<E, V>))
        .route(
            "/filter/paged",
            post(handlers::entity::filter_paginated::<E, V>),
        )
        .route(
            "/{id}",
            get(handlers::entity::get_by_id::<E, V>).delete(handlers::entity::delete::<E, V>),
        )
        .with_state(state)
}
