//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use axum::extract::FromRef;

use crudkit_core::config::{AppConfig, PaginationConfig};
use crudkit_core::traits::{Entity, FnMapper};
use crudkit_database::{BelongsTo, DatabasePool, EntityStore, GenericRepository};
use crudkit_entity::{Pokemon, Trainer};
use crudkit_service::{GenericService, PokemonMapper, PokemonView};

use crate::localization::{CatalogLocalizer, Localizer};
use crate::middleware::envelope::EnvelopeSettings;

/// Everything the generic handlers of one entity type need.
pub struct EntityState<E: Entity, V> {
    /// Service for the entity.
    pub service: GenericService<E, V>,
    /// Status text source.
    pub localizer: Arc<dyn Localizer>,
    /// Page size defaults and bounds.
    pub pagination: PaginationConfig,
}

impl<E: Entity, V> Clone for EntityState<E, V> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            localizer: Arc::clone(&self.localizer),
            pagination: self.pagination.clone(),
        }
    }
}

impl<E: Entity, V> std::fmt::Debug for EntityState<E, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityState")
            .field("service", &self.service)
            .finish_non_exhaustive()
    }
}

impl<E: Entity, V> FromRef<EntityState<E, V>> for Arc<dyn Localizer> {
    fn from_ref(state: &EntityState<E, V>) -> Self {
        Arc::clone(&state.localizer)
    }
}

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Status text source
    pub localizer: Arc<dyn Localizer>,
    /// Active store backend name
    pub backend: &'static str,
    /// PostgreSQL pool when the postgres backend is active
    pub db: Option<DatabasePool>,
    /// Pokemon routes
    pub pokemon: EntityState<Pokemon, PokemonView>,
    /// Trainer routes
    pub trainers: EntityState<Trainer, Trainer>,
}

impl AppState {
    /// Wire services over the given stores.
    ///
    /// Pokemon get a `Trainer` include backed by `trainer_store`.
    pub fn new(
        config: AppConfig,
        pokemon_store: Arc<dyn EntityStore<Pokemon>>,
        trainer_store: Arc<dyn EntityStore<Trainer>>,
    ) -> Self {
        let backend = pokemon_store.backend();
        let localizer: Arc<dyn Localizer> =
            Arc::new(CatalogLocalizer::from_config(&config.localization));

        let pokemon_repo = GenericRepository::new(pokemon_store).with_relation(
            Pokemon::TRAINER,
            Arc::new(BelongsTo::new(
                Arc::clone(&trainer_store),
                |p: &Pokemon| p.trainer_id,
                |p: &mut Pokemon, trainer| p.trainer = trainer,
            )),
        );
        let trainer_repo = GenericRepository::new(trainer_store);

        let pokemon = EntityState {
            service: GenericService::new(pokemon_repo, Arc::new(PokemonMapper)),
            localizer: Arc::clone(&localizer),
            pagination: config.pagination.clone(),
        };
        let trainers = EntityState {
            service: GenericService::new(
                trainer_repo,
                Arc::new(FnMapper(|t: &Trainer| Some(t.clone()))),
            ),
            localizer: Arc::clone(&localizer),
            pagination: config.pagination.clone(),
        };

        Self {
            config: Arc::new(config),
            localizer,
            backend,
            db: None,
            pokemon,
            trainers,
        }
    }

    /// Attach the pool backing the stores, for health checks and shutdown.
    pub fn with_database(mut self, db: DatabasePool) -> Self {
        self.db = Some(db);
        self
    }

    /// Settings for the envelope middleware.
    pub fn envelope_settings(&self) -> EnvelopeSettings {
        EnvelopeSettings {
            localizer: Arc::clone(&self.localizer),
            max_body_bytes: self.config.server.max_envelope_body_bytes,
        }
    }
}

impl FromRef<AppState> for Arc<dyn Localizer> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.localizer)
    }
}
