//! Caller-facing shape of a pokemon.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crudkit_core::traits::EntityMapper;
use crudkit_entity::Pokemon;

/// Pokemon as returned to API callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PokemonView {
    /// Identifier.
    pub id: i64,
    /// Species name.
    pub name: String,
    /// Owning trainer name.
    pub owner: String,
    /// Elemental type.
    pub element: String,
    /// Experience level.
    pub level: i32,
    /// When it was caught.
    pub caught_at: DateTime<Utc>,
    /// Trainer's home town, present when the trainer was included.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trainer_hometown: Option<String>,
}

/// Maps [`Pokemon`] rows to [`PokemonView`]s.
///
/// Rows without a species name have no valid view.
#[derive(Debug, Clone, Copy, Default)]
pub struct PokemonMapper;

impl EntityMapper<Pokemon, PokemonView> for PokemonMapper {
    fn map(&self, entity: &Pokemon) -> Option<PokemonView> {
        if entity.name.trim().is_empty() {
            return None;
        }
        Some(PokemonView {
            id: entity.id,
            name: entity.name.clone(),
            owner: entity.owner.clone(),
            element: entity.element.clone(),
            level: entity.level,
            caught_at: entity.caught_at,
            trainer_hometown: entity.trainer.as_ref().map(|t| t.hometown.clone()),
        })
    }
}
