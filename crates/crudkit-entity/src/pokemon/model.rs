//! Pokemon entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crudkit_core::traits::{Entity, PropertyDef};
use crudkit_core::types::{FieldKind, FieldValue};

use crate::trainer::Trainer;

/// A caught pokemon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Pokemon {
    /// Unique pokemon identifier; zero until persisted.
    #[serde(default)]
    pub id: i64,
    /// Species name.
    pub name: String,
    /// Name of the owning trainer.
    pub owner: String,
    /// Elemental type, e.g. `"electric"`.
    pub element: String,
    /// Experience level.
    pub level: i32,
    /// When the pokemon was caught.
    #[serde(default = "Utc::now")]
    pub caught_at: DateTime<Utc>,
    /// Owning trainer's identifier.
    #[serde(default)]
    pub trainer_id: Option<i64>,
    /// Owning trainer, populated only when the `Trainer` include is requested.
    #[sqlx(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trainer: Option<Trainer>,
}

impl Pokemon {
    /// Name of the trainer navigation.
    pub const TRAINER: &'static str = "Trainer";
}

const SCHEMA: &[PropertyDef] = &[
    PropertyDef::new("Id", "id", FieldKind::Integer),
    PropertyDef::new("Name", "name", FieldKind::Text),
    PropertyDef::new("Owner", "owner", FieldKind::Text),
    PropertyDef::new("Element", "element", FieldKind::Text),
    PropertyDef::new("Level", "level", FieldKind::Integer),
    PropertyDef::new("CaughtAt", "caught_at", FieldKind::Timestamp),
    PropertyDef::new("TrainerId", "trainer_id", FieldKind::Integer),
    PropertyDef::relation(Pokemon::TRAINER),
];

impl Entity for Pokemon {
    const NAME: &'static str = "Pokemon";
    const TABLE: &'static str = "pokemon";

    fn schema() -> &'static [PropertyDef] {
        SCHEMA
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn property(&self, name: &str) -> Option<FieldValue> {
        match name {
            "Id" => Some(self.id.into()),
            "Name" => Some(self.name.clone().into()),
            "Owner" => Some(self.owner.clone().into()),
            "Element" => Some(self.element.clone().into()),
            "Level" => Some(self.level.into()),
            "CaughtAt" => Some(self.caught_at.into()),
            "TrainerId" => Some(self.trainer_id.into()),
            _ => None,
        }
    }
}
