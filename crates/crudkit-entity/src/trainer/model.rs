//! Trainer entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crudkit_core::traits::{Entity, PropertyDef};
use crudkit_core::types::{FieldKind, FieldValue};

/// A trainer who owns pokemon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Trainer {
    /// Unique trainer identifier; zero until persisted.
    #[serde(default)]
    pub id: i64,
    /// Trainer name.
    pub name: String,
    /// Home town.
    pub hometown: String,
}

const SCHEMA: &[PropertyDef] = &[
    PropertyDef::new("Id", "id", FieldKind::Integer),
    PropertyDef::new("Name", "name", FieldKind::Text),
    PropertyDef::new("Hometown", "hometown", FieldKind::Text),
];

impl Entity for Trainer {
    const NAME: &'static str = "Trainer";
    const TABLE: &'static str = "trainers";

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
            "Hometown" => Some(self.hometown.clone().into()),
            _ => None,
        }
    }
}
