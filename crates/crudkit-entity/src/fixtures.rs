//! Seed rows for the in-memory store and tests.

use chrono::{TimeZone, Utc};

use crate::pokemon::Pokemon;
use crate::trainer::Trainer;

/// The three trainers referenced by [`pokemon`].
pub fn trainers() -> Vec<Trainer> {
    vec![
        trainer(1, "Ash Ketchum", "Pallet Town"),
        trainer(2, "Misty", "Cerulean City"),
        trainer(3, "Brock", "Pewter City"),
    ]
}

/// Five pokemon: Pikachu, Charmander, Bulbasaur, Squirtle, Butterfree.
pub fn pokemon() -> Vec<Pokemon> {
    vec![
        pokemon_row(1, "Pikachu", "Ash Ketchum", "electric", 25, 1),
        pokemon_row(2, "Charmander", "Misty", "fire", 12, 2),
        pokemon_row(3, "Bulbasaur", "Brock", "grass", 15, 3),
        pokemon_row(4, "Squirtle", "Ash Ketchum", "water", 18, 1),
        pokemon_row(5, "Butterfree", "Misty", "bug", 20, 2),
    ]
}

fn trainer(id: i64, name: &str, hometown: &str) -> Trainer {
    Trainer {
        id,
        name: name.to_string(),
        hometown: hometown.to_string(),
    }
}

fn pokemon_row(
    id: i64,
    name: &str,
    owner: &str,
    element: &str,
    level: i32,
    trainer_id: i64,
) -> Pokemon {
    Pokemon {
        id,
        name: name.to_string(),
        owner: owner.to_string(),
        element: element.to_string(),
        level,
        caught_at: Utc
            .with_ymd_and_hms(1997, 4, id as u32, 12, 0, 0)
            .single()
            .unwrap_or_default(),
        trainer_id: Some(trainer_id),
        trainer: None,
    }
}
