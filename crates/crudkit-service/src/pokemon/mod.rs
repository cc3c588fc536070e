//! Pokemon view model and mapper.

pub mod view;

pub use view::{PokemonMapper, PokemonView};
