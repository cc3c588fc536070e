//! Pokemon entity.

pub mod model;

pub use model::Pokemon;
