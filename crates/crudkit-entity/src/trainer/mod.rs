//! Trainer entity.

pub mod model;

pub use model::Trainer;
