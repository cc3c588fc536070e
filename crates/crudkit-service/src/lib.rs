//! # crudkit-service
//!
//! Service layer for CrudKit. A [`GenericService`] wraps a
//! [`GenericRepository`](crudkit_database::GenericRepository), maps
//! entities to view models, and reports every call as a
//! [`ServiceResult`] carrying an explicit [`Outcome`].

pub mod generic;
pub mod outcome;
pub mod pokemon;

pub use generic::GenericService;
pub use outcome::{Outcome, ServiceResult};
pub use pokemon::{PokemonMapper, PokemonView};
