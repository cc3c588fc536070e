//! # crudkit-core
//!
//! Core crate for CrudKit. Contains the entity capability and view mapper
//! traits, the dynamic filter descriptor types, pagination/sorting types,
//! configuration schemas, and the unified error system. The store
//! abstraction lives in `crudkit-database`.
//!
//! This crate has **no** internal dependencies on other CrudKit crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
