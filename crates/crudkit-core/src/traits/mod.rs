//! Core traits defined in `crudkit-core` and implemented by other crates.

pub mod entity;
pub mod mapper;

pub use entity::{Entity, PropertyDef};
pub use mapper::{EntityMapper, FnMapper};
