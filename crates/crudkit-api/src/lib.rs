//! # crudkit-api
//!
//! HTTP API layer for CrudKit built on Axum.
//!
//! Provides generic entity routes, the response envelope middleware,
//! status message localization, extractors, DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod localization;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, build_state, run_server};
pub use localization::{CatalogLocalizer, Localizer};
pub use state::AppState;
