//! Custom Axum extractors.

pub mod json;
pub mod language;
pub mod query;

pub use json::{JsonBody, ValidatedJson};
pub use language::Language;
pub use query::ValidatedQuery;
