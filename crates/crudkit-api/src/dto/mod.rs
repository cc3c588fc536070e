//! Request and response data transfer objects.

pub mod request;
pub mod response;

pub use request::{FilterInput, FilterPageRequest, FilterRequest, IncludeQuery, PageQuery};
pub use response::{Envelope, HealthResponse};
