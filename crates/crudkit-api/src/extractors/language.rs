//! Negotiated response language.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;

use crate::localization::Localizer;

/// Response language chosen from `Accept-Language`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language(pub String);

impl<S> FromRequestParts<S> for Language
where
    Arc<dyn Localizer>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let localizer = <Arc<dyn Localizer> as FromRef<S>>::from_ref(state);
        Ok(Self(localizer.negotiate(&parts.headers)))
    }
}
