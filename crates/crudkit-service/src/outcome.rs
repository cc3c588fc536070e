//! Explicit result type returned by every service call.

use serde::{Deserialize, Serialize};

use crudkit_core::error::{AppError, ErrorKind};

/// How a service call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The call succeeded and produced data.
    Ok,
    /// The request was invalid or the result could not be mapped.
    BadRequest,
    /// Nothing matched.
    NotFound,
    /// An unexpected failure occurred.
    InternalServerError,
}

impl Outcome {
    /// HTTP-style status code for this outcome.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::InternalServerError => 500,
        }
    }

    /// Classify an error.
    pub fn from_error(err: &AppError) -> Self {
        match err.kind {
            ErrorKind::Validation | ErrorKind::UnsupportedOperator | ErrorKind::Mapping => {
                Self::BadRequest
            }
            ErrorKind::NotFound => Self::NotFound,
            _ => Self::InternalServerError,
        }
    }

    /// Whether this is [`Outcome::Ok`].
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

/// Payload plus outcome. Non-`Ok` results always carry an empty payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceResult<T> {
    /// How the call ended.
    pub outcome: Outcome,
    /// The payload; empty unless `outcome` is `Ok`.
    pub data: T,
    /// Caller-safe detail for non-`Ok` outcomes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ServiceResult<T> {
    /// A successful result.
    pub fn ok(data: T) -> Self {
        Self {
            outcome: Outcome::Ok,
            data,
            message: None,
        }
    }

    /// A failed result that still carries a payload.
    pub fn failure_with(outcome: Outcome, message: impl Into<String>, data: T) -> Self {
        Self {
            outcome,
            data,
            message: Some(message.into()),
        }
    }

    /// Whether the call succeeded.
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Transform the payload, keeping outcome and message.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ServiceResult<U> {
        ServiceResult {
            outcome: self.outcome,
            data: f(self.data),
            message: self.message,
        }
    }
}

impl<T: Default> ServiceResult<T> {
    /// A failed result with an empty payload.
    pub fn failure(outcome: Outcome, message: impl Into<String>) -> Self {
        Self::failure_with(outcome, message, T::default())
    }
}
