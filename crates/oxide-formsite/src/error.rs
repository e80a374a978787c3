//! Site errors and their HTTP status mapping.

use oxide_forms::ServiceError;
use serde_json::json;
use thiserror::Error;

use crate::http::{Method, Response};

/// Errors raised while serving a request.
#[derive(Debug, Error)]
pub enum SiteError {
    /// No route matches the path.
    #[error("No route for {method} {path}")]
    NotFound { method: Method, path: String },

    /// The path exists but not for this method.
    #[error("Method {method} not allowed for {path}")]
    MethodNotAllowed { method: Method, path: String },

    /// A route pattern failed to compile.
    #[error("Invalid path pattern: {0}")]
    InvalidPattern(String),

    /// The request body could not be decoded.
    #[error("Invalid request body: {0}")]
    BadRequest(String),

    /// The store rejected the operation.
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl From<serde_json::Error> for SiteError {
    fn from(err: serde_json::Error) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<multer::Error> for SiteError {
    fn from(err: multer::Error) -> Self {
        Self::BadRequest(err.to_string())
    }
}

/// Result type for site operations.
pub type Result<T> = std::result::Result<T, SiteError>;

impl SiteError {
    /// Returns the HTTP status code for this error.
    pub const fn status(&self) -> u16 {
        match self {
            Self::NotFound { .. } | Self::Service(ServiceError::NotFound(_)) => 404,
            Self::MethodNotAllowed { .. } => 405,
            Self::InvalidPattern(_) => 500,
            Self::BadRequest(_) | Self::Service(ServiceError::BadRequest(_)) => 400,
            Self::Service(ServiceError::NotPublished) => 403,
            Self::Service(ServiceError::SubmissionLimitReached) => 409,
            Self::Service(ServiceError::Invalid(_)) => 422,
            Self::Service(ServiceError::Unavailable(_)) => 503,
        }
    }

    /// Renders the error as a JSON body `{ "message", "errors"? }`.
    pub fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Service(ServiceError::Invalid(errors)) => json!({
                "message": self.to_string(),
                "errors": errors,
            }),
            _ => json!({ "message": self.to_string() }),
        };
        Response::json(&body).status(status)
    }
}
