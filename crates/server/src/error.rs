use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use contacts::{ContactError, StoreError};
use serde::{Deserialize, Serialize};

pub type ServerResult<T> = Result<T, ServerError>;

/// Errors a request can end in.
///
/// The `Display` text of each variant is exactly what the client sees; driver
/// detail is logged where the error is created and never carried here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid request body")]
    MalformedBody,

    #[error("Missing name or phone")]
    MissingField,

    #[error("Name and phone cannot be empty")]
    EmptyField,

    #[error("Missing contact ID")]
    MissingId,

    #[error("Invalid contact ID")]
    InvalidId,

    #[error("Contact not found")]
    ContactNotFound,

    /// Store failure, carrying the per-operation client message.
    #[error("{0}")]
    Store(&'static str),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Not found")]
    RouteNotFound,

    #[error("Request timed out")]
    RequestTimeout,

    #[error("Request body too large")]
    PayloadTooLarge,
}

/// API error response body: `{"error": "<message>"}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ServerError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::MalformedBody
            | ServerError::MissingField
            | ServerError::EmptyField
            | ServerError::MissingId
            | ServerError::InvalidId => StatusCode::BAD_REQUEST,
            ServerError::ContactNotFound | ServerError::RouteNotFound => StatusCode::NOT_FOUND,
            ServerError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ServerError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            ServerError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    /// Map a store failure, using `failure` as the client message when the
    /// store itself could not serve the call.
    pub fn from_store(err: StoreError, failure: &'static str) -> Self {
        match err {
            StoreError::NotFound => ServerError::ContactNotFound,
            StoreError::Unavailable(_) | StoreError::Timeout(_) => {
                tracing::error!(error = %err, "{failure}");
                ServerError::Store(failure)
            }
        }
    }
}

impl From<ContactError> for ServerError {
    fn from(err: ContactError) -> Self {
        match err {
            ContactError::Malformed(detail) => {
                tracing::debug!(%detail, "rejected request body");
                ServerError::MalformedBody
            }
            ContactError::MissingField(_) => ServerError::MissingField,
            ContactError::EmptyField(_) => ServerError::EmptyField,
            ContactError::InvalidId(_) => ServerError::InvalidId,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}
