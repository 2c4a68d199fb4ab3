//! API route handlers
//!
//! - `health`: liveness probe
//! - `contacts`: contact CRUD

pub mod contacts;
pub mod health;

use crate::error::ServerError;
use axum::http::{Method, Uri};

/// Fallback for paths no route matches.
///
/// `/contacts/<a>/<b>` lands here: the remainder is not a single id segment,
/// so id-taking methods get the invalid-id answer and the rest get 405.
pub async fn not_found(method: Method, uri: Uri) -> ServerError {
    if uri.path().starts_with("/contacts/") {
        return match method {
            Method::GET | Method::PUT | Method::DELETE => ServerError::InvalidId,
            _ => ServerError::MethodNotAllowed,
        };
    }
    ServerError::RouteNotFound
}

/// 405 for a known path with an unrouted method.
pub async fn method_not_allowed() -> ServerError {
    ServerError::MethodNotAllowed
}

/// `PUT`/`DELETE /contacts/` with an empty id segment.
pub async fn missing_id() -> ServerError {
    ServerError::MissingId
}
