//! Contact CRUD handlers.
//!
//! Each handler runs parse → validate → execute → respond and stops at the
//! first failure. Bodies are taken as raw bytes and decoded by the codec in
//! the `contacts` crate.

use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::body::Bytes;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use contacts::{Contact, ContactId, ContactPatch, NewContact};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Response from create
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub message: String,
    pub contact: Contact,
}

/// Response from update and delete
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

/// Parse the `{id}` segment. A segment that does not even percent-decode is
/// as invalid as a malformed hex id.
fn contact_id(path: Result<Path<String>, PathRejection>) -> ServerResult<ContactId> {
    let Path(raw) = path.map_err(|rejection| {
        tracing::debug!(%rejection, "undecodable contact id");
        ServerError::InvalidId
    })?;
    Ok(ContactId::parse(&raw)?)
}

/// `POST /contacts`
pub async fn create_contact(
    State(state): State<Arc<ServerState>>,
    body: Bytes,
) -> ServerResult<impl IntoResponse> {
    let new_contact = NewContact::from_json(&body)?;

    let contact = state
        .contacts
        .insert(new_contact)
        .await
        .map_err(|e| ServerError::from_store(e, "Failed to create contact"))?;

    tracing::info!(id = %contact.id, "contact created");
    Ok(Json(CreatedResponse {
        message: "Contact created successfully".to_string(),
        contact,
    }))
}

/// `GET /contacts` and `GET /contacts/`
pub async fn list_contacts(
    State(state): State<Arc<ServerState>>,
) -> ServerResult<impl IntoResponse> {
    let contacts = state
        .contacts
        .find_all()
        .await
        .map_err(|e| ServerError::from_store(e, "Failed to retrieve contacts"))?;

    Ok(Json(contacts))
}

/// `GET /contacts/{id}`
pub async fn get_contact(
    State(state): State<Arc<ServerState>>,
    id: Result<Path<String>, PathRejection>,
) -> ServerResult<impl IntoResponse> {
    let id = contact_id(id)?;

    let contact = state
        .contacts
        .find_by_id(&id)
        .await
        .map_err(|e| ServerError::from_store(e, "Database error"))?;

    Ok(Json(contact))
}

/// `PUT /contacts/{id}`
///
/// Only the supplied fields change. A body with neither field is accepted
/// and changes nothing.
pub async fn update_contact(
    State(state): State<Arc<ServerState>>,
    id: Result<Path<String>, PathRejection>,
    body: Bytes,
) -> ServerResult<impl IntoResponse> {
    let id = contact_id(id)?;
    let patch = ContactPatch::from_json(&body)?;

    state
        .contacts
        .update(&id, patch)
        .await
        .map_err(|e| ServerError::from_store(e, "Failed to update contact"))?;

    tracing::info!(%id, "contact updated");
    Ok(MessageResponse::new("Contact updated successfully"))
}

/// `DELETE /contacts/{id}`
pub async fn delete_contact(
    State(state): State<Arc<ServerState>>,
    id: Result<Path<String>, PathRejection>,
) -> ServerResult<impl IntoResponse> {
    let id = contact_id(id)?;

    state
        .contacts
        .delete(&id)
        .await
        .map_err(|e| ServerError::from_store(e, "Failed to delete contact"))?;

    tracing::info!(%id, "contact deleted");
    Ok(MessageResponse::new("Contact deleted successfully"))
}
