use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use civico_db::models::NewContact;
use civico_types::api::{CreateContactRequest, UpdateContactRequest};

use crate::validate::{Required, body};
use crate::{ApiError, AppState, blocking};

const DUPLICATE_TITLE: &str = "a contact with this title already exists";

fn not_found() -> ApiError {
    ApiError::NotFound("contact not found".into())
}

pub async fn list_contacts(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let contacts = blocking(&state, |db| db.list_contacts()).await??;
    Ok(Json(contacts))
}

pub async fn create_contact(
    State(state): State<AppState>,
    payload: Result<Json<CreateContactRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let req = body(payload)?;

    let mut required = Required::default();
    let new = NewContact {
        title: required.text(req.title, "title"),
        description: required.text(req.description, "descricao"),
        location: req.location,
        phone: req.phone,
        email: req.email,
    };
    required.finish()?;

    let contact = blocking(&state, move |db| db.insert_contact(new))
        .await?
        .map_err(|e| ApiError::from_write(e, DUPLICATE_TITLE, "failed to add contact"))?;

    info!("Contact {} created: {}", contact.id, contact.title);
    Ok((StatusCode::CREATED, Json(contact)))
}

pub async fn get_contact(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let contact = blocking(&state, move |db| db.get_contact(id))
        .await??
        .ok_or_else(not_found)?;
    Ok(Json(contact))
}

pub async fn update_contact(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<UpdateContactRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    // An unknown id is a 404 whatever the body looks like.
    if blocking(&state, move |db| db.get_contact(id)).await??.is_none() {
        return Err(not_found());
    }

    let patch = body(payload)?;
    if patch.is_empty() {
        return Err(ApiError::Validation("request body is empty".into()));
    }

    let mut required = Required::default();
    required.patched_text(&patch.title, "title");
    required.patched_text(&patch.description, "descricao");
    required.finish()?;

    let contact = blocking(&state, move |db| db.update_contact(id, patch))
        .await?
        .map_err(|e| ApiError::from_write(e, DUPLICATE_TITLE, "failed to update contact"))?
        .ok_or_else(not_found)?;

    info!("Contact {} updated", id);
    Ok(Json(contact))
}

pub async fn delete_contact(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    if !blocking(&state, move |db| db.delete_contact(id)).await?? {
        return Err(not_found());
    }

    info!("Contact {} deleted", id);
    Ok(StatusCode::NO_CONTENT)
}
