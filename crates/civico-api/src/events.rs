use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use civico_db::models::NewEvent;
use civico_types::api::{CreateEventRequest, UpdateEventRequest};

use crate::validate::{Required, body};
use crate::{ApiError, AppState, blocking};

const DUPLICATE_TITLE: &str = "an event with this title already exists";

fn not_found() -> ApiError {
    ApiError::NotFound("event not found".into())
}

pub async fn list_events(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let events = blocking(&state, |db| db.list_events()).await??;
    Ok(Json(events))
}

pub async fn create_event(
    State(state): State<AppState>,
    payload: Result<Json<CreateEventRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let req = body(payload)?;

    let mut required = Required::default();
    let new = NewEvent {
        title: required.text(req.title, "title"),
        description: required.text(req.description, "descricao"),
        location: req.location,
        date: required.value(req.date, "data"),
    };
    required.finish()?;

    let event = blocking(&state, move |db| db.insert_event(new))
        .await?
        .map_err(|e| ApiError::from_write(e, DUPLICATE_TITLE, "failed to add event"))?;

    info!("Event {} created: {}", event.id, event.title);
    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let event = blocking(&state, move |db| db.get_event(id))
        .await??
        .ok_or_else(not_found)?;
    Ok(Json(event))
}

pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<UpdateEventRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    // An unknown id is a 404 whatever the body looks like.
    if blocking(&state, move |db| db.get_event(id)).await??.is_none() {
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

    let event = blocking(&state, move |db| db.update_event(id, patch))
        .await?
        .map_err(|e| ApiError::from_write(e, DUPLICATE_TITLE, "failed to update event"))?
        .ok_or_else(not_found)?;

    info!("Event {} updated", id);
    Ok(Json(event))
}

pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    if !blocking(&state, move |db| db.delete_event(id)).await?? {
        return Err(not_found());
    }

    info!("Event {} deleted", id);
    Ok(StatusCode::NO_CONTENT)
}
