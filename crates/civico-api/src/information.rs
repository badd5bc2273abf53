use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use civico_db::models::NewInformation;
use civico_types::api::CreateInformationRequest;

use crate::validate::{Required, body};
use crate::{ApiError, AppState, blocking};

pub async fn list_information(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let items = blocking(&state, |db| db.list_information()).await??;
    Ok(Json(items))
}

pub async fn create_information(
    State(state): State<AppState>,
    payload: Result<Json<CreateInformationRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let req = body(payload)?;

    let mut required = Required::default();
    let new = NewInformation {
        title: required.text(req.title, "title"),
        description: required.text(req.description, "descricao"),
    };
    required.finish()?;

    let info = blocking(&state, move |db| db.insert_information(new))
        .await?
        .map_err(|e| {
            ApiError::from_write(
                e,
                "an information notice with this title already exists",
                "failed to add information",
            )
        })?;

    info!("Information {} created: {}", info.id, info.title);
    Ok((StatusCode::CREATED, Json(info)))
}

pub async fn get_information(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let info = blocking(&state, move |db| db.get_information(id))
        .await??
        .ok_or_else(|| ApiError::NotFound("information not found".into()))?;
    Ok(Json(info))
}
