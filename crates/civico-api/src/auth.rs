use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{info, warn};

use civico_db::models::NewUser;
use civico_types::api::{LoginRequest, RegisterRequest};

use crate::validate::{Required, body};
use crate::{ApiError, AppState, blocking};

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let req = body(payload)?;

    let mut required = Required::default();
    let new = NewUser {
        username: required.text(req.username, "username"),
        password: required.text(req.password, "password"),
        name: required.present(req.name, "name"),
        role: required.present(req.role, "cargo"),
    };
    required.finish()?;

    let user = blocking(&state, move |db| db.create_user(new))
        .await?
        .map_err(|e| ApiError::from_write(e, "user already exists", "failed to register user"))?;

    info!("User {} registered", user.username);
    Ok((StatusCode::CREATED, Json(user)))
}

/// Stateless credential check: no session or token is issued, the caller
/// gets the public user fields back and nothing else.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let req = body(payload)?;

    let mut required = Required::default();
    let username = required.text(req.username, "username");
    let password = required.text(req.password, "password");
    required.finish()?;

    let user = blocking(&state, move |db| {
        db.find_user_by_credentials(&username, &password)
    })
    .await??;

    match user {
        Some(user) => Ok(Json(user)),
        None => {
            warn!("Failed login attempt");
            Err(ApiError::Unauthorized)
        }
    }
}
