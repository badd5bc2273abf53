pub mod auth;
pub mod contacts;
pub mod error;
pub mod events;
pub mod information;
pub mod reports;
pub mod validate;

use std::sync::Arc;

use axum::{Json, Router, response::IntoResponse, routing::get, routing::post};
use tracing::error;

use civico_db::Database;

pub use error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
}

/// All routes, with the resource routes under `/api`. CORS and tracing
/// layers are added by the binary.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/contatos",
            get(contacts::list_contacts).post(contacts::create_contact),
        )
        .route(
            "/contatos/{id}",
            get(contacts::get_contact)
                .put(contacts::update_contact)
                .delete(contacts::delete_contact),
        )
        .route(
            "/denuncias",
            get(reports::list_reports).post(reports::create_report),
        )
        .route("/eventos", get(events::list_events).post(events::create_event))
        .route(
            "/eventos/{id}",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        .route(
            "/informacoes",
            get(information::list_information).post(information::create_information),
        )
        .route("/informacoes/{id}", get(information::get_information))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    Router::new()
        .nest("/api", api)
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Run a storage call off the async runtime. The outer error covers a
/// panicked or cancelled blocking task; the inner one is the storage result.
pub(crate) async fn blocking<F, T>(state: &AppState, f: F) -> Result<civico_db::Result<T>, ApiError>
where
    F: FnOnce(&Database) -> civico_db::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(e.to_string())
        })
}
