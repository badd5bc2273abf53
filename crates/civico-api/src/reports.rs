use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{error, info};

use civico_db::models::NewReport;
use civico_types::api::CreateReportRequest;

use crate::validate::{Required, body};
use crate::{ApiError, AppState, blocking};

pub async fn list_reports(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let reports = blocking(&state, |db| db.list_reports()).await??;
    Ok(Json(reports))
}

/// Reports have no unique column, so every storage failure is a 500.
pub async fn create_report(
    State(state): State<AppState>,
    payload: Result<Json<CreateReportRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let req = body(payload)?;

    let mut required = Required::default();
    let new = NewReport {
        name: req.name,
        identify: required.value(req.identify, "identificar"),
        reason: required.text(req.reason, "motivo"),
        description: required.text(req.description, "descricao"),
        offender: req.offender,
        created_at: required.text(req.created_at, "createdAt"),
    };
    required.finish()?;

    let report = blocking(&state, move |db| db.insert_report(new))
        .await?
        .map_err(|e| {
            error!("failed to save report: {}", e);
            ApiError::Internal(format!("failed to save report: {e}"))
        })?;

    info!("Report {} saved", report.id);
    Ok((StatusCode::CREATED, Json(report)))
}
