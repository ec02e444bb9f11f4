//! Ambulance resource handlers

use crate::adapters::database::DocumentFilter;
use crate::api::error::{ApiError, ErrorBody};
use crate::api::state::AppState;
use crate::domain::Ambulance;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

#[utoipa::path(
    post,
    path = "/api/ambulance",
    tag = "ambulances",
    request_body = Ambulance,
    responses(
        (status = 201, description = "Ambulance created", body = Ambulance),
        (status = 400, description = "Invalid request body", body = ErrorBody),
        (status = 409, description = "Ambulance already exists", body = ErrorBody),
        (status = 502, description = "Database failure", body = ErrorBody)
    )
)]
/// Saves a new ambulance definition
///
/// An empty `id` is replaced by a generated one. The waiting list, if
/// given, is reconciled before the document is stored.
pub async fn create_ambulance(
    State(state): State<AppState>,
    payload: Result<Json<Ambulance>, JsonRejection>,
) -> Result<(StatusCode, Json<Ambulance>), ApiError> {
    let Json(mut ambulance) = payload.map_err(ApiError::invalid_body)?;
    super::validate_durations(&ambulance)?;
    ambulance.ensure_id();
    ambulance.reconcile_waiting_list(chrono::Utc::now())?;

    state
        .store
        .create_document(&state.operation_context(), &ambulance.id, &ambulance)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to create ambulance in database"))?;

    tracing::info!(ambulance_id = %ambulance.id, name = %ambulance.name, "Ambulance created");
    Ok((StatusCode::CREATED, Json(ambulance)))
}

#[utoipa::path(
    get,
    path = "/api/ambulance",
    tag = "ambulances",
    responses(
        (status = 200, description = "All ambulances", body = [Ambulance]),
        (status = 502, description = "Database failure", body = ErrorBody)
    )
)]
/// Lists every stored ambulance
pub async fn list_ambulances(
    State(state): State<AppState>,
) -> Result<Json<Vec<Ambulance>>, ApiError> {
    let ambulances = state
        .store
        .find_documents(&state.operation_context(), &DocumentFilter::All)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to list ambulances from database"))?;

    Ok(Json(ambulances))
}

#[utoipa::path(
    delete,
    path = "/api/ambulance/{ambulanceId}",
    tag = "ambulances",
    params(("ambulanceId" = String, Path, description = "Ambulance identifier")),
    responses(
        (status = 204, description = "Ambulance deleted"),
        (status = 404, description = "Ambulance not found", body = ErrorBody),
        (status = 502, description = "Database failure", body = ErrorBody)
    )
)]
/// Deletes an ambulance together with its waiting list
pub async fn delete_ambulance(
    State(state): State<AppState>,
    Path(ambulance_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .store
        .delete_document(&state.operation_context(), &ambulance_id)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to delete ambulance from database"))?;

    tracing::info!(%ambulance_id, "Ambulance deleted");
    Ok(StatusCode::NO_CONTENT)
}
