//! Waiting list and condition handlers

use super::{ensure_duration_in_range, load_ambulance, update_ambulance_with};
use crate::api::error::{ApiError, ErrorBody};
use crate::api::models::{
    NewWaitingListEntry, WaitingListEntryUpdate, DEFAULT_ESTIMATED_DURATION_MINUTES,
};
use crate::api::state::AppState;
use crate::domain::{Ambulance, Condition, WaitingListEntry};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;

fn entry_not_found(entry_id: &str) -> ApiError {
    ApiError::not_found(
        "Entry not found",
        format!("waiting list entry '{entry_id}' not found"),
    )
}

/// The ambulance's condition for `code`, or 400 if it is not predefined
fn known_condition<'a>(ambulance: &'a Ambulance, code: &str) -> Result<&'a Condition, ApiError> {
    ambulance.condition(code).ok_or_else(|| {
        ApiError::bad_request(
            "Unknown condition code",
            format!("condition '{code}' is not defined for ambulance '{}'", ambulance.id),
        )
    })
}

/// Duration for an entry that did not state one
fn default_duration(condition: Option<&Condition>) -> u32 {
    condition
        .and_then(|c| c.typical_duration_minutes)
        .filter(|minutes| *minutes > 0)
        .unwrap_or(DEFAULT_ESTIMATED_DURATION_MINUTES)
}

/// Rejects a patient who already waits under a different entry
fn ensure_patient_not_waiting(
    ambulance: &Ambulance,
    patient_id: &str,
    except_entry: Option<&str>,
) -> Result<(), ApiError> {
    let duplicate = ambulance
        .waiting_list
        .iter()
        .any(|e| e.patient_id == patient_id && Some(e.id.as_str()) != except_entry);
    if duplicate {
        return Err(ApiError::conflict(
            "Patient already in the waiting list",
            format!("patient '{patient_id}' is already waiting"),
        ));
    }
    Ok(())
}

/// Builds the stored entry from a creation request, validating it first
fn new_entry(ambulance: &Ambulance, request: NewWaitingListEntry) -> Result<WaitingListEntry, ApiError> {
    if request.patient_id.trim().is_empty() {
        return Err(ApiError::bad_request(
            "Invalid request body",
            "patientId is required",
        ));
    }

    let id = request
        .id
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    if ambulance.find_entry(&id).is_some() {
        return Err(ApiError::conflict(
            "Entry already exists",
            format!("waiting list entry '{id}' already exists"),
        ));
    }
    ensure_patient_not_waiting(ambulance, &request.patient_id, None)?;

    let condition = match request.condition_code.as_deref() {
        Some(code) => Some(known_condition(ambulance, code)?),
        None => None,
    };

    let duration = request
        .estimated_duration_minutes
        .filter(|minutes| *minutes > 0)
        .unwrap_or_else(|| default_duration(condition));
    ensure_duration_in_range(duration)?;

    let mut builder = WaitingListEntry::builder()
        .id(id)
        .patient_id(request.patient_id)
        .waiting_since(request.waiting_since.unwrap_or_else(Utc::now))
        .estimated_duration_minutes(duration);
    if let Some(name) = request.name {
        builder = builder.name(name);
    }
    if let Some(code) = request.condition_code {
        builder = builder.condition_code(code);
    }

    builder
        .build()
        .map_err(|e| ApiError::bad_request("Invalid request body", e))
}

/// Applies the fields present in `update` to the entry at `index`
fn apply_update(
    ambulance: &mut Ambulance,
    index: usize,
    update: WaitingListEntryUpdate,
) -> Result<(), ApiError> {
    let entry_id = ambulance.waiting_list[index].id.clone();

    if let Some(patient_id) = &update.patient_id {
        if patient_id.trim().is_empty() {
            return Err(ApiError::bad_request(
                "Invalid request body",
                "patientId cannot be empty",
            ));
        }
        ensure_patient_not_waiting(ambulance, patient_id, Some(&entry_id))?;
    }
    if let Some(code) = update.condition_code.as_deref() {
        known_condition(ambulance, code)?;
    }
    if let Some(minutes) = update.estimated_duration_minutes {
        ensure_duration_in_range(minutes)?;
    }

    let entry = &mut ambulance.waiting_list[index];
    if let Some(patient_id) = update.patient_id {
        entry.patient_id = patient_id;
    }
    if let Some(name) = update.name {
        entry.name = Some(name);
    }
    if let Some(waiting_since) = update.waiting_since {
        entry.waiting_since = waiting_since;
    }
    if let Some(minutes) = update.estimated_duration_minutes.filter(|m| *m > 0) {
        entry.estimated_duration_minutes = minutes;
    }
    if let Some(code) = update.condition_code {
        entry.condition_code = Some(code);
    }
    Ok(())
}

/// Looks up an entry of a mutated ambulance after reconciliation
fn reconciled_entry(ambulance: Ambulance, entry_id: &str) -> Result<WaitingListEntry, ApiError> {
    ambulance
        .waiting_list
        .into_iter()
        .find(|e| e.id == entry_id)
        .ok_or_else(|| entry_not_found(entry_id))
}

#[utoipa::path(
    get,
    path = "/api/waiting-list/{ambulanceId}/entries",
    tag = "waiting-list",
    params(("ambulanceId" = String, Path, description = "Ambulance identifier")),
    responses(
        (status = 200, description = "Entries ordered by arrival", body = [WaitingListEntry]),
        (status = 404, description = "Ambulance not found", body = ErrorBody),
        (status = 502, description = "Database failure", body = ErrorBody)
    )
)]
/// Provides the ambulance waiting list
pub async fn get_waiting_list_entries(
    State(state): State<AppState>,
    Path(ambulance_id): Path<String>,
) -> Result<Json<Vec<WaitingListEntry>>, ApiError> {
    let ambulance = load_ambulance(&state, &ambulance_id).await?;
    Ok(Json(ambulance.waiting_list))
}

#[utoipa::path(
    post,
    path = "/api/waiting-list/{ambulanceId}/entries",
    tag = "waiting-list",
    params(("ambulanceId" = String, Path, description = "Ambulance identifier")),
    request_body = NewWaitingListEntry,
    responses(
        (status = 201, description = "Entry added", body = WaitingListEntry),
        (status = 400, description = "Invalid entry", body = ErrorBody),
        (status = 404, description = "Ambulance not found", body = ErrorBody),
        (status = 409, description = "Entry or patient already waiting", body = ErrorBody),
        (status = 502, description = "Database failure", body = ErrorBody)
    )
)]
/// Adds a patient to the waiting list
pub async fn create_waiting_list_entry(
    State(state): State<AppState>,
    Path(ambulance_id): Path<String>,
    payload: Result<Json<NewWaitingListEntry>, JsonRejection>,
) -> Result<(StatusCode, Json<WaitingListEntry>), ApiError> {
    let Json(request) = payload.map_err(ApiError::invalid_body)?;

    let (ambulance, entry_id) = update_ambulance_with(&state, &ambulance_id, |ambulance| {
        let entry = new_entry(ambulance, request)?;
        let entry_id = entry.id.clone();
        ambulance.waiting_list.push(entry);
        Ok(entry_id)
    })
    .await?;

    tracing::info!(%ambulance_id, %entry_id, "Waiting list entry created");
    let entry = reconciled_entry(ambulance, &entry_id)?;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[utoipa::path(
    get,
    path = "/api/waiting-list/{ambulanceId}/entries/{entryId}",
    tag = "waiting-list",
    params(
        ("ambulanceId" = String, Path, description = "Ambulance identifier"),
        ("entryId" = String, Path, description = "Waiting list entry identifier")
    ),
    responses(
        (status = 200, description = "The entry", body = WaitingListEntry),
        (status = 404, description = "Ambulance or entry not found", body = ErrorBody),
        (status = 502, description = "Database failure", body = ErrorBody)
    )
)]
/// Provides details about a waiting list entry
pub async fn get_waiting_list_entry(
    State(state): State<AppState>,
    Path((ambulance_id, entry_id)): Path<(String, String)>,
) -> Result<Json<WaitingListEntry>, ApiError> {
    let ambulance = load_ambulance(&state, &ambulance_id).await?;
    ambulance
        .find_entry(&entry_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| entry_not_found(&entry_id))
}

#[utoipa::path(
    put,
    path = "/api/waiting-list/{ambulanceId}/entries/{entryId}",
    tag = "waiting-list",
    params(
        ("ambulanceId" = String, Path, description = "Ambulance identifier"),
        ("entryId" = String, Path, description = "Waiting list entry identifier")
    ),
    request_body = WaitingListEntryUpdate,
    responses(
        (status = 200, description = "Entry updated", body = WaitingListEntry),
        (status = 400, description = "Invalid update", body = ErrorBody),
        (status = 404, description = "Ambulance or entry not found", body = ErrorBody),
        (status = 409, description = "Patient already waiting", body = ErrorBody),
        (status = 502, description = "Database failure", body = ErrorBody)
    )
)]
/// Updates a waiting list entry
pub async fn update_waiting_list_entry(
    State(state): State<AppState>,
    Path((ambulance_id, entry_id)): Path<(String, String)>,
    payload: Result<Json<WaitingListEntryUpdate>, JsonRejection>,
) -> Result<Json<WaitingListEntry>, ApiError> {
    let Json(update) = payload.map_err(ApiError::invalid_body)?;

    if let Some(body_id) = update.id.as_deref().filter(|id| !id.is_empty()) {
        if body_id != entry_id {
            return Err(ApiError::bad_request(
                "Entry id mismatch",
                format!("body id '{body_id}' does not match path id '{entry_id}'"),
            ));
        }
    }

    let (ambulance, ()) = update_ambulance_with(&state, &ambulance_id, |ambulance| {
        let index = ambulance
            .entry_index(&entry_id)
            .ok_or_else(|| entry_not_found(&entry_id))?;
        apply_update(ambulance, index, update)
    })
    .await?;

    tracing::info!(%ambulance_id, %entry_id, "Waiting list entry updated");
    Ok(Json(reconciled_entry(ambulance, &entry_id)?))
}

#[utoipa::path(
    delete,
    path = "/api/waiting-list/{ambulanceId}/entries/{entryId}",
    tag = "waiting-list",
    params(
        ("ambulanceId" = String, Path, description = "Ambulance identifier"),
        ("entryId" = String, Path, description = "Waiting list entry identifier")
    ),
    responses(
        (status = 204, description = "Entry removed"),
        (status = 404, description = "Ambulance or entry not found", body = ErrorBody),
        (status = 502, description = "Database failure", body = ErrorBody)
    )
)]
/// Removes a patient from the waiting list
pub async fn delete_waiting_list_entry(
    State(state): State<AppState>,
    Path((ambulance_id, entry_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    update_ambulance_with(&state, &ambulance_id, |ambulance| {
        let index = ambulance
            .entry_index(&entry_id)
            .ok_or_else(|| entry_not_found(&entry_id))?;
        ambulance.waiting_list.remove(index);
        Ok(())
    })
    .await?;

    tracing::info!(%ambulance_id, %entry_id, "Waiting list entry deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/waiting-list/{ambulanceId}/condition",
    tag = "waiting-list",
    params(("ambulanceId" = String, Path, description = "Ambulance identifier")),
    responses(
        (status = 200, description = "Predefined conditions", body = [Condition]),
        (status = 404, description = "Ambulance not found", body = ErrorBody),
        (status = 502, description = "Database failure", body = ErrorBody)
    )
)]
/// Provides the list of conditions associated with the ambulance
pub async fn get_conditions(
    State(state): State<AppState>,
    Path(ambulance_id): Path<String>,
) -> Result<Json<Vec<Condition>>, ApiError> {
    let ambulance = load_ambulance(&state, &ambulance_id).await?;
    Ok(Json(ambulance.predefined_conditions))
}
