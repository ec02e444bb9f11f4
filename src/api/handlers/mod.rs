//! Request handlers
//!
//! Waiting list mutations share [`update_ambulance_with`]: load the
//! ambulance, apply the change in memory, reconcile, replace the stored
//! document. Nothing serializes these cycles across requests, so two
//! concurrent changes to one ambulance can overwrite each other.

pub mod ambulances;
pub mod health;
pub mod waiting_list;

use super::error::ApiError;
use super::models::MAX_ESTIMATED_DURATION_MINUTES;
use super::state::AppState;
use crate::domain::Ambulance;
use chrono::Utc;

/// Rejects a treatment duration longer than one day
pub(crate) fn ensure_duration_in_range(minutes: u32) -> Result<(), ApiError> {
    if minutes > MAX_ESTIMATED_DURATION_MINUTES {
        return Err(ApiError::bad_request(
            "Invalid request body",
            format!(
                "duration of {minutes} minutes exceeds the maximum of {MAX_ESTIMATED_DURATION_MINUTES}"
            ),
        ));
    }
    Ok(())
}

/// Checks every duration a client can set on a whole ambulance document
pub(crate) fn validate_durations(ambulance: &Ambulance) -> Result<(), ApiError> {
    for entry in &ambulance.waiting_list {
        ensure_duration_in_range(entry.estimated_duration_minutes)?;
    }
    for condition in &ambulance.predefined_conditions {
        if let Some(minutes) = condition.typical_duration_minutes {
            ensure_duration_in_range(minutes)?;
        }
    }
    Ok(())
}

/// Runs load, mutate, reconcile and update for one ambulance
///
/// `mutate` may reject the change; the document is then left untouched.
///
/// # Errors
///
/// 404 if the ambulance does not exist, the error from `mutate`, or 502
/// when the store fails.
pub(crate) async fn update_ambulance_with<T, F>(
    state: &AppState,
    ambulance_id: &str,
    mutate: F,
) -> Result<(Ambulance, T), ApiError>
where
    F: FnOnce(&mut Ambulance) -> Result<T, ApiError>,
{
    let ctx = state.operation_context();

    let mut ambulance = state
        .store
        .find_document(&ctx, ambulance_id)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to load ambulance from database"))?;

    let outcome = mutate(&mut ambulance)?;

    ambulance.reconcile_waiting_list(Utc::now())?;

    state
        .store
        .update_document(&ctx, ambulance_id, &ambulance)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to update ambulance in database"))?;

    tracing::debug!(
        ambulance_id,
        entries = ambulance.waiting_list.len(),
        "Ambulance updated"
    );
    Ok((ambulance, outcome))
}

/// Loads one ambulance for a read-only handler
pub(crate) async fn load_ambulance(
    state: &AppState,
    ambulance_id: &str,
) -> Result<Ambulance, ApiError> {
    state
        .store
        .find_document(&state.operation_context(), ambulance_id)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to load ambulance from database"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Condition, WaitingListEntry};
    use axum::http::StatusCode;

    #[test]
    fn test_duration_bound_is_inclusive() {
        assert!(ensure_duration_in_range(MAX_ESTIMATED_DURATION_MINUTES).is_ok());
        let err = ensure_duration_in_range(MAX_ESTIMATED_DURATION_MINUTES + 1).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_validate_durations_checks_entries_and_conditions() {
        let mut ambulance = Ambulance::new("Room", "101");
        assert!(validate_durations(&ambulance).is_ok());

        ambulance
            .predefined_conditions
            .push(Condition::new("long", "Long").with_typical_duration(u32::MAX));
        assert!(validate_durations(&ambulance).is_err());

        ambulance.predefined_conditions.clear();
        ambulance.waiting_list.push(
            WaitingListEntry::builder()
                .patient_id("p1")
                .estimated_duration_minutes(u32::MAX)
                .build()
                .unwrap(),
        );
        assert!(validate_durations(&ambulance).is_err());
    }
}
