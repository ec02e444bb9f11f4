//! Waiting list reconciliation
//!
//! Recomputes `estimated_start` for every entry of one ambulance's waiting list
//! in a single pass over the entries in arrival order:
//!
//! - the earliest entry starts at the latest of its previous estimate, its
//!   arrival and the current time, so an estimate never moves backwards and
//!   never lies in the past;
//! - every following entry starts when the previous one is expected to
//!   finish, or at its own arrival if that is later.
//!
//! Opening hours and availability windows are not taken into account.

use crate::domain::{ReconcileError, WaitingListEntry};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// Arrival order with a deterministic tie-break on entry ID, then patient ID
fn arrival_order(left: &WaitingListEntry, right: &WaitingListEntry) -> Ordering {
    left.waiting_since
        .cmp(&right.waiting_since)
        .then_with(|| left.id.cmp(&right.id))
        .then_with(|| left.patient_id.cmp(&right.patient_id))
}

fn end_of(entry: &WaitingListEntry) -> Result<DateTime<Utc>, ReconcileError> {
    entry.estimated_end().ok_or_else(|| {
        ReconcileError::ScheduleOverflow(format!(
            "entry '{}' would end after the latest representable time",
            entry.id
        ))
    })
}

/// Recompute estimated start times of a waiting list in place
///
/// Sorts `entries` ascending by `waiting_since` and rewrites each
/// `estimated_start`. Arrival times, durations and membership are left
/// unchanged and no I/O is performed.
///
/// After a successful call:
/// - entries are ordered ascending by `waiting_since`;
/// - every `estimated_start >= waiting_since`;
/// - the first `estimated_start >= now`;
/// - every later `estimated_start >= previous.estimated_start + previous duration`.
///
/// # Arguments
///
/// * `entries` - All entries of a single ambulance's waiting list
/// * `now` - Current time the schedule is anchored to
///
/// # Errors
///
/// Returns [`ReconcileError::InvalidState`] if `entries` is empty. Callers
/// are expected to check for emptiness first. Returns
/// [`ReconcileError::ScheduleOverflow`] if the schedule runs past the
/// representable date range; `entries` may then be partly rewritten.
///
/// # Examples
///
/// ```
/// use ambulance_wl::core::reconcile::reconcile_waiting_list;
/// use ambulance_wl::domain::WaitingListEntry;
/// use chrono::{Duration, TimeZone, Utc};
///
/// let t0 = Utc.with_ymd_and_hms(2025, 1, 6, 8, 0, 0).unwrap();
/// let mut entries = vec![
///     WaitingListEntry::builder().id("b").patient_id("p2")
///         .waiting_since(t0 + Duration::minutes(5)).estimated_duration_minutes(20)
///         .build().unwrap(),
///     WaitingListEntry::builder().id("a").patient_id("p1")
///         .waiting_since(t0).estimated_duration_minutes(30)
///         .build().unwrap(),
/// ];
///
/// reconcile_waiting_list(&mut entries, t0).unwrap();
///
/// assert_eq!(entries[0].id, "a");
/// assert_eq!(entries[0].estimated_start, t0);
/// assert_eq!(entries[1].estimated_start, t0 + Duration::minutes(30));
/// ```
pub fn reconcile_waiting_list(
    entries: &mut [WaitingListEntry],
    now: DateTime<Utc>,
) -> Result<(), ReconcileError> {
    if entries.is_empty() {
        return Err(ReconcileError::InvalidState(
            "cannot reconcile an empty waiting list".to_string(),
        ));
    }

    // Stable sort; equal arrivals are ordered by the secondary keys.
    entries.sort_by(arrival_order);

    let (first, rest) = entries.split_first_mut().ok_or_else(|| {
        ReconcileError::InvalidState("waiting list emptied during reconciliation".to_string())
    })?;

    first.estimated_start = first.estimated_start.max(first.waiting_since).max(now);
    let mut next_start = end_of(first)?;

    for entry in rest {
        entry.estimated_start = next_start.max(entry.waiting_since);
        next_start = end_of(entry)?;
    }

    tracing::debug!(
        entries = entries.len(),
        first_start = %entries[0].estimated_start,
        "Waiting list reconciled"
    );

    Ok(())
}
