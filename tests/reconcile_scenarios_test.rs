//! Waiting list reconciliation scenarios through the public API

use ambulance_wl::core::reconcile::reconcile_waiting_list;
use ambulance_wl::domain::{Ambulance, ReconcileError, WaitingListEntry};
use chrono::{DateTime, Duration, TimeZone, Utc};

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, hour, minute, 0).unwrap()
}

fn entry(id: &str, since: DateTime<Utc>, duration: u32) -> WaitingListEntry {
    WaitingListEntry::builder()
        .id(id)
        .patient_id(format!("patient-{id}"))
        .waiting_since(since)
        .estimated_duration_minutes(duration)
        .build()
        .unwrap()
}

fn assert_schedule_invariants(entries: &[WaitingListEntry], now: DateTime<Utc>) {
    assert!(entries[0].estimated_start >= now);
    for pair in entries.windows(2) {
        assert!(pair[0].waiting_since <= pair[1].waiting_since);
        assert!(pair[1].estimated_start >= pair[0].estimated_end().unwrap());
    }
    for e in entries {
        assert!(e.estimated_start >= e.waiting_since);
    }
}

#[test]
fn test_morning_queue_is_scheduled_back_to_back() {
    let now = at(8, 30);
    let mut entries = vec![
        entry("c", at(8, 20), 10),
        entry("a", at(8, 0), 15),
        entry("b", at(8, 10), 30),
    ];

    reconcile_waiting_list(&mut entries, now).unwrap();

    let ids: Vec<_> = entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, ["a", "b", "c"]);
    assert_eq!(entries[0].estimated_start, at(8, 30));
    assert_eq!(entries[1].estimated_start, at(8, 45));
    assert_eq!(entries[2].estimated_start, at(9, 15));
    assert_schedule_invariants(&entries, now);
}

#[test]
fn test_late_arrival_leaves_gap() {
    let now = at(8, 0);
    let mut entries = vec![entry("a", at(8, 0), 10), entry("b", at(9, 0), 10)];

    reconcile_waiting_list(&mut entries, now).unwrap();

    assert_eq!(entries[0].estimated_start, at(8, 0));
    assert_eq!(entries[1].estimated_start, at(9, 0));
}

#[test]
fn test_first_entry_never_moves_earlier() {
    let now = at(8, 0);
    let mut first = entry("a", at(7, 50), 20);
    first.estimated_start = at(8, 40);
    let mut entries = vec![first, entry("b", at(7, 55), 5)];

    reconcile_waiting_list(&mut entries, now).unwrap();

    assert_eq!(entries[0].estimated_start, at(8, 40));
    assert_eq!(entries[1].estimated_start, at(9, 0));
}

#[test]
fn test_removing_head_keeps_remaining_estimates() {
    let now = at(10, 0);
    let mut ambulance = Ambulance::new("Internal medicine", "12");
    ambulance.waiting_list = vec![
        entry("a", at(9, 40), 30),
        entry("b", at(9, 45), 15),
        entry("c", at(9, 50), 15),
    ];
    ambulance.reconcile_waiting_list(now).unwrap();
    assert_eq!(ambulance.waiting_list[2].estimated_start, at(10, 45));

    ambulance.waiting_list.remove(0);
    ambulance.reconcile_waiting_list(now).unwrap();

    // "b" had an estimate of 10:30 which is kept since it is the new head
    assert_eq!(ambulance.waiting_list[0].estimated_start, at(10, 30));
    assert_eq!(ambulance.waiting_list[1].estimated_start, at(10, 45));
}

#[test]
fn test_reconcile_is_idempotent_for_fixed_now() {
    let now = at(12, 0);
    let mut entries = vec![
        entry("a", at(11, 0), 25),
        entry("b", at(11, 30), 5),
        entry("c", at(12, 30), 45),
    ];

    reconcile_waiting_list(&mut entries, now).unwrap();
    let first_pass = entries.clone();
    reconcile_waiting_list(&mut entries, now).unwrap();

    assert_eq!(entries, first_pass);
}

#[test]
fn test_empty_list_handling() {
    let mut entries: Vec<WaitingListEntry> = Vec::new();
    let err = reconcile_waiting_list(&mut entries, at(8, 0)).unwrap_err();
    assert!(matches!(err, ReconcileError::InvalidState(_)));

    let mut ambulance = Ambulance::new("Surgery", "3");
    assert!(ambulance.reconcile_waiting_list(at(8, 0)).is_ok());
}

#[test]
fn test_zero_duration_entries_share_start() {
    let now = at(8, 0);
    let mut entries = vec![entry("a", at(7, 0), 0), entry("b", at(7, 1), 0)];

    reconcile_waiting_list(&mut entries, now).unwrap();

    assert_eq!(entries[0].estimated_start, now);
    assert_eq!(entries[1].estimated_start, now);
    assert_eq!(entries[1].estimated_end(), Some(now + Duration::zero()));
}
