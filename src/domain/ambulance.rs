//! Ambulance aggregate
//!
//! An ambulance (clinic room) is persisted as a single document embedding its
//! waiting list and its predefined conditions.

use super::condition::Condition;
use super::errors::ReconcileError;
use super::waiting_list::WaitingListEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Ambulance aggregate root
///
/// # Examples
///
/// ```
/// use ambulance_wl::domain::Ambulance;
///
/// let ambulance = Ambulance::new("Dr. House's office", "356 - 3.posch");
/// assert!(!ambulance.id.is_empty());
/// assert!(ambulance.waiting_list.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ambulance {
    /// Document identity
    #[serde(default)]
    pub id: String,

    /// Display name
    pub name: String,

    /// Room the ambulance is located in
    pub room_number: String,

    /// Patients waiting, ascending by `waiting_since` after reconciliation
    #[serde(default)]
    pub waiting_list: Vec<WaitingListEntry>,

    /// Conditions patients of this ambulance may be waiting with
    #[serde(default)]
    pub predefined_conditions: Vec<Condition>,
}

impl Ambulance {
    /// Creates an empty ambulance with a generated ID
    pub fn new(name: impl Into<String>, room_number: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            room_number: room_number.into(),
            waiting_list: Vec::new(),
            predefined_conditions: Vec::new(),
        }
    }

    /// Generates an ID if the ambulance has none, returning the ID in use
    pub fn ensure_id(&mut self) -> &str {
        if self.id.trim().is_empty() {
            self.id = uuid::Uuid::new_v4().to_string();
        }
        &self.id
    }

    /// Looks up a waiting list entry by ID
    pub fn find_entry(&self, entry_id: &str) -> Option<&WaitingListEntry> {
        self.waiting_list.iter().find(|e| e.id == entry_id)
    }

    /// Position of a waiting list entry
    pub fn entry_index(&self, entry_id: &str) -> Option<usize> {
        self.waiting_list.iter().position(|e| e.id == entry_id)
    }

    /// Whether the patient already has a place in the waiting list
    pub fn has_patient(&self, patient_id: &str) -> bool {
        self.waiting_list.iter().any(|e| e.patient_id == patient_id)
    }

    /// Looks up a predefined condition by code
    pub fn condition(&self, code: &str) -> Option<&Condition> {
        self.predefined_conditions.iter().find(|c| c.code == code)
    }

    /// Recomputes estimated start times after a waiting list mutation
    ///
    /// Guards the engine's non-empty precondition: an empty list has nothing
    /// to schedule and is left untouched.
    pub fn reconcile_waiting_list(&mut self, now: DateTime<Utc>) -> Result<(), ReconcileError> {
        if self.waiting_list.is_empty() {
            return Ok(());
        }
        crate::core::reconcile::reconcile_waiting_list(&mut self.waiting_list, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_id_generates_when_empty() {
        let mut ambulance = Ambulance::new("Room", "101");
        ambulance.id = String::new();
        let id = ambulance.ensure_id().to_string();
        assert!(uuid::Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn test_ensure_id_keeps_existing() {
        let mut ambulance = Ambulance::new("Room", "101");
        ambulance.id = "bobulova".to_string();
        assert_eq!(ambulance.ensure_id(), "bobulova");
    }

    #[test]
    fn test_reconcile_empty_list_is_noop() {
        let mut ambulance = Ambulance::new("Room", "101");
        assert!(ambulance.reconcile_waiting_list(Utc::now()).is_ok());
        assert!(ambulance.waiting_list.is_empty());
    }

    #[test]
    fn test_deserialize_without_collections() {
        let json = r#"{"id":"a1","name":"Room","roomNumber":"101"}"#;
        let ambulance: Ambulance = serde_json::from_str(json).unwrap();
        assert_eq!(ambulance.room_number, "101");
        assert!(ambulance.waiting_list.is_empty());
        assert!(ambulance.predefined_conditions.is_empty());
    }

    #[test]
    fn test_condition_lookup() {
        let mut ambulance = Ambulance::new("Room", "101");
        ambulance
            .predefined_conditions
            .push(Condition::new("fever", "Horúčka").with_typical_duration(20));
        assert_eq!(
            ambulance.condition("fever").and_then(|c| c.typical_duration_minutes),
            Some(20)
        );
        assert!(ambulance.condition("unknown").is_none());
    }
}
