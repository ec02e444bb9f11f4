//! Waiting list entry model
//!
//! This module defines a single patient's place in an ambulance waiting list.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A patient waiting at an ambulance
///
/// `estimated_start` is owned by the reconciliation engine; every other field
/// is set by the API layer when the entry is created or updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WaitingListEntry {
    /// Entry identifier, unique within one waiting list
    pub id: String,

    /// Patient display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Patient identifier
    pub patient_id: String,

    /// When the patient joined the queue
    pub waiting_since: DateTime<Utc>,

    /// When the patient is expected to be seen
    pub estimated_start: DateTime<Utc>,

    /// Expected treatment duration in minutes
    pub estimated_duration_minutes: u32,

    /// Code of one of the ambulance's predefined conditions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_code: Option<String>,
}

impl WaitingListEntry {
    /// Returns a builder for constructing an entry
    pub fn builder() -> WaitingListEntryBuilder {
        WaitingListEntryBuilder::default()
    }

    /// Expected treatment duration
    pub fn estimated_duration(&self) -> Duration {
        Duration::minutes(i64::from(self.estimated_duration_minutes))
    }

    /// When treatment is expected to finish
    ///
    /// `None` if the end lies beyond the representable date range.
    pub fn estimated_end(&self) -> Option<DateTime<Utc>> {
        self.estimated_start
            .checked_add_signed(self.estimated_duration())
    }
}

/// Builder for constructing waiting list entries
#[derive(Debug, Default)]
pub struct WaitingListEntryBuilder {
    id: Option<String>,
    name: Option<String>,
    patient_id: Option<String>,
    waiting_since: Option<DateTime<Utc>>,
    estimated_start: Option<DateTime<Utc>>,
    estimated_duration_minutes: u32,
    condition_code: Option<String>,
}

impl WaitingListEntryBuilder {
    /// Creates a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the entry ID
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the patient name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the patient ID
    pub fn patient_id(mut self, patient_id: impl Into<String>) -> Self {
        self.patient_id = Some(patient_id.into());
        self
    }

    /// Sets the time the patient joined the queue
    pub fn waiting_since(mut self, waiting_since: DateTime<Utc>) -> Self {
        self.waiting_since = Some(waiting_since);
        self
    }

    /// Sets a previously computed estimated start
    pub fn estimated_start(mut self, estimated_start: DateTime<Utc>) -> Self {
        self.estimated_start = Some(estimated_start);
        self
    }

    /// Sets the expected treatment duration
    pub fn estimated_duration_minutes(mut self, minutes: u32) -> Self {
        self.estimated_duration_minutes = minutes;
        self
    }

    /// Sets the condition code
    pub fn condition_code(mut self, code: impl Into<String>) -> Self {
        self.condition_code = Some(code.into());
        self
    }

    /// Builds the entry
    ///
    /// A missing ID is generated; a missing `waiting_since` defaults to now and a
    /// missing `estimated_start` to `waiting_since`.
    ///
    /// # Errors
    ///
    /// Returns an error if no patient ID was given.
    pub fn build(self) -> Result<WaitingListEntry, String> {
        let patient_id = self
            .patient_id
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| "patient_id is required".to_string())?;
        let waiting_since = self.waiting_since.unwrap_or_else(Utc::now);

        Ok(WaitingListEntry {
            id: self
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            name: self.name,
            patient_id,
            waiting_since,
            estimated_start: self.estimated_start.unwrap_or(waiting_since),
            estimated_duration_minutes: self.estimated_duration_minutes,
            condition_code: self.condition_code,
        })
    }
}
