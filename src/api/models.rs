//! Request and response bodies that are not domain entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Minutes assumed for an entry whose condition has no typical duration
pub const DEFAULT_ESTIMATED_DURATION_MINUTES: u32 = 15;

/// Longest accepted treatment duration, one day
pub const MAX_ESTIMATED_DURATION_MINUTES: u32 = 24 * 60;

/// Body of `POST /api/waiting-list/{ambulanceId}/entries`
///
/// Missing `id` and `waitingSince` are generated; a missing or zero
/// `estimatedDurationMinutes` is taken from the condition.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewWaitingListEntry {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub patient_id: String,

    #[serde(default)]
    pub waiting_since: Option<DateTime<Utc>>,

    #[serde(default)]
    pub estimated_duration_minutes: Option<u32>,

    #[serde(default)]
    pub condition_code: Option<String>,
}

/// Body of `PUT /api/waiting-list/{ambulanceId}/entries/{entryId}`
///
/// Only the fields present are changed. `id`, when given, must equal the
/// entry id in the path.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WaitingListEntryUpdate {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub patient_id: Option<String>,

    #[serde(default)]
    pub waiting_since: Option<DateTime<Utc>>,

    #[serde(default)]
    pub estimated_duration_minutes: Option<u32>,

    #[serde(default)]
    pub condition_code: Option<String>,
}

/// Body of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub collection: String,
}
