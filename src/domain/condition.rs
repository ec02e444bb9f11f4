//! Condition definitions
//!
//! A condition is one of the reasons a patient may be waiting at an ambulance.
//! Each ambulance keeps its own list of predefined conditions; waiting list
//! entries refer to them by code.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Predefined condition of an ambulance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Code referenced by waiting list entries
    pub code: String,

    /// Display name
    pub value: String,

    /// Link to further information about the condition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    /// Typical treatment duration, used when an entry gives none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typical_duration_minutes: Option<u32>,
}

impl Condition {
    /// Creates a condition with a code and display name
    pub fn new(code: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            value: value.into(),
            reference: None,
            typical_duration_minutes: None,
        }
    }

    /// Sets the typical duration hint
    pub fn with_typical_duration(mut self, minutes: u32) -> Self {
        self.typical_duration_minutes = Some(minutes);
        self
    }

    /// Sets the reference link
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}
