//! Outcomes returned by the check-in service.

use crate::codec::ParticipantSnapshot;
use catalyst_common::models::CheckinRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Event fields echoed back to the scanner on success.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventSummary {
    pub title: String,
    pub start_time: DateTime<Utc>,
}

/// A successful check-in.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckinSuccess {
    /// Built from the live registration, not the token snapshot.
    pub participant: ParticipantSnapshot,
    pub event: EventSummary,
    pub checked_in_at: DateTime<Utc>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceEntry {
    pub user_id: String,
    pub registration_id: String,
    pub is_checked_in: bool,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub checked_in_by: Option<String>,
}

impl From<&CheckinRecord> for AttendanceEntry {
    fn from(record: &CheckinRecord) -> Self {
        Self {
            user_id: record.user_id.clone(),
            registration_id: record.registration_id.clone(),
            is_checked_in: record.is_checked_in,
            checked_in_at: record.checked_in_at,
            checked_in_by: record.checked_in_by.clone(),
        }
    }
}

/// Issued versus checked-in counts for one event.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceSummary {
    pub event_id: String,
    pub issued: usize,
    pub checked_in: usize,
    pub records: Vec<AttendanceEntry>,
}

impl AttendanceSummary {
    pub fn from_records(event_id: &str, records: &[CheckinRecord]) -> Self {
        let records: Vec<AttendanceEntry> = records.iter().map(AttendanceEntry::from).collect();
        Self {
            event_id: event_id.to_string(),
            issued: records.len(),
            checked_in: records.iter().filter(|r| r.is_checked_in).count(),
            records,
        }
    }
}
