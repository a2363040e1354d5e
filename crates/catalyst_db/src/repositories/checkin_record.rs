//! Repository for check-in records
//!
//! One record per (user, event) pair, enforced by a unique constraint. The
//! record holds the issued token and flips to checked-in exactly once.

use crate::error::DbError;
use chrono::{DateTime, Utc};

pub use catalyst_common::models::CheckinRecord;

pub trait CheckinRecordRepository {
    /// Create the `checkin_records` table and its token index if they do not exist.
    fn init_schema(&self) -> impl std::future::Future<Output = Result<(), DbError>> + Send;

    /// Persist a freshly issued record.
    ///
    /// # Errors
    ///
    /// [`DbError::UniqueViolation`] when a record for the same user and event
    /// already exists.
    fn insert(
        &self,
        record: CheckinRecord,
    ) -> impl std::future::Future<Output = Result<CheckinRecord, DbError>> + Send;

    fn find_by_id(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Option<CheckinRecord>, DbError>> + Send;

    /// The record for a (user, event) pair, if one has been issued.
    fn find_by_user_and_event(
        &self,
        user_id: &str,
        event_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<CheckinRecord>, DbError>> + Send;

    /// The record matching all three of token, user and event.
    fn find_by_token(
        &self,
        token: &str,
        user_id: &str,
        event_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<CheckinRecord>, DbError>> + Send;

    /// Every record issued for an event, oldest first.
    fn find_by_event(
        &self,
        event_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<CheckinRecord>, DbError>> + Send;

    /// Mark a record as checked in, only if it is not already.
    ///
    /// Returns `true` when this call performed the transition and `false` when
    /// the record was missing or another caller got there first.
    fn mark_checked_in(
        &self,
        id: &str,
        checked_in_at: DateTime<Utc>,
        checked_in_by: &str,
    ) -> impl std::future::Future<Output = Result<bool, DbError>> + Send;
}
