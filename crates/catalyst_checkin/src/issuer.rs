//! Token issuance.

use crate::codec::{self, iso_millis, Claim, EventSnapshot, ParticipantSnapshot};
use crate::error::CheckinError;
use crate::service::CheckinService;
use crate::verifier::verify_registration;
use catalyst_common::models::CheckinRecord;
use catalyst_db::{CheckinRecordRepository, DbError, EventRepository};
use tracing::{debug, info, warn};
use uuid::Uuid;

impl CheckinService {
    /// Issue the check-in token for `user_id` on `event_id`.
    ///
    /// Idempotent per (user, event): a second call returns the stored record
    /// unchanged, whatever its state.
    pub async fn issue(
        &self,
        user_id: &str,
        event_id: &str,
        registration_id: &str,
    ) -> Result<CheckinRecord, CheckinError> {
        let event_id = event_id.trim();
        let registration_id = registration_id.trim();
        if event_id.is_empty() {
            return Err(CheckinError::InvalidRequest("event_id is required".to_string()));
        }
        if registration_id.is_empty() {
            return Err(CheckinError::InvalidRequest(
                "registration_id is required".to_string(),
            ));
        }

        let registration = verify_registration(
            &self.repos.registrations,
            user_id,
            event_id,
            registration_id,
            self.settings.reject_cancelled_registrations,
        )
        .await?;

        if let Some(existing) = self
            .repos
            .checkins
            .find_by_user_and_event(user_id, event_id)
            .await?
        {
            debug!(
                "Returning existing check-in record {} for user {} on event {}",
                existing.id, user_id, event_id
            );
            return Ok(existing);
        }

        let event = self
            .repos
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(CheckinError::EventNotFound)?;

        let now = self.now();
        let claim = Claim {
            user_id: user_id.to_string(),
            event_id: event.id.clone(),
            registration_id: registration.id.clone(),
            issued_at: Some(iso_millis(&now)),
            exp: event.end_time.timestamp_millis(),
            participant: ParticipantSnapshot::from(&registration),
            event: EventSnapshot::from(&event),
        };

        let payload = codec::encode(&claim)
            .map_err(|e| CheckinError::TokenEncoding(e.to_string()))?;
        let token = match &self.settings.signer {
            Some(signer) => signer
                .sign(&payload)
                .map_err(|e| CheckinError::TokenEncoding(e.to_string()))?,
            None => payload,
        };

        let record = CheckinRecord {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            event_id: event.id.clone(),
            registration_id: registration.id.clone(),
            token,
            issued_at: now,
            expires_at: event.end_time + self.settings.grace_window,
            is_checked_in: false,
            checked_in_at: None,
            checked_in_by: None,
        };

        match self.repos.checkins.insert(record).await {
            Ok(stored) => {
                info!(
                    "Issued check-in token {} for user {} on event {}",
                    stored.id, user_id, event_id
                );
                Ok(stored)
            }
            Err(DbError::UniqueViolation(_)) => {
                warn!(
                    "Concurrent issuance detected for user {} on event {}",
                    user_id, event_id
                );
                Err(CheckinError::IssuanceConflict)
            }
            Err(e) => Err(CheckinError::Storage(e)),
        }
    }

    /// The caller's existing record for `event_id`, without issuing one.
    pub async fn ticket(&self, user_id: &str, event_id: &str) -> Result<CheckinRecord, CheckinError> {
        if event_id.trim().is_empty() {
            return Err(CheckinError::InvalidRequest("event_id is required".to_string()));
        }

        self.repos
            .checkins
            .find_by_user_and_event(user_id, event_id.trim())
            .await?
            .ok_or(CheckinError::RecordNotFound)
    }
}
