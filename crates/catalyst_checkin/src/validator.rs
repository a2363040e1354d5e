//! Scan validation.
//!
//! A record moves from issued to used exactly once. The transition is a
//! conditional update in storage, so concurrent scans of the same token yield
//! one success and `AlreadyCheckedIn` for everyone else.

use crate::codec::{self, CodecError, ParticipantSnapshot};
use crate::error::CheckinError;
use crate::models::{AttendanceSummary, CheckinSuccess, EventSummary};
use crate::service::CheckinService;
use catalyst_common::models::{Caller, Event};
use catalyst_db::{CheckinRecordRepository, EventRepository, RegistrationRepository};
use tracing::{debug, error, info, warn};

impl CheckinService {
    /// Validate a scanned token on behalf of `caller` and mark it used.
    pub async fn validate(
        &self,
        caller: &Caller,
        scanned: &str,
    ) -> Result<CheckinSuccess, CheckinError> {
        let token = scanned.trim();
        if token.is_empty() {
            return Err(CheckinError::InvalidRequest("qr_token is required".to_string()));
        }

        let payload = match &self.settings.signer {
            Some(signer) => signer.verify(token).map_err(|e| {
                debug!("Rejected token signature: {}", e);
                CheckinError::InvalidTokenSignature
            })?,
            None => token,
        };

        let claim = codec::decode(payload).map_err(|e| match e {
            CodecError::Structure(msg) => CheckinError::InvalidTokenStructure(msg),
            other => CheckinError::InvalidTokenFormat(other.to_string()),
        })?;

        // Cheap pre-check against the embedded event end, before any lookup.
        let now = self.now();
        if claim.is_expired_at(now) {
            debug!("Token for event {} is past its exp", claim.event_id);
            return Err(CheckinError::TokenExpired);
        }

        let record = self
            .repos
            .checkins
            .find_by_token(token, &claim.user_id, &claim.event_id)
            .await?
            .ok_or(CheckinError::RecordNotFound)?;

        let event = self.managed_event(caller, &record.event_id).await?;

        if record.is_checked_in {
            return Err(CheckinError::AlreadyCheckedIn {
                checked_in_at: record.checked_in_at,
                participant: Box::new(claim.participant),
            });
        }

        if now > record.expires_at {
            debug!("Check-in record {} expired at {}", record.id, record.expires_at);
            return Err(CheckinError::TokenExpired);
        }

        let registration = self
            .repos
            .registrations
            .find_by_id(&record.registration_id)
            .await?
            .ok_or(CheckinError::RegistrationNotFound)?;

        let marked = self
            .repos
            .checkins
            .mark_checked_in(&record.id, now, &caller.id)
            .await
            .map_err(|e| {
                error!("Failed to mark check-in record {}: {}", record.id, e);
                CheckinError::UpdateFailed(e.to_string())
            })?;

        if !marked {
            // Another scan won the conditional update.
            let current = self.repos.checkins.find_by_id(&record.id).await?;
            return match current {
                Some(current) if current.is_checked_in => {
                    warn!("Lost check-in race for record {}", record.id);
                    Err(CheckinError::AlreadyCheckedIn {
                        checked_in_at: current.checked_in_at,
                        participant: Box::new(claim.participant),
                    })
                }
                _ => Err(CheckinError::UpdateFailed(format!(
                    "check-in record {} was not updated",
                    record.id
                ))),
            };
        }

        info!(
            "Checked in user {} for event {} (by {})",
            record.user_id, event.id, caller.id
        );

        Ok(CheckinSuccess {
            participant: ParticipantSnapshot::from(&registration),
            event: EventSummary {
                title: event.title,
                start_time: event.start_time,
            },
            checked_in_at: now,
        })
    }

    /// Issued and checked-in records for an event the caller manages.
    pub async fn attendance(
        &self,
        caller: &Caller,
        event_id: &str,
    ) -> Result<AttendanceSummary, CheckinError> {
        let event_id = event_id.trim();
        if event_id.is_empty() {
            return Err(CheckinError::InvalidRequest("event_id is required".to_string()));
        }

        let event = self.managed_event(caller, event_id).await?;
        let records = self.repos.checkins.find_by_event(&event.id).await?;
        Ok(AttendanceSummary::from_records(&event.id, &records))
    }

    async fn managed_event(&self, caller: &Caller, event_id: &str) -> Result<Event, CheckinError> {
        let event = self
            .repos
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(CheckinError::EventNotFound)?;

        if !caller.can_manage(&event) {
            warn!(
                "User {} tried to manage check-ins for event {} without rights",
                caller.id, event.id
            );
            return Err(CheckinError::NotAuthorized);
        }
        Ok(event)
    }
}
