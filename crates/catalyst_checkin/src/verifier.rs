//! Registration verification.

use crate::error::CheckinError;
use catalyst_common::models::{Registration, RegistrationStatus};
use catalyst_db::RegistrationRepository;
use tracing::debug;

/// Load `registration_id` and confirm it belongs to `user_id` for `event_id`.
///
/// Ownership or event mismatches are reported as [`CheckinError::RegistrationNotFound`]
/// so callers cannot probe other users' registrations. Cancelled registrations are
/// refused the same way when `reject_cancelled` is set.
pub async fn verify_registration<R>(
    registrations: &R,
    user_id: &str,
    event_id: &str,
    registration_id: &str,
    reject_cancelled: bool,
) -> Result<Registration, CheckinError>
where
    R: RegistrationRepository + Sync,
{
    let registration = registrations
        .find_by_id(registration_id)
        .await?
        .ok_or(CheckinError::RegistrationNotFound)?;

    if registration.user_id != user_id || registration.event_id != event_id {
        debug!(
            "Registration {} does not belong to user {} on event {}",
            registration_id, user_id, event_id
        );
        return Err(CheckinError::RegistrationNotFound);
    }

    if reject_cancelled && registration.status == RegistrationStatus::Cancelled {
        debug!("Registration {} is cancelled", registration_id);
        return Err(CheckinError::RegistrationNotFound);
    }

    Ok(registration)
}
