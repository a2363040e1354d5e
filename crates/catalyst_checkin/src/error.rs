//! Check-in error taxonomy.
//!
//! Every failure the issuer and validator can report is a [`CheckinError`].
//! None are retried internally; each maps to a stable `kind` string and an HTTP
//! status so the UI can tell expected outcomes apart from faults.

use crate::codec::ParticipantSnapshot;
use catalyst_common::{not_found, CatalystError, HttpStatusCode};
use catalyst_db::DbError;
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckinError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("No valid registration found for this event")]
    RegistrationNotFound,

    #[error("Event not found")]
    EventNotFound,

    #[error("Invalid QR code format: {0}")]
    InvalidTokenFormat(String),

    #[error("Invalid QR code data: {0}")]
    InvalidTokenStructure(String),

    #[error("QR code signature does not match")]
    InvalidTokenSignature,

    #[error("QR code has expired")]
    TokenExpired,

    #[error("Check-in record not found")]
    RecordNotFound,

    #[error("Not authorized to check in attendees for this event")]
    NotAuthorized,

    /// The record was used before. Carries what the scanner needs to explain it.
    #[error("Participant already checked in")]
    AlreadyCheckedIn {
        checked_in_at: Option<DateTime<Utc>>,
        participant: Box<ParticipantSnapshot>,
    },

    #[error("A check-in record was issued concurrently")]
    IssuanceConflict,

    #[error("Failed to record check-in: {0}")]
    UpdateFailed(String),

    /// A server-built claim could not be encoded or signed.
    #[error("Failed to encode check-in token: {0}")]
    TokenEncoding(String),

    #[error("Storage error: {0}")]
    Storage(#[from] DbError),
}

impl CheckinError {
    /// Stable snake_case identifier returned to clients as `kind`.
    pub fn kind(&self) -> &'static str {
        match self {
            CheckinError::Unauthorized(_) => "unauthorized",
            CheckinError::InvalidRequest(_) => "invalid_request",
            CheckinError::RegistrationNotFound => "registration_not_found",
            CheckinError::EventNotFound => "event_not_found",
            CheckinError::InvalidTokenFormat(_) => "invalid_token_format",
            CheckinError::InvalidTokenStructure(_) => "invalid_token_structure",
            CheckinError::InvalidTokenSignature => "invalid_token_signature",
            CheckinError::TokenExpired => "token_expired",
            CheckinError::RecordNotFound => "record_not_found",
            CheckinError::NotAuthorized => "not_authorized",
            CheckinError::AlreadyCheckedIn { .. } => "already_checked_in",
            CheckinError::IssuanceConflict => "issuance_conflict",
            CheckinError::UpdateFailed(_) => "update_failed",
            CheckinError::TokenEncoding(_) => "token_encoding",
            CheckinError::Storage(_) => "storage",
        }
    }

    /// `true` for frequent, non-exceptional outcomes the UI shows as information
    /// rather than offering a retry.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            CheckinError::AlreadyCheckedIn { .. } | CheckinError::TokenExpired
        )
    }
}

impl HttpStatusCode for CheckinError {
    fn status_code(&self) -> u16 {
        match self {
            CheckinError::Unauthorized(_) => 401,
            CheckinError::InvalidRequest(_)
            | CheckinError::InvalidTokenFormat(_)
            | CheckinError::InvalidTokenStructure(_)
            | CheckinError::InvalidTokenSignature => 400,
            CheckinError::NotAuthorized => 403,
            CheckinError::RegistrationNotFound
            | CheckinError::EventNotFound
            | CheckinError::RecordNotFound => 404,
            CheckinError::AlreadyCheckedIn { .. } | CheckinError::IssuanceConflict => 409,
            CheckinError::TokenExpired => 410,
            CheckinError::UpdateFailed(_)
            | CheckinError::TokenEncoding(_)
            | CheckinError::Storage(_) => 500,
        }
    }
}

impl From<CheckinError> for CatalystError {
    fn from(err: CheckinError) -> Self {
        let message = err.to_string();
        match err {
            CheckinError::Unauthorized(_) => CatalystError::AuthError(message),
            CheckinError::InvalidRequest(_) => CatalystError::ValidationError(message),
            CheckinError::InvalidTokenFormat(_)
            | CheckinError::InvalidTokenStructure(_)
            | CheckinError::InvalidTokenSignature => CatalystError::ParseError(message),
            CheckinError::NotAuthorized => CatalystError::ForbiddenError(message),
            CheckinError::RegistrationNotFound
            | CheckinError::EventNotFound
            | CheckinError::RecordNotFound => not_found(message),
            CheckinError::AlreadyCheckedIn { .. } | CheckinError::IssuanceConflict => {
                CatalystError::ConflictError(message)
            }
            CheckinError::TokenExpired => CatalystError::GoneError(message),
            CheckinError::UpdateFailed(_) | CheckinError::TokenEncoding(_) => {
                CatalystError::InternalError(message)
            }
            CheckinError::Storage(_) => CatalystError::DatabaseError(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_outcomes() {
        let already = CheckinError::AlreadyCheckedIn {
            checked_in_at: None,
            participant: Box::default(),
        };
        assert!(already.is_expected());
        assert!(CheckinError::TokenExpired.is_expected());
        assert!(!CheckinError::UpdateFailed("disk full".into()).is_expected());
        assert!(!CheckinError::NotAuthorized.is_expected());
    }

    #[test]
    fn test_status_codes_match_shared_error() {
        let cases = vec![
            CheckinError::Unauthorized("missing bearer token".into()),
            CheckinError::InvalidRequest("event_id is required".into()),
            CheckinError::RegistrationNotFound,
            CheckinError::EventNotFound,
            CheckinError::InvalidTokenFormat("bad base64".into()),
            CheckinError::InvalidTokenStructure("missing exp".into()),
            CheckinError::InvalidTokenSignature,
            CheckinError::TokenExpired,
            CheckinError::RecordNotFound,
            CheckinError::NotAuthorized,
            CheckinError::IssuanceConflict,
            CheckinError::UpdateFailed("locked".into()),
            CheckinError::TokenEncoding("serializer failed".into()),
            CheckinError::Storage(DbError::QueryError("gone".into())),
        ];

        for err in cases {
            let status = err.status_code();
            let shared: CatalystError = err.into();
            assert_eq!(shared.status_code(), status);
        }
    }

    #[test]
    fn test_kinds() {
        assert_eq!(CheckinError::TokenExpired.kind(), "token_expired");
        assert_eq!(
            CheckinError::InvalidTokenFormat(String::new()).kind(),
            "invalid_token_format"
        );
        assert_eq!(CheckinError::TokenExpired.status_code(), 410);
        assert_eq!(CheckinError::NotAuthorized.status_code(), 403);
    }

    #[test]
    fn test_token_encoding_is_a_server_fault() {
        let err = CheckinError::TokenEncoding("serializer failed".into());
        assert_eq!(err.kind(), "token_encoding");
        assert_eq!(err.status_code(), 500);
        assert!(!err.is_expected());
        assert!(matches!(CatalystError::from(err), CatalystError::InternalError(_)));
    }
}
