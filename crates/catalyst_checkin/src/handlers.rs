//! HTTP handlers for QR check-in
//!
//! Every handler except health runs behind [`crate::auth::caller_auth_middleware`]
//! and reads the authenticated [`Caller`] from the request extensions.
//! Failures are returned as JSON carrying a human-readable `error` and a stable
//! `kind`, with the HTTP status taken from [`CheckinError`].

use axum::{
    extract::{Extension, Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use catalyst_common::models::{Caller, CheckinRecord};
use catalyst_common::HttpStatusCode;
use catalyst_db::DbClient;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::codec::ParticipantSnapshot;
use crate::error::CheckinError;
use crate::models::{AttendanceSummary, CheckinSuccess, EventSummary};
use crate::service::CheckinService;

/// Shared state for check-in handlers
#[derive(Clone)]
pub struct CheckinState {
    pub service: Arc<CheckinService>,
    pub db_client: DbClient,
}

/// Request body for `POST /checkin/issue`.
#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct IssueTokenRequest {
    #[serde(default)]
    pub event_id: String,
    #[serde(default)]
    pub registration_id: String,
}

/// The caller's ticket: the token to render as a QR code and its state.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TicketResponse {
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub is_checked_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked_in_at: Option<DateTime<Utc>>,
}

impl From<CheckinRecord> for TicketResponse {
    fn from(record: CheckinRecord) -> Self {
        Self {
            token: record.token,
            issued_at: record.issued_at,
            expires_at: record.expires_at,
            is_checked_in: record.is_checked_in,
            checked_in_at: record.checked_in_at,
        }
    }
}

/// Request body for `POST /checkin/validate`.
#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ValidateTokenRequest {
    #[serde(default)]
    pub qr_token: String,
}

/// Outcome of a scan.
#[derive(Debug, Default, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ValidateTokenResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participant: Option<ParticipantSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<EventSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked_in_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub already_checked_in: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl From<CheckinSuccess> for ValidateTokenResponse {
    fn from(success: CheckinSuccess) -> Self {
        Self {
            valid: true,
            success: Some(true),
            message: Some("Check-in successful".to_string()),
            participant: Some(success.participant),
            event: Some(success.event),
            checked_in_at: Some(success.checked_in_at),
            ..Default::default()
        }
    }
}

impl From<CheckinError> for ValidateTokenResponse {
    fn from(err: CheckinError) -> Self {
        let error = Some(err.to_string());
        let kind = Some(err.kind().to_string());
        match err {
            CheckinError::AlreadyCheckedIn {
                checked_in_at,
                participant,
            } => Self {
                valid: false,
                already_checked_in: Some(true),
                checked_in_at,
                participant: Some(*participant),
                error,
                kind,
                ..Default::default()
            },
            _ => Self {
                valid: false,
                error,
                kind,
                ..Default::default()
            },
        }
    }
}

/// Body of every error response outside the validate endpoint.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HealthResponse {
    pub status: String,
    pub database: bool,
}

fn status_of(err: &CheckinError) -> StatusCode {
    StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Render a check-in error as `{error, kind}` with its HTTP status.
pub fn error_response(err: &CheckinError) -> Response {
    if !err.is_expected() && err.status_code() >= 500 {
        error!("Check-in request failed: {}", err);
    }
    (
        status_of(err),
        Json(ErrorResponse {
            error: err.to_string(),
            kind: err.kind().to_string(),
        }),
    )
        .into_response()
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/checkin/issue",
    request_body = IssueTokenRequest,
    responses(
        (status = 200, description = "Token issued, or the existing one returned", body = TicketResponse),
        (status = 400, description = "Missing event_id or registration_id", body = ErrorResponse),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 404, description = "Registration or event not found", body = ErrorResponse),
        (status = 409, description = "Concurrent issuance", body = ErrorResponse),
        (status = 500, description = "Token could not be encoded or stored", body = ErrorResponse)
    ),
    tag = "Check-in"
))]
pub async fn issue_token_handler(
    State(state): State<Arc<CheckinState>>,
    Extension(caller): Extension<Caller>,
    Json(payload): Json<IssueTokenRequest>,
) -> Response {
    debug!(
        "Issue request from {} for event {}",
        caller.id, payload.event_id
    );

    match state
        .service
        .issue(&caller.id, &payload.event_id, &payload.registration_id)
        .await
    {
        Ok(record) => Json(TicketResponse::from(record)).into_response(),
        Err(err) => error_response(&err),
    }
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/checkin/validate",
    request_body = ValidateTokenRequest,
    responses(
        (status = 200, description = "Participant checked in", body = ValidateTokenResponse),
        (status = 400, description = "Malformed token", body = ValidateTokenResponse),
        (status = 403, description = "Caller does not manage the event", body = ValidateTokenResponse),
        (status = 404, description = "Token was never issued", body = ValidateTokenResponse),
        (status = 409, description = "Already checked in", body = ValidateTokenResponse),
        (status = 410, description = "Token expired", body = ValidateTokenResponse),
        (status = 500, description = "Check-in could not be recorded", body = ValidateTokenResponse)
    ),
    tag = "Check-in"
))]
pub async fn validate_token_handler(
    State(state): State<Arc<CheckinState>>,
    Extension(caller): Extension<Caller>,
    Json(payload): Json<ValidateTokenRequest>,
) -> Response {
    match state.service.validate(&caller, &payload.qr_token).await {
        Ok(success) => Json(ValidateTokenResponse::from(success)).into_response(),
        Err(err) => {
            if err.is_expected() {
                info!("Scan by {} refused: {}", caller.id, err);
            } else if err.status_code() >= 500 {
                error!("Scan by {} failed: {}", caller.id, err);
            } else {
                debug!("Scan by {} rejected: {}", caller.id, err);
            }
            let status = status_of(&err);
            (status, Json(ValidateTokenResponse::from(err))).into_response()
        }
    }
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/checkin/ticket/{event_id}",
    params(("event_id" = String, Path, description = "Event id")),
    responses(
        (status = 200, description = "The caller's ticket", body = TicketResponse),
        (status = 404, description = "No ticket issued yet", body = ErrorResponse)
    ),
    tag = "Check-in"
))]
pub async fn ticket_handler(
    State(state): State<Arc<CheckinState>>,
    Extension(caller): Extension<Caller>,
    Path(event_id): Path<String>,
) -> Response {
    match state.service.ticket(&caller.id, &event_id).await {
        Ok(record) => Json(TicketResponse::from(record)).into_response(),
        Err(err) => error_response(&err),
    }
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/checkin/events/{event_id}/attendance",
    params(("event_id" = String, Path, description = "Event id")),
    responses(
        (status = 200, description = "Attendance for the event", body = AttendanceSummary),
        (status = 403, description = "Caller does not manage the event", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse)
    ),
    tag = "Check-in"
))]
pub async fn attendance_handler(
    State(state): State<Arc<CheckinState>>,
    Extension(caller): Extension<Caller>,
    Path(event_id): Path<String>,
) -> Response {
    match state.service.attendance(&caller, &event_id).await {
        Ok(summary) => Json(summary).into_response(),
        Err(err) => error_response(&err),
    }
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "Check-in"
))]
pub async fn health_handler(State(state): State<Arc<CheckinState>>) -> Json<HealthResponse> {
    let database = state.db_client.is_healthy().await;
    Json(HealthResponse {
        status: if database { "ok" } else { "degraded" }.to_string(),
        database,
    })
}
