#![allow(dead_code)]
use utoipa::OpenApi;

use crate::codec::ParticipantSnapshot;
use crate::handlers::{
    ErrorResponse, HealthResponse, IssueTokenRequest, TicketResponse, ValidateTokenRequest,
    ValidateTokenResponse,
};
use crate::models::{AttendanceEntry, AttendanceSummary, EventSummary};

#[utoipa::path(
    post,
    path = "/checkin/issue",
    request_body(content = IssueTokenRequest, example = json!({
        "event_id": "6f1c2a9e-2f43-4c55-9a51-0d5f1f7f1b20",
        "registration_id": "b0a7e8d2-8c1e-4f0e-9e63-3f4f8e0c2d11"
    })),
    responses(
        (status = 200, description = "Token issued, or the existing one returned", body = TicketResponse,
         example = json!({
             "token": "eyJ1c2VyX2lkIjoi...",
             "issued_at": "2025-06-01T10:00:00Z",
             "expires_at": "2025-06-01T20:00:00Z",
             "is_checked_in": false
         })
        ),
        (status = 404, description = "Registration not found", body = ErrorResponse,
         example = json!({
             "error": "No valid registration found for this event",
             "kind": "registration_not_found"
         })
        )
    ),
    tag = "Check-in"
)]
fn doc_issue_token_handler() {}

#[utoipa::path(
    post,
    path = "/checkin/validate",
    request_body(content = ValidateTokenRequest, example = json!({
        "qr_token": "eyJ1c2VyX2lkIjoi..."
    })),
    responses(
        (status = 200, description = "Participant checked in", body = ValidateTokenResponse,
         example = json!({
             "valid": true,
             "success": true,
             "message": "Check-in successful",
             "participant": {
                 "name": "Asha Rao",
                 "email": "asha@campus.edu",
                 "roll_number": "CS-042",
                 "department": "CSE",
                 "year": "3",
                 "class": null,
                 "profile_photo_url": null
             },
             "event": { "title": "Hackathon", "start_time": "2025-06-01T09:00:00Z" },
             "checked_in_at": "2025-06-01T17:30:00Z"
         })
        ),
        (status = 409, description = "Already checked in", body = ValidateTokenResponse,
         example = json!({
             "valid": false,
             "already_checked_in": true,
             "checked_in_at": "2025-06-01T17:30:00Z",
             "error": "Participant already checked in",
             "kind": "already_checked_in"
         })
        ),
        (status = 410, description = "Token expired", body = ValidateTokenResponse,
         example = json!({
             "valid": false,
             "error": "QR code has expired",
             "kind": "token_expired"
         })
        )
    ),
    tag = "Check-in"
)]
fn doc_validate_token_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_issue_token_handler,
        doc_validate_token_handler,
        crate::handlers::ticket_handler,
        crate::handlers::attendance_handler,
        crate::handlers::health_handler,
    ),
    components(
        schemas(
            IssueTokenRequest,
            TicketResponse,
            ValidateTokenRequest,
            ValidateTokenResponse,
            ErrorResponse,
            HealthResponse,
            ParticipantSnapshot,
            EventSummary,
            AttendanceSummary,
            AttendanceEntry,
        )
    ),
    tags(
        (name = "Check-in", description = "QR check-in token issuance and validation")
    ),
    servers(
        (url = "/api", description = "Campus Catalyst API server")
    )
)]
pub struct CheckinApiDoc;
