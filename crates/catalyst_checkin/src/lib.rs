//! QR check-in for Campus Catalyst
//!
//! Students obtain a per-event QR token once their registration is confirmed;
//! organizers scan it at the door. This crate holds the token codec, the
//! registration verifier, the issuer, the validator and the axum routes that
//! expose them.
//!
//! # Example
//!
//! ```rust,no_run
//! use catalyst_checkin::routes;
//! use catalyst_common::SystemClock;
//! use catalyst_config::AppConfig;
//! use catalyst_db::DbClient;
//! use std::sync::Arc;
//!
//! async fn setup_app(db_client: DbClient) {
//!     let config = Arc::new(AppConfig::default());
//!     let _app = routes(config, db_client, Arc::new(SystemClock));
//!     // Nest under /api in the backend router
//! }
//! ```
//!
//! # API Endpoints
//!
//! - `POST /checkin/issue` - Issue (or fetch) the caller's token for an event
//! - `POST /checkin/validate` - Validate a scanned token and check the participant in
//! - `GET /checkin/ticket/{event_id}` - The caller's existing ticket
//! - `GET /checkin/events/{event_id}/attendance` - Attendance for a managed event
//! - `GET /health` - Liveness and database reachability

pub mod auth;
pub mod codec;
#[cfg(test)]
mod codec_proptest;
#[cfg(feature = "openapi")]
pub mod doc;
pub mod error;
pub mod handlers;
pub mod issuer;
pub mod models;
pub mod routes;
pub mod service;
pub mod validator;
pub mod verifier;

pub use error::CheckinError;
pub use routes::routes;
pub use service::{CheckinService, CheckinSettings};

#[cfg(feature = "openapi")]
pub mod openapi {
    pub use crate::doc::CheckinApiDoc;
}
