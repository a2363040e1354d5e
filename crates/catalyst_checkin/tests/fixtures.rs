//! Test fixtures for check-in API tests
//!
//! Builds the check-in router over a throwaway SQLite database, seeds one event
//! with an organizer, an admin and two registered students, and mints session
//! tokens for them.
#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use catalyst_checkin::routes;
use catalyst_common::models::{Event, Registration, RegistrationStatus, Role};
use catalyst_common::FixedClock;
use catalyst_config::{AppConfig, AuthConfig, CheckinConfig, DatabaseConfig};
use catalyst_db::{
    CatalystRepositories, CatalystRepositoryFactory, DbClient, EventRepository,
    ProfileRepository, RegistrationRepository, RepositoryFactory,
};
use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

pub const JWT_SECRET: &str = "test-session-secret";

pub const EVENT_ID: &str = "evt-hackathon";
pub const OTHER_EVENT_ID: &str = "evt-workshop";
pub const ORGANIZER: &str = "org-1";
pub const OTHER_ORGANIZER: &str = "org-2";
pub const ADMIN: &str = "admin-1";
pub const STUDENT: &str = "stu-1";
pub const OTHER_STUDENT: &str = "stu-2";
pub const REGISTRATION: &str = "reg-1";
pub const OTHER_REGISTRATION: &str = "reg-2";

/// 2025-06-01 at the given UTC time.
pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, hour, minute, 0).unwrap()
}

pub struct TestApp {
    _dir: TempDir,
    pub app: Router,
    pub repos: CatalystRepositories,
    pub clock: FixedClock,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(CheckinConfig::default()).await
}

pub async fn spawn_app_with(checkin: CheckinConfig) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("checkin.db").display());

    let config = Arc::new(AppConfig {
        use_checkin: true,
        database: Some(DatabaseConfig { url: url.clone() }),
        auth: Some(AuthConfig {
            jwt_secret: JWT_SECRET.to_string(),
            leeway_seconds: 0,
        }),
        checkin: Some(checkin),
        ..Default::default()
    });

    let db_client = DbClient::new(&config).await.unwrap();
    let repos = CatalystRepositoryFactory::new().create_repository(db_client.clone());
    repos.init_schema().await.unwrap();
    seed(&repos).await;

    let clock = FixedClock::new(at(10, 0));
    let app = routes(config, db_client, Arc::new(clock.clone()));

    TestApp {
        _dir: dir,
        app,
        repos,
        clock,
    }
}

async fn seed(repos: &CatalystRepositories) {
    for (id, title, organizer) in [
        (EVENT_ID, "Hackathon", ORGANIZER),
        (OTHER_EVENT_ID, "Rust Workshop", OTHER_ORGANIZER),
    ] {
        repos
            .events
            .create(Event {
                id: id.to_string(),
                title: title.to_string(),
                description: Some("Campus event".to_string()),
                location: Some("Main hall".to_string()),
                start_time: at(9, 0),
                end_time: at(18, 0),
                organizer_id: organizer.to_string(),
            })
            .await
            .unwrap();
    }

    repos
        .registrations
        .create(registration(REGISTRATION, STUDENT, "Asha Rao"))
        .await
        .unwrap();
    repos
        .registrations
        .create(registration(OTHER_REGISTRATION, OTHER_STUDENT, "Ravi Kumar"))
        .await
        .unwrap();

    repos.profiles.upsert_role(ORGANIZER, Role::Organizer).await.unwrap();
    repos
        .profiles
        .upsert_role(OTHER_ORGANIZER, Role::Organizer)
        .await
        .unwrap();
    repos.profiles.upsert_role(ADMIN, Role::Admin).await.unwrap();
}

pub fn registration(id: &str, user_id: &str, name: &str) -> Registration {
    Registration {
        id: id.to_string(),
        event_id: EVENT_ID.to_string(),
        user_id: user_id.to_string(),
        participant_name: name.to_string(),
        email: Some(format!("{}@campus.edu", user_id)),
        roll_number: Some("CS-042".to_string()),
        department: Some("CSE".to_string()),
        year: Some("3".to_string()),
        class: Some("B".to_string()),
        status: RegistrationStatus::Registered,
        profile_photo_url: None,
    }
}

#[derive(serde::Serialize)]
struct SessionClaims<'a> {
    sub: &'a str,
    exp: usize,
}

/// A session JWT for `user_id`, valid for an hour of wall-clock time.
pub fn session_token(user_id: &str) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        &SessionClaims {
            sub: user_id,
            exp: (Utc::now().timestamp() + 3600) as usize,
        },
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

pub async fn post_json(app: &Router, uri: &str, user_id: Option<&str>, body: Value) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(user_id) = user_id {
        builder = builder.header("authorization", format!("Bearer {}", session_token(user_id)));
    }
    send(app, builder.body(Body::from(body.to_string())).unwrap()).await
}

pub async fn get_json(app: &Router, uri: &str, user_id: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(user_id) = user_id {
        builder = builder.header("authorization", format!("Bearer {}", session_token(user_id)));
    }
    send(app, builder.body(Body::empty()).unwrap()).await
}

pub async fn issue(app: &Router, user_id: &str, registration_id: &str) -> (StatusCode, Value) {
    post_json(
        app,
        "/checkin/issue",
        Some(user_id),
        serde_json::json!({ "event_id": EVENT_ID, "registration_id": registration_id }),
    )
    .await
}

pub async fn validate(app: &Router, scanner: &str, qr_token: &str) -> (StatusCode, Value) {
    post_json(
        app,
        "/checkin/validate",
        Some(scanner),
        serde_json::json!({ "qr_token": qr_token }),
    )
    .await
}

/// Issue the student's token and return it.
pub async fn issued_token(app: &Router) -> String {
    let (status, body) = issue(app, STUDENT, REGISTRATION).await;
    assert_eq!(status, StatusCode::OK, "issue failed: {}", body);
    body["token"].as_str().unwrap().to_string()
}
