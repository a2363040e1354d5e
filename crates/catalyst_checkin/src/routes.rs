use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use catalyst_common::Clock;
use catalyst_config::AppConfig;
use catalyst_db::{CatalystRepositoryFactory, DbClient, RepositoryFactory};
use std::sync::Arc;
use tracing::info;

use crate::auth::{caller_auth_middleware, CheckinAuthState};
use crate::handlers::{
    attendance_handler, health_handler, issue_token_handler, ticket_handler,
    validate_token_handler, CheckinState,
};
use crate::service::{CheckinService, CheckinSettings};

/// Create the check-in routes.
///
/// The schema is expected to exist already; the backend bootstraps it at
/// startup. `clock` is the time source used for every expiry decision.
pub fn routes(config: Arc<AppConfig>, db_client: DbClient, clock: Arc<dyn Clock>) -> Router {
    let repos = CatalystRepositoryFactory::new().create_repository(db_client.clone());
    let settings = CheckinSettings::from_app_config(&config);

    let auth_state = Arc::new(CheckinAuthState {
        config: config.clone(),
        profiles: repos.profiles.clone(),
    });

    let state = Arc::new(CheckinState {
        service: Arc::new(CheckinService::new(repos, clock, settings)),
        db_client,
    });

    let protected = Router::new()
        .route("/checkin/issue", post(issue_token_handler))
        .route("/checkin/validate", post(validate_token_handler))
        .route("/checkin/ticket/{event_id}", get(ticket_handler))
        .route(
            "/checkin/events/{event_id}/attendance",
            get(attendance_handler),
        )
        .route_layer(middleware::from_fn_with_state(
            auth_state,
            caller_auth_middleware,
        ));

    info!("Check-in routes initialized");

    Router::new()
        .route("/health", get(health_handler))
        .merge(protected)
        .with_state(state)
}
