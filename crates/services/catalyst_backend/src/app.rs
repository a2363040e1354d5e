//! Router assembly for the backend service.

use axum::{routing::get, Router};
use catalyst_common::Clock;
use catalyst_config::AppConfig;
use catalyst_db::DbClient;
use http::{header, Method};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Build the full application: everything under `/api`, plus Swagger UI when the
/// `openapi` feature is enabled.
pub fn build_app(config: Arc<AppConfig>, db_client: DbClient, clock: Arc<dyn Clock>) -> Router {
    let mut router = Router::new().route("/", get(|| async { "Welcome to Campus Catalyst API!" }));

    if config.use_checkin {
        info!("Mounting check-in routes");
        router = router.merge(catalyst_checkin::routes(config.clone(), db_client, clock));
    } else {
        info!("Check-in routes disabled (use_checkin = false)");
    }

    #[allow(unused_mut)] // only mutated with the openapi feature
    let mut app = Router::new().nest("/api", router);

    #[cfg(feature = "openapi")]
    {
        use catalyst_checkin::openapi::CheckinApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Campus Catalyst API",
                version = "0.1.0",
                description = "Campus Catalyst check-in service"
            ),
            servers( (url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(CheckinApiDoc::openapi());
        info!("Adding Swagger UI at /api/docs");

        app = app.merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc));
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    app.layer(TraceLayer::new_for_http()).layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use catalyst_common::SystemClock;
    use catalyst_config::DatabaseConfig;
    use catalyst_db::{CatalystRepositoryFactory, RepositoryFactory};
    use tower::ServiceExt;

    async fn app(use_checkin: bool) -> (tempfile::TempDir, Router) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("backend.db").display());
        let config = Arc::new(AppConfig {
            use_checkin,
            database: Some(DatabaseConfig { url }),
            ..Default::default()
        });
        let db_client = DbClient::new(&config).await.unwrap();
        CatalystRepositoryFactory::new()
            .create_repository(db_client.clone())
            .init_schema()
            .await
            .unwrap();
        (dir, build_app(config, db_client, Arc::new(SystemClock)))
    }

    #[tokio::test]
    async fn test_health_is_mounted_under_api() {
        let (_dir, app) = app(true).await;
        let response = app
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["database"], serde_json::json!(true));
    }

    #[tokio::test]
    async fn test_checkin_routes_follow_runtime_flag() {
        let (_dir, app) = app(false).await;
        let response = app
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
