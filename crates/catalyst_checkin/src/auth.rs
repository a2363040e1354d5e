// --- File: crates/catalyst_checkin/src/auth.rs ---

use axum::{
    body::Body as AxumBody,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use catalyst_common::models::{Caller, Role};
use catalyst_common::config_error;
use catalyst_config::AppConfig;
use catalyst_db::{ProfileRepository, SqlProfileRepository};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::error::CheckinError;
use crate::handlers::error_response;

/// State for the caller authentication middleware.
#[derive(Clone)]
pub struct CheckinAuthState {
    pub config: Arc<AppConfig>,
    pub profiles: SqlProfileRepository,
}

/// Claims of a session JWT minted by the identity provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User id.
    pub sub: String,
    /// Expiry, seconds since the epoch.
    pub exp: usize,
}

/// Verify an HS256 session token and return its subject.
pub fn verify_session_token(
    token: &str,
    secret: &str,
    leeway_seconds: u64,
) -> Result<String, CheckinError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = leeway_seconds;

    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| CheckinError::Unauthorized(format!("invalid session token: {}", e)))?;

    if data.claims.sub.is_empty() {
        return Err(CheckinError::Unauthorized(
            "session token has no subject".to_string(),
        ));
    }
    Ok(data.claims.sub)
}

fn bearer_token(req: &Request<AxumBody>) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Axum middleware that resolves the caller of every check-in request.
///
/// Expects `Authorization: Bearer <jwt>`. On success a [`Caller`] is inserted
/// into the request extensions, with the role taken from the caller's profile
/// (students when no profile exists).
pub async fn caller_auth_middleware(
    State(auth_state): State<Arc<CheckinAuthState>>,
    mut req: Request<AxumBody>,
    next: Next,
) -> Response {
    let Some(auth) = auth_state.config.auth.as_ref() else {
        error!("Auth configuration missing, cannot verify callers");
        return config_error("auth is not configured").into_response();
    };

    let token = match bearer_token(&req) {
        Some(token) => token.to_string(),
        None => {
            debug!("Request without bearer token rejected");
            return error_response(&CheckinError::Unauthorized(
                "missing bearer token".to_string(),
            ));
        }
    };

    let user_id = match verify_session_token(&token, &auth.jwt_secret, auth.leeway_seconds) {
        Ok(user_id) => user_id,
        Err(err) => {
            warn!("Rejected session token: {}", err);
            return error_response(&err);
        }
    };

    let role = match auth_state.profiles.find_role(&user_id).await {
        Ok(role) => role.unwrap_or(Role::Student),
        Err(e) => {
            error!("Failed to load role for {}: {}", user_id, e);
            return error_response(&CheckinError::Storage(e));
        }
    };

    debug!("Authenticated caller {} as {:?}", user_id, role);
    req.extensions_mut().insert(Caller::new(user_id, role));
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token(secret: &str, sub: &str, exp: usize) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &SessionClaims {
                sub: sub.to_string(),
                exp,
            },
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn future_exp() -> usize {
        (chrono::Utc::now().timestamp() + 3600) as usize
    }

    #[test]
    fn test_valid_session_token() {
        let jwt = token("s3cret", "u-1", future_exp());
        assert_eq!(verify_session_token(&jwt, "s3cret", 0).unwrap(), "u-1");
    }

    #[test]
    fn test_rejected_session_tokens() {
        let wrong_key = token("other", "u-1", future_exp());
        assert!(matches!(
            verify_session_token(&wrong_key, "s3cret", 0),
            Err(CheckinError::Unauthorized(_))
        ));

        let expired = token("s3cret", "u-1", (chrono::Utc::now().timestamp() - 3600) as usize);
        assert!(verify_session_token(&expired, "s3cret", 30).is_err());

        let no_subject = token("s3cret", "", future_exp());
        assert!(verify_session_token(&no_subject, "s3cret", 0).is_err());

        assert!(verify_session_token("garbage", "s3cret", 0).is_err());
    }
}
