// --- File: crates/catalyst_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

// --- Database Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String, // e.g. sqlite://data/catalyst.db, loaded via CATALYST__DATABASE__URL
}

// --- Auth Config ---
// The identity provider signs session JWTs with this secret (HS256).
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String, // usually "secret_from_env" -> CATALYST_SECRET_AUTH_JWT_SECRET
    /// Accepted clock skew in seconds when checking `exp`.
    #[serde(default = "default_leeway_seconds")]
    pub leeway_seconds: u64,
}

fn default_leeway_seconds() -> u64 {
    30
}

// --- Check-in Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CheckinConfig {
    /// Minutes after the event end during which a stored record may still be validated.
    #[serde(default = "default_grace_window_minutes")]
    pub grace_window_minutes: i64,
    /// When set, issued tokens carry an HMAC-SHA256 suffix that is verified on scan.
    #[serde(default)]
    pub signing_secret: Option<String>,
    /// Refuse tokens for registrations whose status is `cancelled`.
    #[serde(default = "default_true")]
    pub reject_cancelled_registrations: bool,
}

fn default_grace_window_minutes() -> i64 {
    120
}

fn default_true() -> bool {
    true
}

impl Default for CheckinConfig {
    fn default() -> Self {
        Self {
            grace_window_minutes: default_grace_window_minutes(),
            signing_secret: None,
            reject_cancelled_registrations: true,
        }
    }
}

// --- Logging Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Directory for daily-rolling log files. Stdout only when absent.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    // Server config is mandatory in config files, defaults apply in tests
    #[serde(default)]
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_checkin: bool,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    #[serde(default)]
    pub auth: Option<AuthConfig>,
    #[serde(default)]
    pub checkin: Option<CheckinConfig>,
    #[serde(default)]
    pub logging: Option<LoggingConfig>,
}
