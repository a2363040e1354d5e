// --- File: crates/catalyst_common/src/lib.rs ---

// Declare modules within this crate
pub mod error; // Error handling
pub mod http; // HTTP error mapping
pub mod logging; // Logging setup
pub mod models; // Shared records
pub mod services; // Injected service traits

// Re-export error types and utilities for easier access
pub use error::{config_error, not_found, CatalystError, Context, HttpStatusCode};

pub use http::IntoHttpResponse;

pub use logging::{init, init_from_config, init_with_level, log_error, log_result};

pub use models::{Caller, CheckinRecord, Event, Registration, RegistrationStatus, Role};
pub use services::{Clock, FixedClock, SystemClock};
