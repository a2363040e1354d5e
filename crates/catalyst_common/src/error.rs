// --- File: crates/catalyst_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type shared by all Campus Catalyst crates.
///
/// Each crate keeps its own domain error and implements
/// `From<DomainError> for CatalystError` to surface through the HTTP layer.
#[derive(Error, Debug)]
pub enum CatalystError {
    /// Error occurred while parsing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The caller could not be identified
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// The caller is known but lacks rights for the operation
    #[error("Forbidden: {0}")]
    ForbiddenError(String),

    /// Error occurred during validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error occurred during database operation
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Error occurred due to a conflict (e.g., resource already exists)
    #[error("Conflict: {0}")]
    ConflictError(String),

    /// Error occurred due to a resource not being found
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// The resource existed but is no longer usable
    #[error("Gone: {0}")]
    GoneError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for CatalystError {
    fn status_code(&self) -> u16 {
        match self {
            CatalystError::ParseError(_) => 400,
            CatalystError::ConfigError(_) => 500,
            CatalystError::AuthError(_) => 401,
            CatalystError::ForbiddenError(_) => 403,
            CatalystError::ValidationError(_) => 400,
            CatalystError::DatabaseError(_) => 500,
            CatalystError::ConflictError(_) => 409,
            CatalystError::NotFoundError(_) => 404,
            CatalystError::GoneError(_) => 410,
            CatalystError::InternalError(_) => 500,
        }
    }
}

/// A trait for adding context to errors.
pub trait Context<T, E> {
    /// Adds context to an error.
    fn context<C>(self, context: C) -> Result<T, CatalystError>
    where
        C: fmt::Display + Send + Sync + 'static;

    /// Adds context to an error with a lazy context provider.
    fn with_context<C, F>(self, f: F) -> Result<T, CatalystError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E: std::error::Error + Send + Sync + 'static> Context<T, E> for Result<T, E> {
    fn context<C>(self, context: C) -> Result<T, CatalystError>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|error| CatalystError::InternalError(format!("{}: {}", context, error)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T, CatalystError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|error| CatalystError::InternalError(format!("{}: {}", f(), error)))
    }
}

impl From<serde_json::Error> for CatalystError {
    fn from(err: serde_json::Error) -> Self {
        CatalystError::ParseError(err.to_string())
    }
}

impl From<std::io::Error> for CatalystError {
    fn from(err: std::io::Error) -> Self {
        CatalystError::InternalError(err.to_string())
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> CatalystError {
    CatalystError::ConfigError(message.to_string())
}

pub fn not_found<T: fmt::Display>(message: T) -> CatalystError {
    CatalystError::NotFoundError(message.to_string())
}
