//! Repository for event registrations
//!
//! Registrations are written by the sign-up flow. Check-in reads them to prove a
//! user is enrolled and to build the participant snapshot.

use crate::error::DbError;

pub use catalyst_common::models::{Registration, RegistrationStatus};

pub trait RegistrationRepository {
    fn init_schema(&self) -> impl std::future::Future<Output = Result<(), DbError>> + Send;

    fn create(
        &self,
        registration: Registration,
    ) -> impl std::future::Future<Output = Result<Registration, DbError>> + Send;

    /// Find a registration by id, regardless of status.
    fn find_by_id(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Registration>, DbError>> + Send;

    /// Change the status of a registration. Returns `false` when no row matched.
    fn update_status(
        &self,
        id: &str,
        status: RegistrationStatus,
    ) -> impl std::future::Future<Output = Result<bool, DbError>> + Send;
}
