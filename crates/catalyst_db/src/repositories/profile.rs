//! Repository for user profiles
//!
//! Only the role matters here: it decides whether a caller may validate scans.

use crate::error::DbError;

pub use catalyst_common::models::Role;

pub trait ProfileRepository {
    fn init_schema(&self) -> impl std::future::Future<Output = Result<(), DbError>> + Send;

    /// Insert or replace the role for `user_id`.
    fn upsert_role(
        &self,
        user_id: &str,
        role: Role,
    ) -> impl std::future::Future<Output = Result<(), DbError>> + Send;

    /// Role of `user_id`, `None` when the user has no profile row.
    fn find_role(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Role>, DbError>> + Send;
}
