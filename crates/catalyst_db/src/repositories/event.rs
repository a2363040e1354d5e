//! Repository for events
//!
//! Events are owned by the wider platform; the check-in flow only needs to read
//! them back by id. `create` exists so deployments and tests can seed data.

use crate::error::DbError;

pub use catalyst_common::models::Event;

pub trait EventRepository {
    /// Create the `events` table if it does not exist.
    fn init_schema(&self) -> impl std::future::Future<Output = Result<(), DbError>> + Send;

    fn create(
        &self,
        event: Event,
    ) -> impl std::future::Future<Output = Result<Event, DbError>> + Send;

    /// Find an event by id.
    fn find_by_id(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Event>, DbError>> + Send;
}
