//! Storage for Campus Catalyst
//!
//! A pooled, backend-agnostic database client plus one repository per table the
//! check-in flow touches: events, registrations, profiles and check-in records.
//! SQLite is the default backend; PostgreSQL is available behind the `postgres`
//! feature.
//!
//! # Example
//!
//! ```rust,no_run
//! use catalyst_db::{CatalystRepositoryFactory, DbClient, RepositoryFactory};
//!
//! async fn setup() -> Result<(), Box<dyn std::error::Error>> {
//!     let db_client = DbClient::from_url("sqlite://data/catalyst.db").await?;
//!     let repos = CatalystRepositoryFactory::new().create_repository(db_client);
//!     repos.init_schema().await?;
//!     Ok(())
//! }
//! ```

pub mod client;
mod columns;
pub mod error;
pub mod repositories;
pub mod repository;

pub use client::DbClient;
pub use error::DbError;
pub use repository::RepositoryFactory;

pub use repositories::{
    CatalystRepositories, CatalystRepositoryFactory, CheckinRecordRepository, EventRepository,
    ProfileRepository, RegistrationRepository, SqlCheckinRecordRepository, SqlEventRepository,
    SqlProfileRepository, SqlRegistrationRepository,
};
