//! Factory wiring every repository to one shared client.

use crate::error::DbError;
use crate::repositories::{
    CheckinRecordRepository, EventRepository, ProfileRepository, RegistrationRepository,
    SqlCheckinRecordRepository, SqlEventRepository, SqlProfileRepository,
    SqlRegistrationRepository,
};
use crate::{DbClient, RepositoryFactory};

/// The full set of repositories the check-in service reads and writes.
#[derive(Debug, Clone)]
pub struct CatalystRepositories {
    pub registrations: SqlRegistrationRepository,
    pub events: SqlEventRepository,
    pub profiles: SqlProfileRepository,
    pub checkins: SqlCheckinRecordRepository,
}

impl CatalystRepositories {
    /// Create every table the service relies on.
    pub async fn init_schema(&self) -> Result<(), DbError> {
        self.events.init_schema().await?;
        self.registrations.init_schema().await?;
        self.profiles.init_schema().await?;
        self.checkins.init_schema().await
    }
}

#[derive(Debug, Clone, Default)]
pub struct CatalystRepositoryFactory;

impl CatalystRepositoryFactory {
    pub fn new() -> Self {
        Self
    }
}

impl RepositoryFactory<CatalystRepositories, DbClient> for CatalystRepositoryFactory {
    fn create_repository(&self, db_client: DbClient) -> CatalystRepositories {
        CatalystRepositories {
            registrations: SqlRegistrationRepository::new(db_client.clone()),
            events: SqlEventRepository::new(db_client.clone()),
            profiles: SqlProfileRepository::new(db_client.clone()),
            checkins: SqlCheckinRecordRepository::new(db_client),
        }
    }
}
