//! SQL implementation of the registration repository

use crate::columns;
use crate::error::DbError;
use crate::repositories::registration::{
    Registration, RegistrationRepository, RegistrationStatus,
};
use crate::DbClient;
use sqlx::any::AnyRow;
use sqlx::Row;
use tracing::{debug, error, info};

#[derive(Debug, Clone)]
pub struct SqlRegistrationRepository {
    db_client: DbClient,
}

impl SqlRegistrationRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

const COLUMNS: &str = "id, event_id, user_id, participant_name, email, roll_number, \
                       department, year, class, status, profile_photo_url";

fn registration_from_row(row: &AnyRow) -> Result<Registration, DbError> {
    let status: String = row.try_get("status")?;
    Ok(Registration {
        id: row.try_get("id")?,
        event_id: row.try_get("event_id")?,
        user_id: row.try_get("user_id")?,
        participant_name: row.try_get("participant_name")?,
        email: columns::optional_text(row, "email")?,
        roll_number: columns::optional_text(row, "roll_number")?,
        department: columns::optional_text(row, "department")?,
        year: columns::optional_text(row, "year")?,
        class: columns::optional_text(row, "class")?,
        status: status.parse().map_err(DbError::DecodeError)?,
        profile_photo_url: columns::optional_text(row, "profile_photo_url")?,
    })
}

impl RegistrationRepository for SqlRegistrationRepository {
    async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing registration schema");

        let query = r#"
            CREATE TABLE IF NOT EXISTS registrations (
                id TEXT PRIMARY KEY,
                event_id TEXT NOT NULL,
                user_id TEXT NOT NULL,
                participant_name TEXT NOT NULL,
                email TEXT,
                roll_number TEXT,
                department TEXT,
                year TEXT,
                class TEXT,
                status TEXT NOT NULL DEFAULT 'registered',
                profile_photo_url TEXT
            )
        "#;
        self.db_client.execute(query).await?;

        info!("Registration schema initialized successfully");
        Ok(())
    }

    async fn create(&self, registration: Registration) -> Result<Registration, DbError> {
        debug!(
            "Creating registration {} for user {} on event {}",
            registration.id, registration.user_id, registration.event_id
        );

        let query = format!(
            "INSERT INTO registrations ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
            COLUMNS
        );

        sqlx::query(&query)
            .bind(&registration.id)
            .bind(&registration.event_id)
            .bind(&registration.user_id)
            .bind(&registration.participant_name)
            .bind(registration.email.clone())
            .bind(registration.roll_number.clone())
            .bind(registration.department.clone())
            .bind(registration.year.clone())
            .bind(registration.class.clone())
            .bind(registration.status.as_str())
            .bind(registration.profile_photo_url.clone())
            .execute(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to insert registration: {}", e);
                DbError::from_write(e)
            })?;

        Ok(registration)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Registration>, DbError> {
        debug!("Finding registration: {}", id);

        let query = format!("SELECT {} FROM registrations WHERE id = $1", COLUMNS);

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to find registration: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        row.as_ref().map(registration_from_row).transpose()
    }

    async fn update_status(&self, id: &str, status: RegistrationStatus) -> Result<bool, DbError> {
        debug!("Setting registration {} to {}", id, status);

        let result = sqlx::query("UPDATE registrations SET status = $1 WHERE id = $2")
            .bind(status.as_str())
            .bind(id)
            .execute(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to update registration status: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        Ok(result.rows_affected() > 0)
    }
}
