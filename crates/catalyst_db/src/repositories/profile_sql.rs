//! SQL implementation of the profile repository

use crate::error::DbError;
use crate::repositories::profile::{ProfileRepository, Role};
use crate::DbClient;
use sqlx::Row;
use tracing::{debug, error, info};

#[derive(Debug, Clone)]
pub struct SqlProfileRepository {
    db_client: DbClient,
}

impl SqlProfileRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

impl ProfileRepository for SqlProfileRepository {
    async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing profile schema");

        let query = r#"
            CREATE TABLE IF NOT EXISTS profiles (
                id TEXT PRIMARY KEY,
                role TEXT NOT NULL DEFAULT 'student'
            )
        "#;
        self.db_client.execute(query).await?;

        info!("Profile schema initialized successfully");
        Ok(())
    }

    async fn upsert_role(&self, user_id: &str, role: Role) -> Result<(), DbError> {
        debug!("Setting role {} for user {}", role.as_str(), user_id);

        let query = r#"
            INSERT INTO profiles (id, role) VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE SET role = excluded.role
        "#;

        sqlx::query(query)
            .bind(user_id)
            .bind(role.as_str())
            .execute(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to upsert profile: {}", e);
                DbError::QueryError(e.to_string())
            })?;
        Ok(())
    }

    async fn find_role(&self, user_id: &str) -> Result<Option<Role>, DbError> {
        let row = sqlx::query("SELECT role FROM profiles WHERE id = $1")
            .bind(user_id)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to find profile: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        match row {
            Some(row) => {
                let raw: String = row.try_get("role")?;
                raw.parse().map(Some).map_err(DbError::DecodeError)
            }
            None => Ok(None),
        }
    }
}
