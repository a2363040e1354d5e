//! SQL implementation of the check-in record repository

use crate::columns;
use crate::error::DbError;
use crate::repositories::checkin_record::{CheckinRecord, CheckinRecordRepository};
use crate::DbClient;
use chrono::{DateTime, Utc};
use sqlx::any::AnyRow;
use sqlx::Row;
use tracing::{debug, error, info, warn};

/// SQL implementation of the check-in record repository
#[derive(Debug, Clone)]
pub struct SqlCheckinRecordRepository {
    db_client: DbClient,
}

impl SqlCheckinRecordRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

const COLUMNS: &str = "id, user_id, event_id, registration_id, token, issued_at, expires_at, \
                       is_checked_in, checked_in_at, checked_in_by";

fn record_from_row(row: &AnyRow) -> Result<CheckinRecord, DbError> {
    let issued_at: String = row.try_get("issued_at")?;
    let expires_at: String = row.try_get("expires_at")?;
    let is_checked_in: i64 = row.try_get("is_checked_in")?;
    Ok(CheckinRecord {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        event_id: row.try_get("event_id")?,
        registration_id: row.try_get("registration_id")?,
        token: row.try_get("token")?,
        issued_at: columns::decode("issued_at", &issued_at)?,
        expires_at: columns::decode("expires_at", &expires_at)?,
        is_checked_in: is_checked_in != 0,
        checked_in_at: columns::optional_timestamp(row, "checked_in_at")?,
        checked_in_by: columns::optional_text(row, "checked_in_by")?,
    })
}

impl SqlCheckinRecordRepository {
    async fn fetch_optional(
        &self,
        query: &str,
        binds: &[&str],
    ) -> Result<Option<CheckinRecord>, DbError> {
        let mut q = sqlx::query(query);
        for value in binds {
            q = q.bind(*value);
        }

        let row = q
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to find check-in record: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        row.as_ref().map(record_from_row).transpose()
    }
}

impl CheckinRecordRepository for SqlCheckinRecordRepository {
    async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing check-in record schema");

        let query = r#"
            CREATE TABLE IF NOT EXISTS checkin_records (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                event_id TEXT NOT NULL,
                registration_id TEXT NOT NULL,
                token TEXT NOT NULL,
                issued_at TEXT NOT NULL,
                expires_at TEXT NOT NULL,
                is_checked_in INTEGER NOT NULL DEFAULT 0,
                checked_in_at TEXT,
                checked_in_by TEXT,
                UNIQUE(user_id, event_id)
            )
        "#;
        self.db_client.execute(query).await?;

        self.db_client
            .execute("CREATE INDEX IF NOT EXISTS idx_checkin_records_token ON checkin_records (token)")
            .await?;

        info!("Check-in record schema initialized successfully");
        Ok(())
    }

    async fn insert(&self, record: CheckinRecord) -> Result<CheckinRecord, DbError> {
        debug!(
            "Inserting check-in record for user {} on event {}",
            record.user_id, record.event_id
        );

        let query = format!(
            "INSERT INTO checkin_records ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
            COLUMNS
        );

        sqlx::query(&query)
            .bind(&record.id)
            .bind(&record.user_id)
            .bind(&record.event_id)
            .bind(&record.registration_id)
            .bind(&record.token)
            .bind(columns::encode(&record.issued_at))
            .bind(columns::encode(&record.expires_at))
            .bind(columns::flag(record.is_checked_in))
            .bind(record.checked_in_at.as_ref().map(columns::encode))
            .bind(record.checked_in_by.clone())
            .execute(self.db_client.pool())
            .await
            .map_err(|e| match DbError::from_write(e) {
                DbError::UniqueViolation(msg) => {
                    warn!(
                        "Check-in record already exists for user {} on event {}",
                        record.user_id, record.event_id
                    );
                    DbError::UniqueViolation(msg)
                }
                other => {
                    error!("Failed to insert check-in record: {}", other);
                    other
                }
            })?;

        Ok(record)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<CheckinRecord>, DbError> {
        let query = format!("SELECT {} FROM checkin_records WHERE id = $1", COLUMNS);
        self.fetch_optional(&query, &[id]).await
    }

    async fn find_by_user_and_event(
        &self,
        user_id: &str,
        event_id: &str,
    ) -> Result<Option<CheckinRecord>, DbError> {
        debug!(
            "Finding check-in record for user {} on event {}",
            user_id, event_id
        );
        let query = format!(
            "SELECT {} FROM checkin_records WHERE user_id = $1 AND event_id = $2",
            COLUMNS
        );
        self.fetch_optional(&query, &[user_id, event_id]).await
    }

    async fn find_by_token(
        &self,
        token: &str,
        user_id: &str,
        event_id: &str,
    ) -> Result<Option<CheckinRecord>, DbError> {
        let query = format!(
            "SELECT {} FROM checkin_records WHERE token = $1 AND user_id = $2 AND event_id = $3",
            COLUMNS
        );
        self.fetch_optional(&query, &[token, user_id, event_id])
            .await
    }

    async fn find_by_event(&self, event_id: &str) -> Result<Vec<CheckinRecord>, DbError> {
        debug!("Listing check-in records for event {}", event_id);

        let query = format!(
            "SELECT {} FROM checkin_records WHERE event_id = $1 ORDER BY issued_at, id",
            COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(event_id)
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to list check-in records: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        rows.iter().map(record_from_row).collect()
    }

    async fn mark_checked_in(
        &self,
        id: &str,
        checked_in_at: DateTime<Utc>,
        checked_in_by: &str,
    ) -> Result<bool, DbError> {
        debug!("Marking check-in record {} as checked in", id);

        let query = r#"
            UPDATE checkin_records
            SET is_checked_in = 1, checked_in_at = $1, checked_in_by = $2
            WHERE id = $3 AND is_checked_in = 0
        "#;

        let result = sqlx::query(query)
            .bind(columns::encode(&checked_in_at))
            .bind(checked_in_by)
            .bind(id)
            .execute(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to mark check-in record: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        Ok(result.rows_affected() == 1)
    }
}
