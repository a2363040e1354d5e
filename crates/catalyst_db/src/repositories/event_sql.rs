//! SQL implementation of the event repository

use crate::columns;
use crate::error::DbError;
use crate::repositories::event::{Event, EventRepository};
use crate::DbClient;
use sqlx::any::AnyRow;
use sqlx::Row;
use tracing::{debug, error, info};

#[derive(Debug, Clone)]
pub struct SqlEventRepository {
    db_client: DbClient,
}

impl SqlEventRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

fn event_from_row(row: &AnyRow) -> Result<Event, DbError> {
    let start_time: String = row.try_get("start_time")?;
    let end_time: String = row.try_get("end_time")?;
    Ok(Event {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: columns::optional_text(row, "description")?,
        location: columns::optional_text(row, "location")?,
        start_time: columns::decode("start_time", &start_time)?,
        end_time: columns::decode("end_time", &end_time)?,
        organizer_id: row.try_get("organizer_id")?,
    })
}

impl EventRepository for SqlEventRepository {
    async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing event schema");

        let query = r#"
            CREATE TABLE IF NOT EXISTS events (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT,
                location TEXT,
                start_time TEXT NOT NULL,
                end_time TEXT NOT NULL,
                organizer_id TEXT NOT NULL
            )
        "#;
        self.db_client.execute(query).await?;

        info!("Event schema initialized successfully");
        Ok(())
    }

    async fn create(&self, event: Event) -> Result<Event, DbError> {
        debug!("Creating event: {}", event.id);

        let query = r#"
            INSERT INTO events (id, title, description, location, start_time, end_time, organizer_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#;

        sqlx::query(query)
            .bind(&event.id)
            .bind(&event.title)
            .bind(event.description.clone())
            .bind(event.location.clone())
            .bind(columns::encode(&event.start_time))
            .bind(columns::encode(&event.end_time))
            .bind(&event.organizer_id)
            .execute(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to insert event: {}", e);
                DbError::from_write(e)
            })?;

        Ok(event)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, DbError> {
        debug!("Finding event: {}", id);

        let query = r#"
            SELECT id, title, description, location, start_time, end_time, organizer_id
            FROM events
            WHERE id = $1
        "#;

        let row = sqlx::query(query)
            .bind(id)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to find event: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        row.as_ref().map(event_from_row).transpose()
    }
}
