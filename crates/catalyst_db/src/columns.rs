//! Column encoding shared by the SQL repositories.
//!
//! Timestamps are stored as RFC 3339 text and booleans as `0`/`1` integers so
//! every backend reachable through `sqlx::Any` reads them back the same way.
//! Nullable columns go through [`optional_text`]: the `Any` driver reports a
//! SQL `NULL` as its own type, which a plain `try_get::<Option<String>>` rejects.

use crate::error::DbError;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::any::AnyRow;
use sqlx::{Row, ValueRef};

pub fn encode(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn decode(column: &str, raw: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| DbError::DecodeError(format!("column '{}': {}", column, e)))
}

/// A nullable TEXT column.
pub fn optional_text(row: &AnyRow, column: &str) -> Result<Option<String>, DbError> {
    if row.try_get_raw(column)?.is_null() {
        return Ok(None);
    }
    Ok(Some(row.try_get::<String, _>(column)?))
}

/// A nullable timestamp column.
pub fn optional_timestamp(row: &AnyRow, column: &str) -> Result<Option<DateTime<Utc>>, DbError> {
    optional_text(row, column)?
        .map(|value| decode(column, &value))
        .transpose()
}

pub fn flag(value: bool) -> i64 {
    i64::from(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DbClient;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_text_is_stable() {
        let ts = Utc.with_ymd_and_hms(2025, 6, 1, 18, 0, 0).unwrap();
        let text = encode(&ts);
        assert_eq!(text, "2025-06-01T18:00:00.000Z");
        assert_eq!(decode("end_time", &text).unwrap(), ts);
        assert!(decode("end_time", "yesterday").is_err());
    }

    #[tokio::test]
    async fn test_nullable_columns_read_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("columns.db").display());
        let client = DbClient::from_url(&url).await.unwrap();

        let row = sqlx::query(
            "SELECT NULL AS missing, 'CSE' AS present, '2025-06-01T18:00:00.000Z' AS at, NULL AS never",
        )
        .fetch_one(client.pool())
        .await
        .unwrap();

        assert_eq!(optional_text(&row, "missing").unwrap(), None);
        assert_eq!(optional_text(&row, "present").unwrap(), Some("CSE".to_string()));
        assert_eq!(
            optional_timestamp(&row, "at").unwrap(),
            Some(Utc.with_ymd_and_hms(2025, 6, 1, 18, 0, 0).unwrap())
        );
        assert_eq!(optional_timestamp(&row, "never").unwrap(), None);
        assert!(optional_text(&row, "no_such_column").is_err());
    }
}
