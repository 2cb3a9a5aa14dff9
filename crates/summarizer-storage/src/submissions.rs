use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};
use summarizer_core::{GeneratedOutput, OutputKind, SubmissionRecord};

use crate::connection::{format_timestamp, parse_timestamp, SqliteStorage};
use crate::error::StorageResult;

#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Inserts a new record holding `text` and the one derived field
    /// carried by `output`. Always creates a new row.
    async fn insert(&self, text: &str, output: &GeneratedOutput) -> StorageResult<SubmissionRecord>;

    async fn get(&self, id: i64) -> StorageResult<Option<SubmissionRecord>>;

    async fn count(&self) -> StorageResult<u64>;
}

#[async_trait]
impl SubmissionStore for SqliteStorage {
    async fn insert(&self, text: &str, output: &GeneratedOutput) -> StorageResult<SubmissionRecord> {
        let text = text.to_string();
        let (summary, bullet_points) = match output.kind() {
            OutputKind::Summary => (Some(output.content().to_string()), None),
            OutputKind::BulletPoints => (None, Some(output.content().to_string())),
        };
        let created_at = Utc::now();

        self.with_connection(move |connection| {
            connection.execute(
                r#"
                INSERT INTO submissions (text, summary, bullet_points, created_at)
                VALUES (?1, ?2, ?3, ?4)
                "#,
                params![text, summary, bullet_points, format_timestamp(created_at)],
            )?;
            let id = connection.last_insert_rowid();

            Ok(SubmissionRecord {
                id,
                text,
                summary,
                bullet_points,
                created_at,
            })
        })
        .await
    }

    async fn get(&self, id: i64) -> StorageResult<Option<SubmissionRecord>> {
        self.with_connection(move |connection| {
            let row = connection
                .query_row(
                    r#"
                    SELECT id, text, summary, bullet_points, created_at
                    FROM submissions
                    WHERE id = ?1
                    "#,
                    params![id],
                    read_row,
                )
                .optional()?;

            row.map(into_record).transpose()
        })
        .await
    }

    async fn count(&self) -> StorageResult<u64> {
        self.with_connection(|connection| {
            let count: i64 =
                connection.query_row("SELECT COUNT(*) FROM submissions", [], |row| row.get(0))?;
            Ok(count.max(0) as u64)
        })
        .await
    }
}

type RawSubmission = (i64, String, Option<String>, Option<String>, String);

fn read_row(row: &Row<'_>) -> rusqlite::Result<RawSubmission> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
}

fn into_record(raw: RawSubmission) -> StorageResult<SubmissionRecord> {
    let (id, text, summary, bullet_points, created_at) = raw;
    Ok(SubmissionRecord {
        id,
        text,
        summary,
        bullet_points,
        created_at: parse_timestamp(created_at)?,
    })
}
