use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::error::{StorageError, StorageResult};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed store for submissions, accounts and tokens.
///
/// Each operation opens its own connection on the blocking thread pool, so
/// a clone of this handle can be shared freely between request handlers.
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    db_path: PathBuf,
}

impl SqliteStorage {
    pub fn new(db_path: impl AsRef<Path>) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
        }
    }

    pub async fn init(&self) -> StorageResult<()> {
        self.with_connection(|connection| {
            connection.execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS submissions (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    text TEXT NOT NULL CHECK (length(text) BETWEEN 32 AND 4096),
                    summary TEXT,
                    bullet_points TEXT,
                    created_at TEXT NOT NULL,
                    CHECK (summary IS NULL OR bullet_points IS NULL)
                );

                CREATE TABLE IF NOT EXISTS users (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    username TEXT NOT NULL UNIQUE,
                    email TEXT NOT NULL DEFAULT '',
                    password_hash TEXT NOT NULL,
                    created_at TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS auth_tokens (
                    key TEXT PRIMARY KEY,
                    user_id INTEGER NOT NULL UNIQUE,
                    created_at TEXT NOT NULL,
                    FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
                );

                CREATE INDEX IF NOT EXISTS idx_submissions_created_at ON submissions(created_at);
                "#,
            )?;
            Ok(())
        })
        .await?;

        log::info!("SQLite storage ready at {:?}", self.db_path);
        Ok(())
    }

    pub(crate) async fn with_connection<T, F>(&self, func: F) -> StorageResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> StorageResult<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = open_connection(&db_path)?;
            func(&mut connection)
        })
        .await
        .map_err(|error| StorageError::Task(error.to_string()))?
    }
}

fn open_connection(path: &Path) -> StorageResult<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let connection = Connection::open(path)?;
    connection.busy_timeout(BUSY_TIMEOUT)?;
    connection.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        PRAGMA foreign_keys = ON;
        PRAGMA synchronous = NORMAL;
        "#,
    )?;
    Ok(connection)
}

pub(crate) fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339()
}

pub(crate) fn parse_timestamp(raw: String) -> StorageResult<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(&raw)?.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    #[tokio::test]
    async fn init_is_idempotent_and_creates_parent_dirs() {
        let dir = tempdir().expect("temp dir");
        let storage = SqliteStorage::new(dir.path().join("nested/data/summarizer.db"));

        storage.init().await.expect("first init");
        storage.init().await.expect("second init");

        assert!(dir.path().join("nested/data/summarizer.db").exists());
    }

    #[test]
    fn timestamps_round_trip() {
        let timestamp = Utc.with_ymd_and_hms(2024, 3, 9, 8, 30, 15).unwrap();
        let parsed = parse_timestamp(format_timestamp(timestamp)).unwrap();
        assert_eq!(parsed, timestamp);
    }

    #[test]
    fn invalid_timestamp_is_an_error() {
        assert!(matches!(
            parse_timestamp("yesterday".to_string()),
            Err(StorageError::Chrono(_))
        ));
    }
}
