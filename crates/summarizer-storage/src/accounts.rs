use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, ErrorCode, OptionalExtension, Row, TransactionBehavior};
use summarizer_core::{generate_token_key, Account, AuthToken};

use crate::connection::{format_timestamp, parse_timestamp, SqliteStorage};
use crate::error::{StorageError, StorageResult};

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> StorageResult<Account>;

    async fn find_by_username(&self, username: &str) -> StorageResult<Option<Account>>;

    /// Returns the account's token, creating it on first use. Concurrent
    /// callers for the same account all receive the same key.
    async fn get_or_create_token(&self, user_id: i64) -> StorageResult<AuthToken>;

    async fn find_by_token(&self, key: &str) -> StorageResult<Option<Account>>;
}

#[async_trait]
impl AccountStore for SqliteStorage {
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> StorageResult<Account> {
        let username = username.to_string();
        let email = email.to_string();
        let password_hash = password_hash.to_string();
        let created_at = Utc::now();

        self.with_connection(move |connection| {
            let inserted = connection.execute(
                r#"
                INSERT INTO users (username, email, password_hash, created_at)
                VALUES (?1, ?2, ?3, ?4)
                "#,
                params![username, email, password_hash, format_timestamp(created_at)],
            );

            match inserted {
                Ok(_) => {}
                Err(rusqlite::Error::SqliteFailure(error, _))
                    if error.code == ErrorCode::ConstraintViolation =>
                {
                    return Err(StorageError::DuplicateUsername(username));
                }
                Err(error) => return Err(error.into()),
            }

            Ok(Account {
                id: connection.last_insert_rowid(),
                username,
                email,
                password_hash,
                created_at,
            })
        })
        .await
    }

    async fn find_by_username(&self, username: &str) -> StorageResult<Option<Account>> {
        let username = username.to_string();

        self.with_connection(move |connection| {
            let row = connection
                .query_row(
                    r#"
                    SELECT id, username, email, password_hash, created_at
                    FROM users
                    WHERE username = ?1
                    "#,
                    params![username],
                    read_account_row,
                )
                .optional()?;

            row.map(into_account).transpose()
        })
        .await
    }

    async fn get_or_create_token(&self, user_id: i64) -> StorageResult<AuthToken> {
        let candidate = generate_token_key();
        let created_at = format_timestamp(Utc::now());

        self.with_connection(move |connection| {
            let transaction = connection.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let inserted = transaction.execute(
                "INSERT OR IGNORE INTO auth_tokens (key, user_id, created_at) VALUES (?1, ?2, ?3)",
                params![candidate, user_id, created_at],
            )?;

            let token = transaction
                .query_row(
                    "SELECT key, user_id, created_at FROM auth_tokens WHERE user_id = ?1",
                    params![user_id],
                    |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, i64>(1)?,
                            row.get::<_, String>(2)?,
                        ))
                    },
                )
                .optional()?;
            transaction.commit()?;

            let Some((key, user_id, created_at)) = token else {
                return Err(StorageError::InvalidData(format!(
                    "no token stored for user {user_id}"
                )));
            };

            if inserted > 0 {
                log::info!("Issued new API token for user {}", user_id);
            }

            Ok(AuthToken {
                key,
                user_id,
                created_at: parse_timestamp(created_at)?,
            })
        })
        .await
    }

    async fn find_by_token(&self, key: &str) -> StorageResult<Option<Account>> {
        let key = key.to_string();

        self.with_connection(move |connection| {
            let row = connection
                .query_row(
                    r#"
                    SELECT u.id, u.username, u.email, u.password_hash, u.created_at
                    FROM auth_tokens t
                    JOIN users u ON u.id = t.user_id
                    WHERE t.key = ?1
                    "#,
                    params![key],
                    read_account_row,
                )
                .optional()?;

            row.map(into_account).transpose()
        })
        .await
    }
}

type RawAccount = (i64, String, String, String, String);

fn read_account_row(row: &Row<'_>) -> rusqlite::Result<RawAccount> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
}

fn into_account(raw: RawAccount) -> StorageResult<Account> {
    let (id, username, email, password_hash, created_at) = raw;
    Ok(Account {
        id,
        username,
        email,
        password_hash,
        created_at: parse_timestamp(created_at)?,
    })
}
