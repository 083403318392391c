//! SQLite implementation of the mirror store.

use std::str::FromStr;

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection};

use crate::config::GempaConfig;
use crate::domain::snapshot::SnapshotData;
use crate::domain::{Document, SnapshotRecord};
use crate::error::GempaError;

/// Logical database name.
pub const DB_NAME: &str = "gempaDB";

/// Schema version, kept in SQLite's `user_version`.
pub const DB_VERSION: i64 = 1;

/// Whether the platform offers a local database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorSupport {
    /// No local database; mirroring is a logged no-op.
    Unsupported,
    /// SQLite database at the given connection string.
    Sqlite {
        /// `sqlite://` connection string.
        database_url: String,
    },
}

/// Writes page snapshots into the `gempa` table.
///
/// Each call opens the database, upgrades the schema if needed, writes one
/// record inside a transaction, and closes the handle again.
#[derive(Debug, Clone)]
pub struct MirrorStore {
    support: MirrorSupport,
}

impl MirrorStore {
    /// Creates a store for the given platform support.
    #[must_use]
    pub const fn new(support: MirrorSupport) -> Self {
        Self { support }
    }

    /// Creates a store from the service configuration.
    #[must_use]
    pub fn from_config(config: &GempaConfig) -> Self {
        if config.mirror_enabled {
            Self::new(MirrorSupport::Sqlite {
                database_url: config.mirror_database_url.clone(),
            })
        } else {
            Self::new(MirrorSupport::Unsupported)
        }
    }

    /// Snapshots the current text of `document`.
    ///
    /// Returns the written record, or `None` when nothing was written. Never
    /// fails: every error is logged here.
    pub async fn mirror(&self, document: &Document) -> Option<SnapshotRecord> {
        let MirrorSupport::Sqlite { database_url } = &self.support else {
            tracing::info!("local database is not supported on this platform");
            return None;
        };

        let mut conn = match open(database_url).await {
            Ok(conn) => conn,
            Err(err) => {
                tracing::error!(error = %err, db = DB_NAME, "error opening local database");
                return None;
            }
        };
        tracing::debug!(db = DB_NAME, "local database opened");

        let written = match put_snapshot(&mut conn, document).await {
            Ok(record) => {
                tracing::info!(key = %record.captured_at, "earthquake data stored in local database");
                Some(record)
            }
            Err(err) => {
                tracing::error!(error = %err, "error writing snapshot");
                None
            }
        };

        if let Err(err) = conn.close().await {
            tracing::warn!(error = %err, "error closing local database");
        }
        written
    }

    /// Loads the most recent snapshot, if any.
    ///
    /// # Errors
    ///
    /// Returns [`GempaError::Mirror`] if the database cannot be opened or
    /// read, or a stored row is not a valid snapshot.
    pub async fn latest(&self) -> Result<Option<SnapshotRecord>, GempaError> {
        let MirrorSupport::Sqlite { database_url } = &self.support else {
            return Ok(None);
        };

        let mut conn = open(database_url).await?;
        let row = sqlx::query_as::<_, (String, String)>(
            "SELECT tanggal, data FROM gempa ORDER BY tanggal DESC LIMIT 1",
        )
        .fetch_optional(&mut conn)
        .await;
        conn.close().await?;

        let Some((captured_at, data)) = row? else {
            return Ok(None);
        };
        let data: SnapshotData =
            serde_json::from_str(&data).map_err(|e| GempaError::Mirror(e.to_string()))?;
        Ok(Some(SnapshotRecord { captured_at, data }))
    }
}

async fn open(database_url: &str) -> Result<SqliteConnection, GempaError> {
    let mut conn = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .connect()
        .await?;
    upgrade(&mut conn).await?;
    Ok(conn)
}

/// Creates the `gempa` table and its `tanggal` index on first open.
///
/// The index mirrors the key and is never queried; it stays part of the
/// version 1 schema.
async fn upgrade(conn: &mut SqliteConnection) -> Result<(), GempaError> {
    let version: i64 = sqlx::query_scalar("PRAGMA user_version")
        .fetch_one(&mut *conn)
        .await?;
    if version >= DB_VERSION {
        return Ok(());
    }

    tracing::info!(from = version, to = DB_VERSION, "upgrading local database");
    let mut tx = conn.begin().await?;
    sqlx::query("CREATE TABLE IF NOT EXISTS gempa (tanggal TEXT PRIMARY KEY NOT NULL, data TEXT NOT NULL)")
        .execute(&mut *tx)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS tanggal ON gempa (tanggal)")
        .execute(&mut *tx)
        .await?;
    sqlx::query("PRAGMA user_version = 1")
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}

async fn put_snapshot(
    conn: &mut SqliteConnection,
    document: &Document,
) -> Result<SnapshotRecord, GempaError> {
    let mut tx = conn.begin().await?;
    let record = SnapshotRecord::capture(document, Utc::now());
    let data = serde_json::to_string(&record.data)?;

    sqlx::query("INSERT OR REPLACE INTO gempa (tanggal, data) VALUES (?1, ?2)")
        .bind(&record.captured_at)
        .bind(data)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(record)
}
