//! ConfigurationStore: SQLite WAL storage for users and configuration records
//!
//! - WAL mode: readers never block the single writer
//! - Users: unique email, bcrypt hash stored opaque
//! - Configurations: create-only ledger scoped by owner

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use serde::Serialize;
use std::path::Path;

use super::{StoreError, StoreResult};
use crate::requirements::Requirements;
use crate::summary::AiSummary;

/// Registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial profile update; `None` leaves the column untouched
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.password_hash.is_none()
    }
}

/// Configuration to persist
#[derive(Debug, Clone)]
pub struct NewConfiguration<'a> {
    pub user_id: i64,
    pub requirements: &'a Requirements,
    pub summary: &'a AiSummary,
    pub used_ai: bool,
}

/// Persisted configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationRecord {
    pub id: i64,
    pub user_id: i64,
    pub requirements: serde_json::Value,
    pub best_fit_configuration: String,
    pub price_estimate: String,
    pub unit_price: String,
    pub total_price: String,
    pub reasoning: String,
    pub bulk_scaling: String,
    pub used_ai: bool,
    pub created_at: DateTime<Utc>,
}

const USER_COLUMNS: &str = "id, email, name, password, created_at_ms, updated_at_ms";

const CONFIGURATION_COLUMNS: &str = "id, user_id, requirements, best_fit_configuration, \
     price_estimate, unit_price, total_price, reasoning, bulk_scaling, used_ai, created_at_ms";

/// Store for users and their configuration history
#[derive(Debug)]
pub struct ConfigurationStore {
    conn: Connection,
}

impl ConfigurationStore {
    /// Open (or create) the database file in WAL mode.
    ///
    /// ```no_run
    /// use hwconf_core::storage::ConfigurationStore;
    /// let store = ConfigurationStore::open("data/configurator.db").unwrap();
    /// ```
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )?;

        let store = Self { conn };
        store.migrate()?;
        tracing::info!("Configuration store opened at {}", path.display());
        Ok(store)
    }

    /// Private in-memory database, for tests and throwaway runs
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Idempotent DDL
    fn migrate(&self) -> StoreResult<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS users (
                id             INTEGER PRIMARY KEY AUTOINCREMENT,
                email          TEXT NOT NULL UNIQUE,
                password       TEXT NOT NULL,
                name           TEXT,
                created_at_ms  INTEGER NOT NULL,
                updated_at_ms  INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS configurations (
                id                      INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id                 INTEGER NOT NULL REFERENCES users(id),
                requirements            TEXT NOT NULL,
                best_fit_configuration  TEXT NOT NULL,
                price_estimate          TEXT NOT NULL,
                unit_price              TEXT NOT NULL,
                total_price             TEXT NOT NULL,
                reasoning               TEXT NOT NULL,
                bulk_scaling            TEXT NOT NULL,
                used_ai                 INTEGER NOT NULL,
                created_at_ms           INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_configurations_owner
                ON configurations(user_id, created_at_ms DESC);
            ",
        )?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Users
    // ─────────────────────────────────────────────────────────────────────────

    pub fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        name: Option<&str>,
    ) -> StoreResult<User> {
        let now = Utc::now().timestamp_millis();
        self.conn
            .execute(
                "INSERT INTO users (email, password, name, created_at_ms, updated_at_ms)
                 VALUES (?1, ?2, ?3, ?4, ?4)",
                params![email, password_hash, name, now],
            )
            .map_err(email_conflict)?;

        let id = self.conn.last_insert_rowid();
        tracing::debug!(user_id = id, "User created");
        self.find_user_by_id(id)?
            .ok_or_else(|| StoreError::NotFound(format!("user {}", id)))
    }

    pub fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE email = ?1", USER_COLUMNS);
        let user = self
            .conn
            .query_row(&sql, params![email], user_from_row)
            .optional()?;
        Ok(user)
    }

    pub fn find_user_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS);
        let user = self
            .conn
            .query_row(&sql, params![id], user_from_row)
            .optional()?;
        Ok(user)
    }

    /// Apply a partial update and return the refreshed user
    pub fn update_user(&self, id: i64, update: &UserUpdate) -> StoreResult<User> {
        let now = Utc::now().timestamp_millis();
        let changed = self
            .conn
            .execute(
                "UPDATE users
                 SET name = COALESCE(?1, name),
                     email = COALESCE(?2, email),
                     password = COALESCE(?3, password),
                     updated_at_ms = ?4
                 WHERE id = ?5",
                params![update.name, update.email, update.password_hash, now, id],
            )
            .map_err(email_conflict)?;

        if changed == 0 {
            return Err(StoreError::NotFound(format!("user {}", id)));
        }
        self.find_user_by_id(id)?
            .ok_or_else(|| StoreError::NotFound(format!("user {}", id)))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Configurations
    // ─────────────────────────────────────────────────────────────────────────

    /// Append a configuration record. Records are never updated afterwards.
    pub fn insert_configuration(
        &self,
        new: &NewConfiguration<'_>,
    ) -> StoreResult<ConfigurationRecord> {
        let requirements_json = serde_json::to_string(new.requirements)?;
        let created_at_ms = Utc::now().timestamp_millis();

        self.conn.execute(
            "INSERT INTO configurations (
                user_id, requirements, best_fit_configuration, price_estimate,
                unit_price, total_price, reasoning, bulk_scaling, used_ai, created_at_ms
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                new.user_id,
                requirements_json,
                new.summary.best_fit_configuration,
                new.summary.price_estimate,
                new.summary.unit_price,
                new.summary.total_price,
                new.summary.reasoning,
                new.summary.bulk_scaling,
                new.used_ai,
                created_at_ms,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        tracing::debug!(
            configuration_id = id,
            user_id = new.user_id,
            used_ai = new.used_ai,
            "Configuration stored"
        );
        self.get_configuration(new.user_id, id)?
            .ok_or_else(|| StoreError::NotFound(format!("configuration {}", id)))
    }

    /// Fetch one record, only if it belongs to `user_id`
    pub fn get_configuration(
        &self,
        user_id: i64,
        id: i64,
    ) -> StoreResult<Option<ConfigurationRecord>> {
        let sql = format!(
            "SELECT {} FROM configurations WHERE id = ?1 AND user_id = ?2",
            CONFIGURATION_COLUMNS
        );
        let record = self
            .conn
            .query_row(&sql, params![id, user_id], configuration_from_row)
            .optional()?;
        Ok(record)
    }

    /// All records owned by `user_id`, newest first
    pub fn list_configurations(&self, user_id: i64) -> StoreResult<Vec<ConfigurationRecord>> {
        let sql = format!(
            "SELECT {} FROM configurations WHERE user_id = ?1
             ORDER BY created_at_ms DESC, id DESC",
            CONFIGURATION_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let records = stmt
            .query_map(params![user_id], configuration_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Round-trip a trivial query; returns the database clock
    pub fn ping(&self) -> StoreResult<DateTime<Utc>> {
        let secs: i64 = self.conn.query_row(
            "SELECT CAST(strftime('%s', 'now') AS INTEGER)",
            [],
            |row| row.get(0),
        )?;
        Ok(DateTime::from_timestamp(secs, 0).unwrap_or_default())
    }
}

fn email_conflict(e: rusqlite::Error) -> StoreError {
    if e.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) {
        StoreError::EmailTaken
    } else {
        StoreError::Sqlite(e)
    }
}

fn timestamp(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_default()
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        name: row.get(2)?,
        password_hash: row.get(3)?,
        created_at: timestamp(row.get(4)?),
        updated_at: timestamp(row.get(5)?),
    })
}

fn configuration_from_row(row: &Row<'_>) -> rusqlite::Result<ConfigurationRecord> {
    let requirements_text: String = row.get(2)?;
    // rows written by older clients may hold non-JSON text
    let requirements = serde_json::from_str(&requirements_text)
        .unwrap_or(serde_json::Value::String(requirements_text));

    Ok(ConfigurationRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        requirements,
        best_fit_configuration: row.get(3)?,
        price_estimate: row.get(4)?,
        unit_price: row.get(5)?,
        total_price: row.get(6)?,
        reasoning: row.get(7)?,
        bulk_scaling: row.get(8)?,
        used_ai: row.get(9)?,
        created_at: timestamp(row.get(10)?),
    })
}
