//! Persistent storage layer, SQLite in WAL mode
//!
//! Holds two tables:
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │              ConfigurationStore               │
//! ├───────────────────────────────────────────────┤
//! │  users (unique email)  │  configurations      │
//! │                        │  (owner-scoped, FK)  │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use hwconf_core::storage::ConfigurationStore;
//!
//! # fn example() -> Result<(), hwconf_core::storage::StoreError> {
//! let store = ConfigurationStore::open("data/configurator.db")?;
//! let records = store.list_configurations(1)?;
//! # Ok(())
//! # }
//! ```

pub mod config_store;

pub use config_store::{
    ConfigurationRecord, ConfigurationStore, NewConfiguration, User, UserUpdate,
};

use thiserror::Error;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Email already registered")]
    EmailTaken,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
