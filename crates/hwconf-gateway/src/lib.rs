//! Hwconf Gateway - HTTP API for the hardware configurator
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                     Hwconf Gateway                     │
//! ├────────────────────────────────────────────────────────┤
//! │  /api/auth/*     /api/generate     /api/configurations │
//! │       │                │                    │          │
//! │  ┌────▼────┐   ┌───────▼───────┐            │          │
//! │  │  auth   │   │  recommend()  │            │          │
//! │  │ bcrypt  │   │ baseline + AI │            │          │
//! │  │  JWT    │   └───────┬───────┘            │          │
//! │  └────┬────┘           │                    │          │
//! │       └────────────────┼────────────────────┘          │
//! │               ┌────────▼─────────┐                     │
//! │               │ConfigurationStore│ (SQLite WAL)        │
//! │               └──────────────────┘                     │
//! └────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;

pub use auth::{AuthUser, Claims, TokenIssuer};
pub use config::{AuthSettings, GatewayConfig};
pub use error::{GatewayError, Result};
pub use gateway::{AppState, Gateway};

/// Gateway version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 3000;

/// Default host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default SQLite database location
pub const DEFAULT_DATABASE_PATH: &str = "data/configurator.db";
