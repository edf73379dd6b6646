//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     Optional TOML file (loader.rs)
//!     → Environment overrides (PORT, LOG_LEVEL)
//!     → Validation
//!     → AppConfig handed to server + subscriber
//! ```
//!
//! # Design Decisions
//! - Every section has defaults; a missing config file is not an error
//! - Environment variables win over the file
//! - Validation fails fast at startup, never at request time

pub mod loader;
pub mod schema;

pub use loader::{load, load_config, ConfigError};
pub use schema::{
    AppConfig, ListenerConfig, LoggingConfig, ObservabilityConfig, StaticAssetsConfig,
};
