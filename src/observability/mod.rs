//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Every request:
//!     → access_log.rs (arrival + completion records, JSON lines)
//!     → metrics.rs (request counter, latency histogram)
//!
//! Consumers:
//!     → Log aggregation (stdout, remote collector)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Access records are structured JSON for machine parsing
//! - A request ID correlates the arrival and completion records of one
//!   request when concurrent requests interleave
//! - The middleware observes responses without mutating them

pub mod access_log;
pub mod logging;
pub mod metrics;
