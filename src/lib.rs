//! Toggleable health-check HTTP service.
//!
//! A small axum/tokio service exposing a mutable health flag for testing
//! health-monitoring integrations (load balancers, orchestrators, uptime
//! probes).
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │                HEALTH SWITCH                  │
//!                    │                                               │
//!   Client Request   │  ┌──────────┐   ┌─────────┐   ┌───────────┐  │
//!   ─────────────────┼─▶│  access  │──▶│  http   │──▶│  handlers │  │
//!                    │  │   log    │   │ router  │   │           │  │
//!                    │  └──────────┘   └─────────┘   └─────┬─────┘  │
//!                    │                                     │        │
//!                    │                                     ▼        │
//!                    │                              ┌───────────┐   │
//!   Client Response  │                              │  health   │   │
//!   ◀────────────────┼──────────────────────────────│   flag    │   │
//!                    │                              └───────────┘   │
//!                    │                                               │
//!                    │  ┌─────────────────────────────────────────┐  │
//!                    │  │          Cross-Cutting Concerns          │  │
//!                    │  │  ┌────────┐ ┌──────────────┐ ┌────────┐ │  │
//!                    │  │  │ config │ │observability │ │lifecycle│ │  │
//!                    │  │  └────────┘ └──────────────┘ └────────┘ │  │
//!                    │  └─────────────────────────────────────────┘  │
//!                    └──────────────────────────────────────────────┘
//! ```
//!
//! The health flag is the only shared mutable state. Every request passes
//! through the access-log middleware before routing; the middleware observes
//! the response on the way out without altering it.

// Core subsystems
pub mod config;
pub mod health;
pub mod http;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::AppConfig;
pub use health::HealthFlag;
pub use http::{AppState, HttpServer};
pub use lifecycle::Shutdown;
