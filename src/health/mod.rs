//! Health state subsystem.
//!
//! # State Machine
//! ```text
//! Healthy ←→ Unhealthy
//!     Single transition: Toggle (flips unconditionally)
//!     Initial state: Healthy
//!     Lives for the process lifetime; never persisted
//! ```
//!
//! # Design Decisions
//! - The flag is an owned, injectable handle, not a module-level global
//! - Atomic flip keeps concurrent toggles linearizable
//! - Toggles are logged with the previous and new value

pub mod state;

pub use state::HealthFlag;
