//! Lifecycle management subsystem.
//!
//! Startup is ordered (config, then logging, then listener); shutdown is a
//! broadcast signal every long-running task subscribes to.

pub mod shutdown;

pub use shutdown::Shutdown;
