//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → access log middleware (arrival record)
//!     → handlers.rs (probe / query / toggle / fallback)
//!     → access log middleware (completion record)
//!     → Send to client
//! ```

pub mod handlers;
pub mod server;

pub use handlers::AppState;
pub use server::HttpServer;
