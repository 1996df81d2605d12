//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, decompose path, secure/admin flags)
//!     → routing resolver (match, redirect or no match)
//!     → response.rs (FrontResponse → HTTP response)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestUuid, X_REQUEST_ID};
pub use server::HttpServer;
