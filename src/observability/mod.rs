//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Registry build, resolver, secure check, HTTP layer:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;
