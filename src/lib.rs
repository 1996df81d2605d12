//! Front-name router.
//!
//! Maps the first path segment of a request to an ordered list of modules and
//! dispatches the first module whose controller serves the requested action.

pub mod config;
pub mod controllers;
pub mod http;
pub mod observability;
pub mod routing;

pub use config::RouterConfig;
pub use http::HttpServer;
pub use routing::{ModuleRegistry, RouteResolver};
