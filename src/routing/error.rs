//! Routing error types.

use thiserror::Error;

/// Failures that abort resolution of a request.
///
/// A request nothing can serve is not an error; it resolves to
/// [`MatchOutcome::NoMatch`](crate::routing::MatchOutcome::NoMatch).
#[derive(Debug, Error)]
pub enum RouteError {
    /// The controller source was found and loaded but does not declare the
    /// expected class. Points at a broken deployment, not a routing miss.
    #[error("controller source for module '{module}' was loaded but class '{class}' does not exist")]
    ControllerClassMissing { module: String, class: String },
}
