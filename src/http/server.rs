//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the front handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bound requests in flight with a semaphore
//! - Bind server to listener
//! - Hand every request to the route resolver

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::RouterConfig;
use crate::http::request::{front_request, is_forwarded_secure, request_id, RequestUuid};
use crate::http::response::{internal_error, not_found};
use crate::routing::request::FrontResponse;
use crate::routing::resolver::{MatchOutcome, RouteResolver};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<RouteResolver>,
    pub admin_front_name: String,
    /// Bounds requests in flight to `listener.max_connections`.
    pub request_limit: Arc<Semaphore>,
}

/// HTTP front for the route resolver.
pub struct HttpServer {
    router: Router,
    config: RouterConfig,
    resolver: Arc<RouteResolver>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RouterConfig) -> Self {
        let resolver = Arc::new(RouteResolver::from_config(&config));
        Self::with_resolver(config, resolver)
    }

    /// Create a server around an already built resolver.
    pub fn with_resolver(config: RouterConfig, resolver: Arc<RouteResolver>) -> Self {
        let state = AppState {
            resolver: resolver.clone(),
            admin_front_name: config.admin.front_name.clone(),
            request_limit: Arc::new(Semaphore::new(config.listener.max_connections)),
        };

        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            resolver,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RouterConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(front_handler))
            .route("/", any(front_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.server.request_timeout_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(RequestUuid))
    }

    /// Run the server until Ctrl+C.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        self.run_until(listener, shutdown_signal()).await
    }

    /// Run the server until `shutdown` completes.
    pub async fn run_until<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            area = %self.config.server.area,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The Axum router, for serving it under another listener or in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn resolver(&self) -> &Arc<RouteResolver> {
        &self.resolver
    }
}

/// Resolve the request and turn the outcome into a response.
async fn front_handler(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    let request_id = request_id(&headers);
    let Ok(_permit) = state.request_limit.clone().acquire_owned().await else {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    };

    let mut request = front_request(
        method,
        uri.path(),
        is_forwarded_secure(&headers),
        &state.admin_front_name,
    );
    let mut response = FrontResponse::new();

    match state.resolver.match_request(&mut request, &mut response) {
        Ok(MatchOutcome::Matched(route)) => {
            tracing::debug!(
                request_id = %request_id,
                module = %route.controller_module,
                action = %route.action,
                "Request dispatched"
            );
            response.into_response()
        }
        Ok(MatchOutcome::Redirected { location }) => {
            tracing::debug!(request_id = %request_id, location = %location, "Request redirected");
            response.into_response()
        }
        Ok(MatchOutcome::NoMatch(reason)) => {
            tracing::debug!(request_id = %request_id, path = %uri.path(), reason = ?reason, "No route matched");
            not_found()
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, path = %uri.path(), error = %e, "Routing failed");
            internal_error()
        }
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
