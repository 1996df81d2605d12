//! Request resolution and dispatch.
//!
//! # Responsibilities
//! - Reject requests this router must not handle (administrative context)
//! - Read front-name, controller and action from the request
//! - Probe the front-name's modules in order for a controller with the action
//! - Enforce secure transport while probing
//! - Record the decision on the request and dispatch the winning controller
//!
//! # Design Decisions
//! - First viable module wins; list order is the only tie-break
//! - A missing segment or unknown front-name is a no-match, never an error
//! - A broken controller source aborts resolution with [`RouteError`]
//! - Secure redirects end resolution with [`MatchOutcome::Redirected`]

use std::sync::Arc;
use std::time::Instant;

use crate::config::schema::RouterConfig;
use crate::controllers::{Capability, CatalogLocator, Controller, ControllerClass, ControllerLocator};
use crate::observability::metrics;
use crate::routing::error::RouteError;
use crate::routing::registry::{ModuleRegistry, SharedRegistry};
use crate::routing::request::{FrontRequest, FrontResponse};
use crate::routing::security::{SecureCheck, TransportSecurity};

/// Request parameter holding the front-name path the framework matched.
pub const FRONT_ROUTE_PARAM: &str = "front_route";

/// Hooks that can veto resolution of a request.
pub trait MatchGuard: Send + Sync {
    /// Runs before anything is read from the request.
    fn before_match(&self, _request: &FrontRequest) -> bool {
        true
    }

    /// Runs once the segments are known and the front-name is registered.
    fn after_match(&self, _request: &FrontRequest) -> bool {
        true
    }
}

/// Keeps the front router out of the administrative context.
#[derive(Debug, Clone, Copy, Default)]
pub struct StorefrontGuard;

impl MatchGuard for StorefrontGuard {
    fn before_match(&self, request: &FrontRequest) -> bool {
        !request.is_admin_context()
    }
}

/// Route segment read from the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    FrontName,
    Controller,
    Action,
}

/// Why a request was not matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoMatchReason {
    /// `before_match` vetoed the request.
    Vetoed,
    /// A route segment was missing or empty.
    MissingSegment(Segment),
    /// No modules are registered for the front-name.
    UnknownFrontName(String),
    /// `after_match` vetoed the request.
    AfterMatchVetoed,
    /// No module ships a front controller with the action.
    NoViableCandidate,
}

/// The winning module and the controller it dispatched.
pub struct ResolvedRoute {
    pub front_name: String,
    pub controller_module: String,
    pub class: ControllerClass,
    pub action: String,
    pub route_name: String,
    pub controller: Box<dyn Controller>,
}

impl std::fmt::Debug for ResolvedRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedRoute")
            .field("front_name", &self.front_name)
            .field("controller_module", &self.controller_module)
            .field("class", &self.class)
            .field("action", &self.action)
            .field("route_name", &self.route_name)
            .finish_non_exhaustive()
    }
}

/// Result of resolving one request.
#[derive(Debug)]
pub enum MatchOutcome {
    /// A controller was found and dispatched.
    Matched(ResolvedRoute),
    /// This router does not serve the request.
    NoMatch(NoMatchReason),
    /// A secure redirect was sent; the request is complete.
    Redirected { location: String },
}

impl MatchOutcome {
    pub fn is_matched(&self) -> bool {
        matches!(self, MatchOutcome::Matched(_))
    }

    /// Short label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            MatchOutcome::Matched(_) => "matched",
            MatchOutcome::NoMatch(_) => "no_match",
            MatchOutcome::Redirected { .. } => "redirected",
        }
    }
}

/// Resolves requests against the module registry.
pub struct RouteResolver {
    registry: Arc<SharedRegistry>,
    locator: Arc<dyn ControllerLocator>,
    security: TransportSecurity,
    guard: Box<dyn MatchGuard>,
}

impl RouteResolver {
    pub fn new(
        registry: Arc<SharedRegistry>,
        locator: Arc<dyn ControllerLocator>,
        security: TransportSecurity,
    ) -> Self {
        Self {
            registry,
            locator,
            security,
            guard: Box::new(StorefrontGuard),
        }
    }

    /// Resolver for the area and router name selected in `config`, backed by
    /// the configured controller catalog.
    pub fn from_config(config: &RouterConfig) -> Self {
        let registry = ModuleRegistry::from_source(config, &config.server.area, &config.server.router_name);
        tracing::info!(
            area = %config.server.area,
            router_name = %config.server.router_name,
            front_names = registry.len(),
            "Module registry built"
        );

        Self::new(
            Arc::new(SharedRegistry::new(registry)),
            Arc::new(CatalogLocator::new(&config.modules)),
            TransportSecurity::from_config(&config.web),
        )
    }

    pub fn with_guard(mut self, guard: impl MatchGuard + 'static) -> Self {
        self.guard = Box::new(guard);
        self
    }

    pub fn registry(&self) -> &Arc<SharedRegistry> {
        &self.registry
    }

    /// Resolve `request`, dispatching the winning controller into `response`.
    pub fn match_request(
        &self,
        request: &mut FrontRequest,
        response: &mut FrontResponse,
    ) -> Result<MatchOutcome, RouteError> {
        let start_time = Instant::now();
        let result = self.resolve(request, response);

        match &result {
            Ok(outcome) => {
                tracing::debug!(
                    method = %request.method(),
                    path = %request.path_info(),
                    outcome = outcome.label(),
                    "Resolution finished"
                );
                metrics::record_resolution(outcome.label(), start_time);
            }
            Err(e) => {
                tracing::error!(
                    method = %request.method(),
                    path = %request.path_info(),
                    error = %e,
                    "Resolution failed"
                );
                metrics::record_resolution("error", start_time);
            }
        }
        result
    }

    fn resolve(
        &self,
        request: &mut FrontRequest,
        response: &mut FrontResponse,
    ) -> Result<MatchOutcome, RouteError> {
        if !self.guard.before_match(request) {
            return Ok(MatchOutcome::NoMatch(NoMatchReason::Vetoed));
        }

        let Some(front_name) = segment(request.module_name()) else {
            return Ok(MatchOutcome::NoMatch(NoMatchReason::MissingSegment(Segment::FrontName)));
        };
        let Some(controller_name) = segment(request.controller_name()) else {
            return Ok(MatchOutcome::NoMatch(NoMatchReason::MissingSegment(Segment::Controller)));
        };
        let Some(action) = segment(request.action_name()) else {
            return Ok(MatchOutcome::NoMatch(NoMatchReason::MissingSegment(Segment::Action)));
        };

        let registry = self.registry.load();
        let Some(modules) = registry.lookup(&front_name) else {
            return Ok(MatchOutcome::NoMatch(NoMatchReason::UnknownFrontName(front_name)));
        };

        if !self.guard.after_match(request) {
            return Ok(MatchOutcome::NoMatch(NoMatchReason::AfterMatchVetoed));
        }

        let path = format!("/{}/{}/{}", front_name, controller_name, action);
        let mut found = None;

        for module in modules {
            metrics::record_candidate_probe();

            if let SecureCheck::Redirect(location) = self.security.check(request, response, &path) {
                return Ok(MatchOutcome::Redirected { location });
            }

            let Some(class) = self.locator.resolve_class(module, &controller_name)? else {
                tracing::trace!(module = %module, controller = %controller_name, "Module has no such controller");
                continue;
            };

            let Some(controller) = self.locator.instantiate(&class, request, response) else {
                continue;
            };

            if controller.capability() != Capability::FrontAction {
                tracing::debug!(class = %class.name, "Skipping controller that is not a front action");
                continue;
            }

            if !controller.has_action(&action) {
                tracing::trace!(class = %class.name, action = %action, "Controller lacks action");
                continue;
            }

            found = Some((module.clone(), class, controller));
            break;
        }

        let Some((controller_module, class, mut controller)) = found else {
            return Ok(MatchOutcome::NoMatch(NoMatchReason::NoViableCandidate));
        };

        let route_name = request
            .param(FRONT_ROUTE_PARAM)
            .unwrap_or_default()
            .replace('/', "_");

        request
            .set_route_name(route_name.clone())
            .set_module_name(front_name.clone())
            .set_controller_module(controller_module.clone())
            .set_dispatched(true);

        tracing::debug!(
            front_name = %front_name,
            module = %controller_module,
            controller = %class.name,
            action = %action,
            "Dispatching controller"
        );
        controller.dispatch(&action, request, response);

        Ok(MatchOutcome::Matched(ResolvedRoute {
            front_name,
            controller_module,
            class,
            action,
            route_name,
            controller,
        }))
    }
}

fn segment(value: Option<&str>) -> Option<String> {
    value.filter(|s| !s.is_empty()).map(str::to_owned)
}
