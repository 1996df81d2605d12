//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registry Build (at startup):
//!     [[areas.<area>.routers]] with use == router name
//!     → registry.rs (seed base module, apply before/after/append extras)
//!     → front-name → ordered module list
//!     → shared read-only via SharedRegistry
//!
//! Incoming Request (front-name, controller, action)
//!     → resolver.rs (guards, segment checks, registry lookup)
//!     → for each module in order:
//!         security.rs (secure transport check, may redirect)
//!         controllers (resolve class, instantiate, has_action)
//!     → Return: Matched, NoMatch or Redirected
//! ```
//!
//! # Design Decisions
//! - Module lists built at startup, immutable at runtime
//! - Deterministic: same request and registry always pick the same module
//! - First match wins (ordered by module list position)

pub mod error;
pub mod registry;
pub mod request;
pub mod resolver;
pub mod security;

pub use error::RouteError;
pub use registry::{
    DeclarationSource, InsertionDirective, ModuleList, ModuleListBuilder, ModuleRegistry,
    Placement, SharedRegistry,
};
pub use request::{FrontRequest, FrontResponse};
pub use resolver::{
    MatchGuard, MatchOutcome, NoMatchReason, ResolvedRoute, RouteResolver, Segment,
    StorefrontGuard, FRONT_ROUTE_PARAM,
};
pub use security::{
    PrefixSecurePaths, RedirectBeautifier, SecureCheck, SecurePathPolicy, SessionQueryBeautifier,
    TransportSecurity, ADMIN_ROUTE_NAME,
};
