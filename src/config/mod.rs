//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RouterConfig (validated, immutable)
//!     → module registry built once per area
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Router declarations keep their file order, which decides module priority

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    AdminConfig, AreaConfig, ControllerConfig, ControllerKind, ExtraModule, ListenerConfig,
    ModuleConfig, ObservabilityConfig, RouterConfig, RouterDeclaration, ServerConfig, WebConfig,
};
pub use validation::ValidationError;
