//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration for the front router.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Listener configuration (bind address, connection cap).
    pub listener: ListenerConfig,

    /// Which area and router name this instance serves.
    pub server: ServerConfig,

    /// Administrative context settings.
    pub admin: AdminConfig,

    /// Store web settings (base URLs, secure transport).
    pub web: WebConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Router declarations keyed by configuration area (e.g. "frontend").
    pub areas: BTreeMap<String, AreaConfig>,

    /// Controller catalog: which controllers and actions each module ships.
    pub modules: Vec<ModuleConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum concurrent requests in flight.
    pub max_connections: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_connections: 10_000,
        }
    }
}

/// Selects the router declarations this instance collects.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Configuration area whose routers are collected.
    pub area: String,

    /// Declarations whose `use` equals this name are collected.
    pub router_name: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            area: "frontend".to_string(),
            router_name: "standard".to_string(),
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Front-name that puts a request into the administrative context.
    pub front_name: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            front_name: "admin".to_string(),
        }
    }
}

/// Store web settings consulted by the secure-transport check.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WebConfig {
    /// Whether the application has finished installation.
    pub installed: bool,

    /// Base URL used for plain links.
    pub unsecure_base_url: String,

    /// Base URL used for secure links.
    pub secure_base_url: String,

    /// Serve storefront pages flagged as secure over https.
    pub secure_in_frontend: bool,

    /// Propagate the session id through redirect URLs.
    pub use_session_in_url: bool,

    /// Query parameter appended to redirect URLs when the session travels in the URL.
    pub session_param: String,

    /// Path prefixes that must be served over secure transport.
    pub secure_paths: Vec<String>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            installed: true,
            unsecure_base_url: "http://localhost:8080/".to_string(),
            secure_base_url: "https://localhost/".to_string(),
            secure_in_frontend: false,
            use_session_in_url: false,
            session_param: "___SID=U".to_string(),
            secure_paths: Vec::new(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// All router declarations of one configuration area.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AreaConfig {
    pub routers: Vec<RouterDeclaration>,
}

/// One `[[areas.<area>.routers]]` entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouterDeclaration {
    /// Router name; becomes the front-name key.
    pub name: String,

    /// Router implementation this declaration is meant for.
    #[serde(rename = "use")]
    pub use_router: String,

    /// Base module the module list is seeded with.
    pub module: String,

    /// Extra modules, applied in declared order.
    #[serde(default)]
    pub extra: Vec<ExtraModule>,
}

/// An extra module contributed to a front-name by another extension.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ExtraModule {
    /// Missing or empty entries are skipped when the list is built.
    #[serde(default)]
    pub module: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
}

/// A module in the controller catalog.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModuleConfig {
    /// Module identifier (e.g. "Acme_Blog").
    pub name: String,

    #[serde(default)]
    pub controllers: Vec<ControllerConfig>,
}

/// A controller shipped by a catalog module.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ControllerConfig {
    /// Controller name as it appears in the URL.
    pub name: String,

    /// Action names the controller exposes.
    #[serde(default)]
    pub actions: Vec<String>,

    /// Capability of the controller.
    #[serde(default)]
    pub kind: ControllerKind,

    /// Class identifier the controller source actually declares.
    /// Defaults to the conventional name derived from module and controller.
    #[serde(default)]
    pub class: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ControllerKind {
    /// Storefront action controller.
    #[default]
    Front,
    /// Administrative controller; never served by the front router.
    Admin,
}
