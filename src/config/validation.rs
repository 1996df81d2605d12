//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the served area exists and router declarations are complete
//! - Validate base URLs
//! - Validate value ranges (connection limit and timeout > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use thiserror::Error;
use url::Url;

use crate::config::schema::RouterConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("area '{area}' has a router without a name")]
    EmptyRouterName { area: String },

    #[error("router '{router}' in area '{area}' does not name the router it uses")]
    MissingUse { area: String, router: String },

    #[error("router '{router}' in area '{area}' has no base module")]
    EmptyBaseModule { area: String, router: String },

    #[error("router '{router}' is declared more than once in area '{area}'")]
    DuplicateRouter { area: String, router: String },

    #[error("served area '{0}' is not configured")]
    UnknownArea(String),

    #[error("{field} is not a valid URL: {value}")]
    InvalidBaseUrl { field: &'static str, value: String },

    #[error("listener.max_connections must be greater than 0")]
    ZeroMaxConnections,

    #[error("server.request_timeout_secs must be greater than 0")]
    ZeroRequestTimeout,

    #[error("catalog contains a module without a name")]
    EmptyModuleName,

    #[error("module '{0}' contains a controller without a name")]
    EmptyControllerName(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.max_connections == 0 {
        errors.push(ValidationError::ZeroMaxConnections);
    }
    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if !config.areas.is_empty() && !config.areas.contains_key(&config.server.area) {
        errors.push(ValidationError::UnknownArea(config.server.area.clone()));
    }

    for (area, area_config) in &config.areas {
        let mut seen = HashSet::new();
        for router in &area_config.routers {
            if router.name.is_empty() {
                errors.push(ValidationError::EmptyRouterName { area: area.clone() });
            } else if !seen.insert(router.name.as_str()) {
                errors.push(ValidationError::DuplicateRouter {
                    area: area.clone(),
                    router: router.name.clone(),
                });
            }
            if router.use_router.is_empty() {
                errors.push(ValidationError::MissingUse {
                    area: area.clone(),
                    router: router.name.clone(),
                });
            }
            if router.module.is_empty() {
                errors.push(ValidationError::EmptyBaseModule {
                    area: area.clone(),
                    router: router.name.clone(),
                });
            }
        }
    }

    for (field, value) in [
        ("web.unsecure_base_url", &config.web.unsecure_base_url),
        ("web.secure_base_url", &config.web.secure_base_url),
    ] {
        if Url::parse(value).is_err() {
            errors.push(ValidationError::InvalidBaseUrl {
                field,
                value: value.clone(),
            });
        }
    }

    for module in &config.modules {
        if module.name.is_empty() {
            errors.push(ValidationError::EmptyModuleName);
        }
        if module.controllers.iter().any(|c| c.name.is_empty()) {
            errors.push(ValidationError::EmptyControllerName(module.name.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
