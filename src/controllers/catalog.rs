//! Controller catalog backed by the `[[modules]]` configuration.
//!
//! Every configured controller counts as present in its module. A controller
//! that declares a `class` other than the conventional one models a source
//! that loads but does not define what the router expects.

use std::collections::{HashMap, HashSet};

use serde_json::json;

use crate::config::schema::{ControllerConfig, ControllerKind, ModuleConfig};
use crate::controllers::{Capability, Controller, ControllerClass, ControllerLocator};
use crate::routing::error::RouteError;
use crate::routing::request::{FrontRequest, FrontResponse};

/// Locator over a fixed set of modules and their controllers.
#[derive(Debug, Clone, Default)]
pub struct CatalogLocator {
    modules: HashMap<String, HashMap<String, ControllerConfig>>,
}

impl CatalogLocator {
    pub fn new(modules: &[ModuleConfig]) -> Self {
        let modules = modules
            .iter()
            .map(|module| {
                let controllers = module
                    .controllers
                    .iter()
                    .map(|c| (c.name.clone(), c.clone()))
                    .collect();
                (module.name.clone(), controllers)
            })
            .collect();
        Self { modules }
    }

    fn controller(&self, module: &str, controller: &str) -> Option<&ControllerConfig> {
        self.modules.get(module)?.get(controller)
    }
}

impl ControllerLocator for CatalogLocator {
    fn resolve_class(
        &self,
        module: &str,
        controller: &str,
    ) -> Result<Option<ControllerClass>, RouteError> {
        let Some(config) = self.controller(module, controller) else {
            return Ok(None);
        };

        let class = ControllerClass::conventional(module, controller);
        match &config.class {
            Some(declared) if *declared != class.name => {
                tracing::error!(
                    module = %module,
                    expected = %class.name,
                    declared = %declared,
                    "Controller source declares an unexpected class"
                );
                Err(RouteError::ControllerClassMissing {
                    module: module.to_string(),
                    class: class.name,
                })
            }
            _ => Ok(Some(class)),
        }
    }

    fn instantiate(
        &self,
        class: &ControllerClass,
        _request: &FrontRequest,
        _response: &FrontResponse,
    ) -> Option<Box<dyn Controller>> {
        let config = self.controller(&class.module, &class.controller)?;
        Some(Box::new(CatalogController {
            class: class.clone(),
            capability: match config.kind {
                ControllerKind::Front => Capability::FrontAction,
                ControllerKind::Admin => Capability::Admin,
            },
            actions: config.actions.iter().cloned().collect(),
        }))
    }
}

/// Controller whose actions echo the dispatched route as JSON.
#[derive(Debug)]
struct CatalogController {
    class: ControllerClass,
    capability: Capability,
    actions: HashSet<String>,
}

impl Controller for CatalogController {
    fn capability(&self) -> Capability {
        self.capability
    }

    fn has_action(&self, action: &str) -> bool {
        self.actions.contains(action)
    }

    fn dispatch(&mut self, action: &str, request: &mut FrontRequest, response: &mut FrontResponse) {
        let body = json!({
            "route": request.route_name(),
            "module": self.class.module,
            "controller": self.class.controller,
            "class": self.class.name,
            "action": action,
        });
        response.set_body("application/json", body.to_string());
    }
}
