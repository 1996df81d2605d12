//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use front_router::config::WebConfig;
use front_router::controllers::{Capability, Controller, ControllerClass, ControllerLocator};
use front_router::routing::{
    FrontRequest, FrontResponse, ModuleRegistry, RouteError, RouteResolver, SharedRegistry,
    TransportSecurity,
};

#[derive(Clone)]
enum Entry {
    Controller { actions: Vec<String>, capability: Capability },
    Broken,
}

/// Locator that counts every call and records dispatches.
#[derive(Default)]
pub struct CountingLocator {
    entries: HashMap<(String, String), Entry>,
    pub resolve_calls: AtomicUsize,
    pub instantiate_calls: AtomicUsize,
    pub dispatched: Arc<Mutex<Vec<(String, String)>>>,
}

impl CountingLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// `module` ships a front controller `controller` with `actions`.
    pub fn with_controller(self, module: &str, controller: &str, actions: &[&str]) -> Self {
        self.with_entry(
            module,
            controller,
            Entry::Controller {
                actions: actions.iter().map(|a| a.to_string()).collect(),
                capability: Capability::FrontAction,
            },
        )
    }

    /// `module` ships an admin controller, which the front router must skip.
    pub fn with_admin_controller(self, module: &str, controller: &str, actions: &[&str]) -> Self {
        self.with_entry(
            module,
            controller,
            Entry::Controller {
                actions: actions.iter().map(|a| a.to_string()).collect(),
                capability: Capability::Admin,
            },
        )
    }

    /// `module` has a controller source that does not declare its class.
    pub fn with_broken(self, module: &str, controller: &str) -> Self {
        self.with_entry(module, controller, Entry::Broken)
    }

    fn with_entry(mut self, module: &str, controller: &str, entry: Entry) -> Self {
        self.entries.insert((module.to_string(), controller.to_string()), entry);
        self
    }

    pub fn resolve_calls(&self) -> usize {
        self.resolve_calls.load(Ordering::SeqCst)
    }

    pub fn instantiate_calls(&self) -> usize {
        self.instantiate_calls.load(Ordering::SeqCst)
    }

    pub fn dispatched(&self) -> Vec<(String, String)> {
        self.dispatched.lock().unwrap().clone()
    }
}

impl ControllerLocator for CountingLocator {
    fn resolve_class(
        &self,
        module: &str,
        controller: &str,
    ) -> Result<Option<ControllerClass>, RouteError> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        match self.entries.get(&(module.to_string(), controller.to_string())) {
            None => Ok(None),
            Some(Entry::Broken) => Err(RouteError::ControllerClassMissing {
                module: module.to_string(),
                class: ControllerClass::conventional(module, controller).name,
            }),
            Some(Entry::Controller { .. }) => Ok(Some(ControllerClass::conventional(module, controller))),
        }
    }

    fn instantiate(
        &self,
        class: &ControllerClass,
        _request: &FrontRequest,
        _response: &FrontResponse,
    ) -> Option<Box<dyn Controller>> {
        self.instantiate_calls.fetch_add(1, Ordering::SeqCst);
        match self.entries.get(&(class.module.clone(), class.controller.clone()))? {
            Entry::Controller { actions, capability } => Some(Box::new(RecordingController {
                module: class.module.clone(),
                actions: actions.clone(),
                capability: *capability,
                dispatched: self.dispatched.clone(),
            })),
            Entry::Broken => None,
        }
    }
}

/// Controller that records which action it dispatched.
pub struct RecordingController {
    module: String,
    actions: Vec<String>,
    capability: Capability,
    dispatched: Arc<Mutex<Vec<(String, String)>>>,
}

impl Controller for RecordingController {
    fn capability(&self) -> Capability {
        self.capability
    }

    fn has_action(&self, action: &str) -> bool {
        self.actions.iter().any(|a| a == action)
    }

    fn dispatch(&mut self, action: &str, _request: &mut FrontRequest, response: &mut FrontResponse) {
        self.dispatched
            .lock()
            .unwrap()
            .push((self.module.clone(), action.to_string()));
        response.set_body("text/plain", format!("{}::{}", self.module, action));
    }
}

/// Plain http store that never asks for secure transport.
pub fn insecure_web() -> WebConfig {
    WebConfig {
        installed: true,
        unsecure_base_url: "http://shop.example/".into(),
        secure_base_url: "https://shop.example/".into(),
        secure_in_frontend: false,
        use_session_in_url: false,
        session_param: "___SID=U".into(),
        secure_paths: Vec::new(),
    }
}

/// Resolver over `front_name → modules` with the given locator and web settings.
pub fn build_resolver(
    front_name: &str,
    modules: &[&str],
    locator: Arc<CountingLocator>,
    web: &WebConfig,
) -> RouteResolver {
    let mut registry = ModuleRegistry::new();
    registry.add_module(front_name, modules.iter().map(|m| m.to_string()).collect());
    RouteResolver::new(
        Arc::new(SharedRegistry::new(registry)),
        locator,
        TransportSecurity::from_config(web),
    )
}
