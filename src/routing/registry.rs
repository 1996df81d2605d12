//! Front-name to module list registry.
//!
//! # Responsibilities
//! - Collect router declarations of one area into ordered module lists
//! - Apply before/after/append insertion directives in declared order
//! - Answer front-name lookups for the resolver
//!
//! # Design Decisions
//! - Built once, then shared read-only; runtime additions swap a whole new copy
//! - A directive resolves against the list as earlier directives left it, so
//!   the order of `[[extra]]` entries in config is part of the result
//! - Front-name and route name are the same string

use std::collections::BTreeMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::Serialize;

use crate::config::schema::{ExtraModule, RouterConfig, RouterDeclaration};

/// Modules claiming one front-name, highest priority first.
pub type ModuleList = Vec<String>;

/// Where an extra module lands relative to the modules already listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    Before(String),
    After(String),
    Append,
}

/// One extra module and where to put it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertionDirective {
    pub module: String,
    pub placement: Placement,
}

impl InsertionDirective {
    pub fn before(module: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            placement: Placement::Before(target.into()),
        }
    }

    pub fn after(module: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            placement: Placement::After(target.into()),
        }
    }

    pub fn append(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            placement: Placement::Append,
        }
    }
}

impl From<&ExtraModule> for InsertionDirective {
    /// `before` wins over `after`; an empty attribute counts as unset.
    fn from(extra: &ExtraModule) -> Self {
        let non_empty = |attr: &Option<String>| attr.clone().filter(|t| !t.is_empty());

        if let Some(target) = non_empty(&extra.before) {
            Self::before(extra.module.clone(), target)
        } else if let Some(target) = non_empty(&extra.after) {
            Self::after(extra.module.clone(), target)
        } else {
            Self::append(extra.module.clone())
        }
    }
}

/// Builds one module list from a base module and a sequence of directives.
#[derive(Debug, Clone)]
pub struct ModuleListBuilder {
    modules: ModuleList,
}

impl ModuleListBuilder {
    /// Seed the list with the base module.
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            modules: vec![base.into()],
        }
    }

    /// Apply one directive to the list as it currently stands.
    ///
    /// A missing `before` target inserts at the front; a missing `after`
    /// target appends. Directives with an empty module are ignored.
    pub fn apply(&mut self, directive: InsertionDirective) -> &mut Self {
        if directive.module.is_empty() {
            tracing::warn!(placement = ?directive.placement, "Skipping extra module without identifier");
            return self;
        }

        let index = match &directive.placement {
            Placement::Before(target) => self.position(target).unwrap_or(0),
            Placement::After(target) => self
                .position(target)
                .map(|i| i + 1)
                .unwrap_or(self.modules.len()),
            Placement::Append => self.modules.len(),
        };
        self.modules.insert(index, directive.module);
        self
    }

    fn position(&self, module: &str) -> Option<usize> {
        self.modules.iter().position(|m| m == module)
    }

    pub fn build(self) -> ModuleList {
        self.modules
    }
}

/// Supplies router declarations per configuration area.
pub trait DeclarationSource {
    /// Declarations of `area` in file order; empty for an unknown area.
    fn router_declarations(&self, area: &str) -> &[RouterDeclaration];
}

impl DeclarationSource for RouterConfig {
    fn router_declarations(&self, area: &str) -> &[RouterDeclaration] {
        self.areas
            .get(area)
            .map(|a| a.routers.as_slice())
            .unwrap_or(&[])
    }
}

/// Mapping of front-name to the ordered modules that may serve it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ModuleRegistry {
    modules: BTreeMap<String, ModuleList>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry holding every router of `area` that uses `router_name`.
    pub fn from_source(source: &impl DeclarationSource, area: &str, router_name: &str) -> Self {
        let mut registry = Self::new();
        registry.build_for(source, area, router_name);
        registry
    }

    /// Collect the module lists of `area` whose declarations use `router_name`.
    ///
    /// Each list is stored under the declaring router's own name.
    pub fn build_for(&mut self, source: &impl DeclarationSource, area: &str, router_name: &str) {
        for declaration in source.router_declarations(area) {
            if declaration.use_router != router_name {
                continue;
            }

            let mut builder = ModuleListBuilder::new(declaration.module.clone());
            for extra in &declaration.extra {
                builder.apply(InsertionDirective::from(extra));
            }
            let modules = builder.build();

            tracing::debug!(
                area = %area,
                front_name = %declaration.name,
                modules = ?modules,
                "Collected router modules"
            );
            self.add_module(declaration.name.clone(), modules);
        }
    }

    /// Register `modules` for `front_name`, replacing any existing list.
    pub fn add_module(&mut self, front_name: impl Into<String>, modules: ModuleList) -> &mut Self {
        self.modules.insert(front_name.into(), modules);
        self
    }

    /// Modules registered for `front_name`.
    pub fn lookup(&self, front_name: &str) -> Option<&[String]> {
        self.modules.get(front_name).map(Vec::as_slice)
    }

    /// Front-name used by the route `route_name`.
    pub fn front_name_for_route(&self, route_name: &str) -> Option<&str> {
        self.registered_key(route_name)
    }

    /// Route name served under `front_name`.
    pub fn route_for_front_name(&self, front_name: &str) -> Option<&str> {
        self.registered_key(front_name)
    }

    fn registered_key(&self, name: &str) -> Option<&str> {
        self.modules.get_key_value(name).map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// Registry handle shared by concurrent resolvers.
///
/// Readers take a snapshot; writers publish a modified copy.
#[derive(Debug)]
pub struct SharedRegistry {
    inner: ArcSwap<ModuleRegistry>,
}

impl SharedRegistry {
    pub fn new(registry: ModuleRegistry) -> Self {
        Self {
            inner: ArcSwap::from_pointee(registry),
        }
    }

    /// Current registry snapshot.
    pub fn load(&self) -> Arc<ModuleRegistry> {
        self.inner.load_full()
    }

    /// Publish a registry with `modules` registered under `front_name`.
    pub fn add_module(&self, front_name: &str, modules: ModuleList) {
        self.inner.rcu(|current| {
            let mut next = ModuleRegistry::clone(current);
            next.add_module(front_name, modules.clone());
            next
        });
        tracing::info!(front_name = %front_name, "Registered front-name");
    }
}

impl From<ModuleRegistry> for SharedRegistry {
    fn from(registry: ModuleRegistry) -> Self {
        Self::new(registry)
    }
}
