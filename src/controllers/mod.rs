//! Controller materialization.
//!
//! # Data Flow
//! ```text
//! (candidate module, controller name)
//!     → ControllerLocator::resolve_class (does the module ship it?)
//!     → ControllerLocator::instantiate  (build an instance for this request)
//!     → Controller::capability / has_action (can it serve the action?)
//!     → Controller::dispatch (only for the winning candidate)
//! ```
//!
//! # Design Decisions
//! - Locators are pluggable; the resolver never builds class names itself
//! - A source that is absent means "try the next module"; a source that is
//!   present but broken is a [`RouteError`]

pub mod catalog;

pub use catalog::CatalogLocator;

use crate::routing::error::RouteError;
use crate::routing::request::{FrontRequest, FrontResponse};

/// What kind of controller an instance is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Storefront action controller, servable by the front router.
    FrontAction,
    /// Administrative controller.
    Admin,
}

/// A controller instance created for one request.
pub trait Controller: Send {
    fn capability(&self) -> Capability;

    /// Whether `action` is an action of this controller.
    fn has_action(&self, action: &str) -> bool;

    /// Run `action`, writing its output into `response`.
    fn dispatch(&mut self, action: &str, request: &mut FrontRequest, response: &mut FrontResponse);
}

/// Identifies a loadable controller of one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerClass {
    pub module: String,
    pub controller: String,
    pub name: String,
}

impl ControllerClass {
    /// Class with the conventional name for `module` and `controller`.
    pub fn conventional(module: &str, controller: &str) -> Self {
        Self {
            module: module.to_string(),
            controller: controller.to_string(),
            name: controller_class_name(module, controller),
        }
    }
}

/// Finds and instantiates controllers on behalf of the resolver.
pub trait ControllerLocator: Send + Sync {
    /// Class serving `controller` in `module`.
    ///
    /// `Ok(None)` when the module does not ship that controller.
    fn resolve_class(&self, module: &str, controller: &str)
        -> Result<Option<ControllerClass>, RouteError>;

    /// Create an instance of `class`; `None` when it cannot be built.
    fn instantiate(
        &self,
        class: &ControllerClass,
        request: &FrontRequest,
        response: &FrontResponse,
    ) -> Option<Box<dyn Controller>>;
}

/// Upper-case the first letter of every `_`-separated word.
///
/// `"foo_bar"` becomes `"Foo_Bar"`; the rest of each word is left alone.
pub fn uc_words(value: &str) -> String {
    value
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join("_")
}

/// Conventional class name: `<module>_<UcWords(controller)>Controller`.
pub fn controller_class_name(module: &str, controller: &str) -> String {
    format!("{}_{}Controller", module, uc_words(controller))
}
