//! Request and response objects the resolver reads and writes.
//!
//! # Responsibilities
//! - Carry the decomposed route (front-name, controller, action)
//! - Carry transport facts (method, secure flag, rewrite alias)
//! - Record what the resolver decided (route name, controller module, dispatched)
//! - Collect the response a controller or the secure check produces

use std::collections::HashMap;

use axum::http::{Method, StatusCode};

/// Request state shared between the host framework and the resolver.
#[derive(Debug, Clone)]
pub struct FrontRequest {
    method: Method,
    path_info: String,
    module_name: Option<String>,
    controller_name: Option<String>,
    action_name: Option<String>,
    secure: bool,
    alias: Option<String>,
    admin_context: bool,
    params: HashMap<String, String>,
    route_name: String,
    controller_module: Option<String>,
    dispatched: bool,
}

impl FrontRequest {
    /// Create a request with no route segments.
    pub fn new(method: Method, path_info: impl Into<String>) -> Self {
        Self {
            method,
            path_info: path_info.into(),
            module_name: None,
            controller_name: None,
            action_name: None,
            secure: false,
            alias: None,
            admin_context: false,
            params: HashMap::new(),
            route_name: String::new(),
            controller_module: None,
            dispatched: false,
        }
    }

    /// Decompose `/front/controller/action/key/value/...` into a request.
    ///
    /// Segments after the action are read as key/value pairs; a trailing key
    /// without a value is ignored.
    pub fn from_path(method: Method, path_info: &str) -> Self {
        let mut request = Self::new(method, path_info);
        let mut segments = path_info.split('/').filter(|s| !s.is_empty());

        request.module_name = segments.next().map(str::to_owned);
        request.controller_name = segments.next().map(str::to_owned);
        request.action_name = segments.next().map(str::to_owned);

        while let (Some(key), Some(value)) = (segments.next(), segments.next()) {
            request.params.insert(key.to_owned(), value.to_owned());
        }
        request
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// True for form submissions, which are never redirected.
    pub fn is_post(&self) -> bool {
        self.method == Method::POST
    }

    pub fn path_info(&self) -> &str {
        &self.path_info
    }

    /// Front-name segment. Becomes the module name once dispatched.
    pub fn module_name(&self) -> Option<&str> {
        self.module_name.as_deref()
    }

    pub fn set_module_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.module_name = Some(name.into());
        self
    }

    pub fn controller_name(&self) -> Option<&str> {
        self.controller_name.as_deref()
    }

    pub fn action_name(&self) -> Option<&str> {
        self.action_name.as_deref()
    }

    pub fn set_action_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.action_name = Some(name.into());
        self
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    pub fn set_secure(&mut self, secure: bool) -> &mut Self {
        self.secure = secure;
        self
    }

    /// Rewrite alias attached by the URL rewrite service, if any.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn set_alias(&mut self, alias: impl Into<String>) -> &mut Self {
        self.alias = Some(alias.into());
        self
    }

    /// Whether the request runs in the administrative store context.
    pub fn is_admin_context(&self) -> bool {
        self.admin_context
    }

    pub fn set_admin_context(&mut self, admin: bool) -> &mut Self {
        self.admin_context = admin;
        self
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn set_param(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn route_name(&self) -> &str {
        &self.route_name
    }

    pub fn set_route_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.route_name = name.into();
        self
    }

    /// Module whose controller won the match.
    pub fn controller_module(&self) -> Option<&str> {
        self.controller_module.as_deref()
    }

    pub fn set_controller_module(&mut self, module: impl Into<String>) -> &mut Self {
        self.controller_module = Some(module.into());
        self
    }

    pub fn is_dispatched(&self) -> bool {
        self.dispatched
    }

    pub fn set_dispatched(&mut self, dispatched: bool) -> &mut Self {
        self.dispatched = dispatched;
        self
    }
}

/// Response produced while resolving and dispatching a request.
#[derive(Debug, Clone)]
pub struct FrontResponse {
    status: StatusCode,
    content_type: Option<String>,
    body: String,
    redirect: Option<String>,
    sent: bool,
}

impl FrontResponse {
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            content_type: None,
            body: String::new(),
            redirect: None,
            sent: false,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) -> &mut Self {
        self.status = status;
        self
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn set_body(&mut self, content_type: impl Into<String>, body: impl Into<String>) -> &mut Self {
        self.content_type = Some(content_type.into());
        self.body = body.into();
        self
    }

    /// Turn the response into a `302 Found` pointing at `url`.
    pub fn set_redirect(&mut self, url: impl Into<String>) -> &mut Self {
        self.status = StatusCode::FOUND;
        self.redirect = Some(url.into());
        self
    }

    pub fn redirect(&self) -> Option<&str> {
        self.redirect.as_deref()
    }

    /// Mark the response as final. Nothing may be written afterwards.
    pub fn send(&mut self) {
        self.sent = true;
    }

    pub fn is_sent(&self) -> bool {
        self.sent
    }
}

impl Default for FrontResponse {
    fn default() -> Self {
        Self::new()
    }
}
