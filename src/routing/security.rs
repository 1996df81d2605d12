//! Secure transport enforcement.
//!
//! # Responsibilities
//! - Decide whether a route path must be served over https
//! - Build the secure URL of the current request
//! - Redirect insecure requests to it
//!
//! # Design Decisions
//! - Skipped until the application is installed, and for POST submissions
//! - The redirect is returned as a value; the caller stops processing on it
//! - Store flags arrive through [`TransportSecurity`], never from globals

use url::Url;

use crate::config::schema::WebConfig;
use crate::observability::metrics;
use crate::routing::request::{FrontRequest, FrontResponse};

/// Route name of the administrative area.
pub const ADMIN_ROUTE_NAME: &str = "adminhtml";

/// Decides which route paths belong on secure transport.
pub trait SecurePathPolicy: Send + Sync {
    fn should_path_be_secure(&self, path: &str) -> bool;
}

/// Paths starting with any configured prefix are secure.
#[derive(Debug, Clone, Default)]
pub struct PrefixSecurePaths {
    prefixes: Vec<String>,
}

impl PrefixSecurePaths {
    pub fn new(prefixes: Vec<String>) -> Self {
        Self { prefixes }
    }
}

impl SecurePathPolicy for PrefixSecurePaths {
    fn should_path_be_secure(&self, path: &str) -> bool {
        self.prefixes.iter().any(|prefix| path.starts_with(prefix.as_str()))
    }
}

/// Rewrites redirect URLs before they are sent, e.g. to carry the session.
pub trait RedirectBeautifier: Send + Sync {
    fn redirect_url(&self, url: String) -> String;
}

/// Appends a session query parameter such as `___SID=U`.
#[derive(Debug, Clone)]
pub struct SessionQueryBeautifier {
    key: String,
    value: String,
}

impl SessionQueryBeautifier {
    /// `param` is `key=value`; a bare key gets an empty value.
    pub fn new(param: &str) -> Self {
        let (key, value) = param.split_once('=').unwrap_or((param, ""));
        Self {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

impl RedirectBeautifier for SessionQueryBeautifier {
    fn redirect_url(&self, url: String) -> String {
        match Url::parse(&url) {
            Ok(mut parsed) => {
                parsed.query_pairs_mut().append_pair(&self.key, &self.value);
                parsed.into()
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Cannot add session to redirect URL");
                url
            }
        }
    }
}

/// Result of the secure transport check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecureCheck {
    /// Continue processing.
    Pass,
    /// A redirect to `location` was sent; processing is over.
    Redirect(String),
}

/// Store settings and collaborators behind the secure transport check.
pub struct TransportSecurity {
    installed: bool,
    unsecure_base_url: String,
    secure_base_url: String,
    secure_in_frontend: bool,
    use_session_in_url: bool,
    paths: Box<dyn SecurePathPolicy>,
    beautifier: Box<dyn RedirectBeautifier>,
}

impl TransportSecurity {
    pub fn from_config(config: &WebConfig) -> Self {
        Self {
            installed: config.installed,
            unsecure_base_url: config.unsecure_base_url.clone(),
            secure_base_url: config.secure_base_url.clone(),
            secure_in_frontend: config.secure_in_frontend,
            use_session_in_url: config.use_session_in_url,
            paths: Box::new(PrefixSecurePaths::new(config.secure_paths.clone())),
            beautifier: Box::new(SessionQueryBeautifier::new(&config.session_param)),
        }
    }

    pub fn with_path_policy(mut self, paths: impl SecurePathPolicy + 'static) -> Self {
        self.paths = Box::new(paths);
        self
    }

    pub fn with_beautifier(mut self, beautifier: impl RedirectBeautifier + 'static) -> Self {
        self.beautifier = Box::new(beautifier);
        self
    }

    /// Whether `path` must be served over https.
    pub fn should_be_secure(&self, path: &str) -> bool {
        is_https(&self.unsecure_base_url)
            || self.secure_in_frontend
                && is_https(&self.secure_base_url)
                && self.paths.should_path_be_secure(path)
    }

    /// Secure URL of the page the request asked for.
    ///
    /// Prefers the rewrite alias over the raw path.
    pub fn current_secure_url(&self, request: &FrontRequest) -> String {
        let path = request.alias().unwrap_or(request.path_info());
        format!(
            "{}/{}",
            self.secure_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Redirect `request` to its secure URL when `path` requires it.
    ///
    /// On redirect the response is finalized and must not be touched again.
    pub fn check(&self, request: &FrontRequest, response: &mut FrontResponse, path: &str) -> SecureCheck {
        if !self.installed || request.is_post() {
            return SecureCheck::Pass;
        }
        if request.is_secure() || !self.should_be_secure(path) {
            return SecureCheck::Pass;
        }

        let mut url = self.current_secure_url(request);
        if request.route_name() != ADMIN_ROUTE_NAME && self.use_session_in_url {
            url = self.beautifier.redirect_url(url);
        }

        tracing::info!(path = %path, location = %url, "Redirecting to secure URL");
        metrics::record_secure_redirect();

        response.set_redirect(url.clone()).send();
        SecureCheck::Redirect(url)
    }
}

impl std::fmt::Debug for TransportSecurity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportSecurity")
            .field("installed", &self.installed)
            .field("unsecure_base_url", &self.unsecure_base_url)
            .field("secure_base_url", &self.secure_base_url)
            .field("secure_in_frontend", &self.secure_in_frontend)
            .field("use_session_in_url", &self.use_session_in_url)
            .finish_non_exhaustive()
    }
}

fn is_https(base_url: &str) -> bool {
    base_url.starts_with("https")
}
