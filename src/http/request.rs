//! Request handling and transformation.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4)
//! - Decompose the HTTP request into a [`FrontRequest`]
//! - Mark secure and administrative requests
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - `X-Forwarded-Proto: https` counts as secure; TLS terminates upstream

use axum::http::{HeaderMap, HeaderValue, Method, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::routing::request::FrontRequest;
use crate::routing::resolver::FRONT_ROUTE_PARAM;

pub const X_REQUEST_ID: &str = "x-request-id";
pub const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Generates `x-request-id` values from random UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestUuid;

impl MakeRequestId for RequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Build the resolver's view of an incoming request.
///
/// The front-name doubles as the framework's front route parameter, and a
/// front-name equal to `admin_front_name` puts the request in the
/// administrative context.
pub fn front_request(method: Method, path: &str, secure: bool, admin_front_name: &str) -> FrontRequest {
    let mut request = FrontRequest::from_path(method, path);
    request.set_secure(secure);

    if let Some(front_name) = request.module_name().map(str::to_owned) {
        if front_name == admin_front_name {
            request.set_admin_context(true);
        }
        request.set_param(FRONT_ROUTE_PARAM, front_name);
    }
    request
}

/// Whether the client reached us over https, as reported by the edge proxy.
pub fn is_forwarded_secure(headers: &HeaderMap) -> bool {
    headers
        .get(X_FORWARDED_PROTO)
        .and_then(|v| v.to_str().ok())
        .map(|proto| proto.eq_ignore_ascii_case("https"))
        .unwrap_or(false)
}

/// Request ID assigned by [`RequestUuid`], or `"unknown"`.
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_front_request_sets_route_param() {
        let request = front_request(Method::GET, "/blog/post/view", false, "admin");
        assert_eq!(request.param(FRONT_ROUTE_PARAM), Some("blog"));
        assert!(!request.is_admin_context());
        assert!(!request.is_secure());
    }

    #[test]
    fn test_admin_front_name_marks_context() {
        let request = front_request(Method::GET, "/admin/dashboard/index", true, "admin");
        assert!(request.is_admin_context());
        assert!(request.is_secure());
    }

    #[test]
    fn test_forwarded_proto() {
        let mut headers = HeaderMap::new();
        assert!(!is_forwarded_secure(&headers));
        headers.insert(X_FORWARDED_PROTO, HeaderValue::from_static("HTTPS"));
        assert!(is_forwarded_secure(&headers));
        headers.insert(X_FORWARDED_PROTO, HeaderValue::from_static("http"));
        assert!(!is_forwarded_secure(&headers));
    }

    #[test]
    fn test_request_uuid_is_valid_header() {
        let request = Request::builder().body(()).unwrap();
        let id = RequestUuid.make_request_id(&request).unwrap();
        let value = id.header_value().to_str().unwrap();
        assert!(Uuid::parse_str(value).is_ok());
    }
}
