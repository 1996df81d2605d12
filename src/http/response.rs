//! Response handling and transformation.
//!
//! # Responsibilities
//! - Turn a [`FrontResponse`] into an HTTP response
//! - Map resolution failures to status codes
//!
//! # Design Decisions
//! - Redirects carry only a `Location` header and an empty body
//! - No match is a plain 404 so an outer dispatcher may try other routers

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::routing::request::FrontResponse;

impl IntoResponse for FrontResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body().to_string()));
        *response.status_mut() = self.status();

        if let Some(location) = self.redirect() {
            match HeaderValue::from_str(location) {
                Ok(value) => {
                    response.headers_mut().insert(header::LOCATION, value);
                }
                Err(_) => {
                    tracing::error!(location = %location, "Redirect location is not a valid header");
                    return StatusCode::INTERNAL_SERVER_ERROR.into_response();
                }
            }
        }
        if let Some(content_type) = self.content_type().and_then(|c| HeaderValue::from_str(c).ok()) {
            response.headers_mut().insert(header::CONTENT_TYPE, content_type);
        }
        response
    }
}

pub fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "No route matched").into_response()
}

pub fn internal_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Routing configuration error").into_response()
}
