//! Canonical request construction.
//!
//! # Responsibilities
//! - Resolve the authority from the first `host` line
//! - Compose `https://{host}{uri}[?{querystring}]`
//! - Decode the edge body into the request body
//!
//! # Design Decisions
//! - A missing `host` falls back to a configured placeholder authority
//! - An empty query string adds no trailing `?`
//! - Errors propagate to the dispatcher unchanged

use axum::body::Body;
use axum::http::{Method, Request};
use url::Url;

use crate::codec::headers::to_canonical_headers;
use crate::dispatch::types::HandlerError;
use crate::edge::EdgeRequest;

/// Platform-neutral request handed to the application.
pub type CanonicalRequest = Request<Body>;

/// Build the canonical request for one edge request.
pub fn build_canonical_request(
    request: &EdgeRequest,
    default_host: &str,
) -> Result<CanonicalRequest, HandlerError> {
    let url = canonical_url(request, default_host)?;

    let method = Method::from_bytes(request.method.as_bytes())
        .map_err(|_| HandlerError::InvalidMethod(request.method.clone()))?;

    let body = match &request.body {
        Some(body) if !body.data.is_empty() => Body::from(body.decoded_text()?),
        _ => Body::empty(),
    };

    let mut canonical = Request::builder()
        .method(method)
        .uri(url.as_str())
        .body(body)?;
    *canonical.headers_mut() = to_canonical_headers(&request.headers)?;

    Ok(canonical)
}

/// Absolute URL of the request.
pub fn canonical_url(request: &EdgeRequest, default_host: &str) -> Result<Url, HandlerError> {
    let host = request.headers.first_value("host").unwrap_or(default_host);
    let base = Url::parse(&format!("https://{}", host))?;

    let target = if request.querystring.is_empty() {
        request.uri.clone()
    } else {
        format!("{}?{}", request.uri, request.querystring)
    };

    Ok(base.join(&target)?)
}
