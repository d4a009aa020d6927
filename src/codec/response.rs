//! Canonical response projection.

use axum::body::Body;
use axum::http::Response;

use crate::codec::headers::from_canonical_headers;
use crate::dispatch::types::HandlerError;
use crate::edge::{BodyEncoding, EdgeResponse};

/// Platform-neutral response produced by the application.
pub type CanonicalResponse = Response<Body>;

/// Read the whole response and express it in the edge platform's shape.
pub async fn project_response(response: CanonicalResponse) -> Result<EdgeResponse, HandlerError> {
    let (parts, body) = response.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .map_err(HandlerError::Body)?;

    Ok(EdgeResponse {
        status: parts.status.as_u16().to_string(),
        headers: from_canonical_headers(&parts.headers),
        body_encoding: BodyEncoding::Text,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    })
}
