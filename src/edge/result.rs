//! Output of one invocation.

use serde::{Deserialize, Serialize};

use crate::edge::event::{BodyEncoding, EdgeRequest};
use crate::edge::headers::EdgeHeaderMap;

/// Either forward the request to the origin or answer it directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EdgeResult {
    /// Forward the (possibly URI-rewritten) request to the origin fetch path.
    Request(EdgeRequest),
    /// Answer the viewer with a synthesized response.
    Response(EdgeResponse),
}

impl EdgeResult {
    pub fn as_request(&self) -> Option<&EdgeRequest> {
        match self {
            EdgeResult::Request(r) => Some(r),
            EdgeResult::Response(_) => None,
        }
    }

    pub fn as_response(&self) -> Option<&EdgeResponse> {
        match self {
            EdgeResult::Request(_) => None,
            EdgeResult::Response(r) => Some(r),
        }
    }
}

/// Synthesized response in the edge platform's shape.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeResponse {
    /// Decimal status code, e.g. `"200"`.
    pub status: String,
    pub headers: EdgeHeaderMap,
    pub body_encoding: BodyEncoding,
    pub body: String,
}

impl EdgeResponse {
    /// The response produced when the application fails.
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self {
            status: "500".to_string(),
            headers: EdgeHeaderMap::new(),
            body_encoding: BodyEncoding::Text,
            body: message.into(),
        }
    }
}
