//! Viewer-request event as delivered by the edge platform.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::edge::headers::EdgeHeaderMap;

/// Inbound unit of work.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EdgeEvent {
    #[serde(rename = "Records")]
    pub records: Vec<EdgeRecord>,
}

impl EdgeEvent {
    /// Wrap a single request into an event.
    pub fn from_request(request: EdgeRequest) -> Self {
        Self {
            records: vec![EdgeRecord {
                cf: EdgeCf {
                    config: None,
                    request,
                },
            }],
        }
    }

    /// The request carried by the first record.
    pub fn request(&self) -> Option<&EdgeRequest> {
        self.records.first().map(|r| &r.cf.request)
    }

    /// Distribution metadata of the first record, when present.
    pub fn distribution(&self) -> Option<&EdgeDistribution> {
        self.records.first().and_then(|r| r.cf.config.as_ref())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EdgeRecord {
    pub cf: EdgeCf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EdgeCf {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<EdgeDistribution>,
    pub request: EdgeRequest,
}

/// Distribution metadata attached to each record.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDistribution {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution_domain_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// The viewer request. Also the pass-through result shape.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeRequest {
    pub method: String,

    /// Path only; never contains `?`.
    pub uri: String,

    /// Raw query string without the leading `?`.
    #[serde(default)]
    pub querystring: String,

    #[serde(default)]
    pub headers: EdgeHeaderMap,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<EdgeBody>,

    /// Fields this layer does not interpret (`clientIp`, `origin`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EdgeRequest {
    /// Create a request with no query string, headers or body.
    pub fn new(method: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            uri: uri.into(),
            querystring: String::new(),
            headers: EdgeHeaderMap::new(),
            body: None,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyEncoding {
    #[default]
    Text,
    Base64,
}

/// Request body as included by the edge platform.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeBody {
    #[serde(default)]
    pub data: String,

    #[serde(default)]
    pub encoding: BodyEncoding,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_truncated: Option<bool>,
}

impl EdgeBody {
    pub fn text(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            encoding: BodyEncoding::Text,
            action: None,
            input_truncated: None,
        }
    }

    pub fn base64(data: impl Into<String>) -> Self {
        Self {
            encoding: BodyEncoding::Base64,
            ..Self::text(data)
        }
    }

    /// Body content as text. Base64 payloads are decoded and read as
    /// UTF-8, replacing invalid sequences.
    pub fn decoded_text(&self) -> Result<String, base64::DecodeError> {
        match self.encoding {
            BodyEncoding::Text => Ok(self.data.clone()),
            BodyEncoding::Base64 => {
                let bytes = STANDARD.decode(self.data.as_bytes())?;
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
        }
    }
}
