//! Dispatch types and error definitions.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

pub use axum::BoxError;

/// Errors raised while handling a request through the application.
///
/// The `Display` output of each variant becomes the body of the synthesized
/// 500 response, so handler errors are rendered without a prefix.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The event carried no records.
    #[error("edge event contains no records")]
    EmptyEvent,

    /// The load-context provider failed.
    #[error("failed to resolve load context: {0}")]
    LoadContext(#[source] BoxError),

    /// The request method is not a valid HTTP token.
    #[error("invalid request method '{0}'")]
    InvalidMethod(String),

    /// A header name or value cannot be represented canonically.
    #[error("invalid header '{name}'")]
    InvalidHeader { name: String },

    /// The request URL could not be constructed.
    #[error("invalid request url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The base64 request body could not be decoded.
    #[error("invalid base64 request body: {0}")]
    BodyDecode(#[from] base64::DecodeError),

    /// The canonical request could not be assembled.
    #[error("failed to build request: {0}")]
    Request(#[from] axum::http::Error),

    /// The application returned an error.
    #[error("{0}")]
    Handler(BoxError),

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    Body(#[source] axum::Error),

    /// The application panicked.
    #[error("{0}")]
    Panicked(String),
}

/// Errors raised while constructing an adapter.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// An origin-path pattern failed to compile.
    #[error("invalid origin path pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The upstream application URL is unusable.
    #[error("invalid upstream url '{0}'")]
    InvalidUpstream(String),
}

/// Per-invocation metadata, handed to the application inside the load context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Invocation {
    /// Correlation id for logs.
    pub request_id: String,

    /// Whether the runtime should wait for background work to drain before
    /// completing the invocation. Cleared on origin pass-through.
    pub wait_for_background_tasks: bool,
}

impl Invocation {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            wait_for_background_tasks: true,
        }
    }
}

impl Default for Invocation {
    fn default() -> Self {
        Self::new(uuid::Uuid::new_v4().to_string())
    }
}

/// Caller-defined values threaded into the application for one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadContext {
    values: Map<String, Value>,
    invocation: Option<Invocation>,
}

impl LoadContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Invocation metadata, set by the dispatcher before the handler runs.
    pub fn invocation(&self) -> Option<&Invocation> {
        self.invocation.as_ref()
    }

    pub(crate) fn set_invocation(&mut self, invocation: Invocation) {
        self.invocation = Some(invocation);
    }
}

impl From<Map<String, Value>> for LoadContext {
    fn from(values: Map<String, Value>) -> Self {
        Self {
            values,
            invocation: None,
        }
    }
}
