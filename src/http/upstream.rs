//! Forwards canonical requests to an HTTP application.
//!
//! # Responsibilities
//! - Point the canonical request at the configured application
//! - Keep method, path, query, headers (viewer `Host` included) and body
//! - Bound each call with the configured timeout
//!
//! # Design Decisions
//! - Plain HTTP only; TLS to the application is out of scope
//! - No retries; a failed call surfaces as the handler error

use async_trait::async_trait;
use axum::body::Body;
use axum::http::uri::{Authority, Scheme};
use axum::http::{HeaderValue, Request, Response, Uri};
use hyper::body::Incoming;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use std::time::Duration;

use crate::codec::{CanonicalRequest, CanonicalResponse};
use crate::dispatch::{AdapterError, BoxError, LoadContext, RequestHandler};
use crate::http::request::X_REQUEST_ID;

/// Application reached over HTTP.
#[derive(Clone)]
pub struct UpstreamHandler {
    client: Client<HttpConnector, Body>,
    authority: Authority,
    timeout: Duration,
}

impl UpstreamHandler {
    pub fn new(app_url: &str, timeout: Duration) -> Result<Self, AdapterError> {
        let invalid = || AdapterError::InvalidUpstream(app_url.to_string());

        let uri: Uri = app_url.parse().map_err(|_| invalid())?;
        if uri.scheme() != Some(&Scheme::HTTP) {
            return Err(invalid());
        }
        let authority = uri.authority().cloned().ok_or_else(invalid)?;

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        Ok(Self {
            client,
            authority,
            timeout,
        })
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }
}

#[async_trait]
impl RequestHandler for UpstreamHandler {
    async fn handle(
        &self,
        request: CanonicalRequest,
        context: LoadContext,
    ) -> Result<CanonicalResponse, BoxError> {
        let (mut parts, body) = request.into_parts();

        let mut uri_parts = parts.uri.clone().into_parts();
        uri_parts.scheme = Some(Scheme::HTTP);
        uri_parts.authority = Some(self.authority.clone());
        parts.uri = Uri::from_parts(uri_parts)?;

        if let Some(invocation) = context.invocation() {
            parts
                .headers
                .insert(X_REQUEST_ID, HeaderValue::from_str(&invocation.request_id)?);
        }

        tracing::debug!(
            method = %parts.method,
            uri = %parts.uri,
            "Forwarding to application"
        );

        let request = Request::from_parts(parts, body);
        let pending = self.client.request(request);
        let response: Response<Incoming> = match tokio::time::timeout(self.timeout, pending).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(format!(
                    "application did not respond within {}s",
                    self.timeout.as_secs()
                )
                .into())
            }
        };

        let (parts, body) = response.into_parts();
        Ok(Response::from_parts(parts, Body::new(body)))
    }
}
