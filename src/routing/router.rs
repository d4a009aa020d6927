//! Origin-path lookup and pass-through.
//!
//! # Responsibilities
//! - Store normalized origin paths in configured order
//! - Look up the first rule matching a request URI
//! - Apply the rule's mapper, falling back to the original URI on failure
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) scan; first match wins, later rules are never evaluated
//! - Explicit `Application` decision rather than a silent default

use futures_util::FutureExt;
use std::panic::AssertUnwindSafe;
use std::time::Instant;

use crate::dispatch::adapter::panic_message;
use crate::dispatch::types::AdapterError;
use crate::edge::EdgeRequest;
use crate::observability::metrics;
use crate::routing::matcher::{MapperError, OriginPath, OriginPathRule};

/// Outcome of routing one request.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteDecision {
    /// Forward to the origin; the URI may have been rewritten.
    Origin(EdgeRequest),
    /// No origin path matched; hand the request to the application.
    Application(EdgeRequest),
}

/// Ordered origin-path table.
#[derive(Debug, Clone, Default)]
pub struct OriginRouter {
    paths: Vec<OriginPath>,
}

impl OriginRouter {
    /// Normalize and store `rules` in order.
    pub fn new<I, R>(rules: I) -> Result<Self, AdapterError>
    where
        I: IntoIterator<Item = R>,
        R: Into<OriginPathRule>,
    {
        let paths = rules
            .into_iter()
            .map(|rule| OriginPath::try_from(rule.into()))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(origin_paths = paths.len(), "Origin router compiled");
        Ok(Self { paths })
    }

    /// First origin path matching `uri`.
    pub fn match_uri(&self, uri: &str) -> Option<&OriginPath> {
        self.paths.iter().find(|p| p.matches(uri))
    }

    pub fn paths(&self) -> &[OriginPath] {
        &self.paths
    }

    /// Decide where `request` goes, rewriting its URI when the matched rule
    /// carries a mapper.
    pub async fn route(&self, mut request: EdgeRequest) -> RouteDecision {
        let Some(path) = self.match_uri(&request.uri) else {
            return RouteDecision::Application(request);
        };

        let Some(mapper) = path.mapper() else {
            tracing::debug!(uri = %request.uri, pattern = path.pattern(), "Origin pass-through");
            metrics::record_origin(false);
            return RouteDecision::Origin(request);
        };

        let start = Instant::now();
        // A panicking mapper is treated like a failing one.
        let outcome = AssertUnwindSafe(mapper.map_uri(request.uri.clone()))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(MapperError::new(panic_message(panic))));

        match outcome {
            Ok(new_uri) => {
                tracing::debug!(
                    uri = %request.uri,
                    new_uri = %new_uri,
                    pattern = path.pattern(),
                    elapsed = ?start.elapsed(),
                    "Origin URI rewritten"
                );
                request.uri = new_uri;
                metrics::record_origin(true);
            }
            Err(e) => {
                tracing::warn!(
                    uri = %request.uri,
                    pattern = path.pattern(),
                    error = %e,
                    "URI mapper failed, forwarding original URI"
                );
                metrics::record_rewrite_failure();
                metrics::record_origin(false);
            }
        }

        RouteDecision::Origin(request)
    }
}
