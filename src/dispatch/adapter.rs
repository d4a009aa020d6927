//! Edge adapter: routing first, then the application behind a failure boundary.
//!
//! # States
//! - ROUTING: origin-path router decides pass-through
//! - HANDLING: build request, resolve context, invoke handler, project response
//!
//! # State Transitions
//! ```text
//! ROUTING → DONE: origin path matched (request forwarded, maybe rewritten)
//! ROUTING → HANDLING: no origin path matched
//! HANDLING → DONE: projected response, or 500 on any failure
//! ```

use futures_util::FutureExt;
use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use crate::codec::{build_canonical_request, project_response};
use crate::config::AdapterConfig;
use crate::dispatch::handler::{
    ErrorObserver, FixedBuild, IgnoreErrors, LoadContextProvider, RequestHandler, ServerBuild,
};
use crate::dispatch::types::{AdapterError, HandlerError, Invocation, LoadContext};
use crate::edge::{EdgeEvent, EdgeRequest, EdgeResponse, EdgeResult};
use crate::observability::metrics;
use crate::routing::{OriginPathRule, OriginRouter, RouteDecision};

pub const DEFAULT_MODE: &str = "production";
pub const DEFAULT_HOST: &str = "localhost";

/// Translates edge events into application requests and back.
///
/// Immutable after construction; share it behind an `Arc`.
pub struct EdgeAdapter {
    router: OriginRouter,
    build: Arc<dyn ServerBuild>,
    load_context: Option<Arc<dyn LoadContextProvider>>,
    observer: Arc<dyn ErrorObserver>,
    mode: String,
    default_host: String,
    debug: bool,
}

impl EdgeAdapter {
    /// Assemble an adapter from already-normalized parts.
    pub fn new(
        router: OriginRouter,
        build: Arc<dyn ServerBuild>,
        load_context: Option<Arc<dyn LoadContextProvider>>,
        observer: Arc<dyn ErrorObserver>,
    ) -> Self {
        Self {
            router,
            build,
            load_context,
            observer,
            mode: DEFAULT_MODE.to_string(),
            default_host: DEFAULT_HOST.to_string(),
            debug: false,
        }
    }

    pub fn builder(build: impl ServerBuild + 'static) -> EdgeAdapterBuilder {
        EdgeAdapterBuilder::new(Arc::new(build))
    }

    /// Builder for an application that does not vary by mode.
    pub fn for_handler(handler: impl RequestHandler + 'static) -> EdgeAdapterBuilder {
        Self::builder(FixedBuild::new(handler))
    }

    pub fn router(&self) -> &OriginRouter {
        &self.router
    }

    pub fn mode(&self) -> &str {
        &self.mode
    }

    /// Handle one event with fresh invocation metadata.
    pub async fn handle_event(&self, event: EdgeEvent) -> EdgeResult {
        let mut invocation = Invocation::default();
        self.handle(event, &mut invocation).await
    }

    /// Handle one event. Never fails: errors become a 500 response.
    pub async fn handle(&self, event: EdgeEvent, invocation: &mut Invocation) -> EdgeResult {
        let Some(request) = event.request().cloned() else {
            return EdgeResult::Response(self.fail(HandlerError::EmptyEvent, invocation));
        };

        self.log_request(&event, &request, invocation);

        match self.router.route(request).await {
            RouteDecision::Origin(request) => {
                invocation.wait_for_background_tasks = false;
                EdgeResult::Request(request)
            }
            RouteDecision::Application(request) => {
                EdgeResult::Response(self.dispatch(&event, request, invocation).await)
            }
        }
    }

    async fn dispatch(
        &self,
        event: &EdgeEvent,
        request: EdgeRequest,
        invocation: &Invocation,
    ) -> EdgeResponse {
        let start = Instant::now();
        let method = request.method.clone();

        let outcome = AssertUnwindSafe(self.run_application(event, request, invocation))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(HandlerError::Panicked(panic_message(panic))));

        match outcome {
            Ok(response) => {
                tracing::debug!(
                    request_id = %invocation.request_id,
                    status = %response.status,
                    elapsed = ?start.elapsed(),
                    "Application responded"
                );
                metrics::record_dispatch(&method, &response.status, start);
                response
            }
            Err(e) => {
                let response = self.fail(e, invocation);
                metrics::record_dispatch(&method, &response.status, start);
                response
            }
        }
    }

    async fn run_application(
        &self,
        event: &EdgeEvent,
        request: EdgeRequest,
        invocation: &Invocation,
    ) -> Result<EdgeResponse, HandlerError> {
        let handler = self.build.request_handler(&self.mode);
        let canonical = build_canonical_request(&request, &self.default_host)?;

        let mut context = match &self.load_context {
            Some(provider) => provider
                .load_context(event)
                .map_err(HandlerError::LoadContext)?,
            None => LoadContext::default(),
        };
        context.set_invocation(invocation.clone());

        let response = handler
            .handle(canonical, context)
            .await
            .map_err(HandlerError::Handler)?;

        project_response(response).await
    }

    fn fail(&self, error: HandlerError, invocation: &Invocation) -> EdgeResponse {
        tracing::error!(
            request_id = %invocation.request_id,
            error = %error,
            details = ?error,
            "Application failed to handle request"
        );
        metrics::record_handler_failure();
        self.observer.on_error(&error);
        EdgeResponse::internal_error(error.to_string())
    }

    fn log_request(&self, event: &EdgeEvent, request: &EdgeRequest, invocation: &Invocation) {
        let edge_request_id = event
            .distribution()
            .and_then(|d| d.request_id.as_deref())
            .unwrap_or("-");

        if self.debug {
            tracing::info!(
                request_id = %invocation.request_id,
                edge_request_id,
                method = %request.method,
                uri = %request.uri,
                querystring = %request.querystring,
                headers = %serde_json::to_string(&request.headers).unwrap_or_default(),
                "Handling edge request"
            );
        } else {
            tracing::debug!(
                request_id = %invocation.request_id,
                edge_request_id,
                method = %request.method,
                uri = %request.uri,
                "Handling edge request"
            );
        }
    }
}

impl fmt::Debug for EdgeAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EdgeAdapter")
            .field("router", &self.router)
            .field("mode", &self.mode)
            .field("default_host", &self.default_host)
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

/// Text of a caught panic payload.
pub(crate) fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "application panicked".to_string()
    }
}

/// Construction-time configuration of an [`EdgeAdapter`].
pub struct EdgeAdapterBuilder {
    build: Arc<dyn ServerBuild>,
    rules: Vec<OriginPathRule>,
    load_context: Option<Arc<dyn LoadContextProvider>>,
    observer: Arc<dyn ErrorObserver>,
    mode: String,
    default_host: String,
    debug: bool,
}

impl EdgeAdapterBuilder {
    pub fn new(build: Arc<dyn ServerBuild>) -> Self {
        Self {
            build,
            rules: Vec::new(),
            load_context: None,
            observer: Arc::new(IgnoreErrors),
            mode: DEFAULT_MODE.to_string(),
            default_host: DEFAULT_HOST.to_string(),
            debug: false,
        }
    }

    /// Apply mode, placeholder host, debug flag and origin paths from config.
    pub fn config(mut self, config: &AdapterConfig) -> Result<Self, AdapterError> {
        self.mode = config.mode.clone();
        self.default_host = config.default_host.clone();
        self.debug = config.debug;
        for path in &config.origin_paths {
            self.rules.push(OriginPathRule::from_config(path)?);
        }
        Ok(self)
    }

    pub fn mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = mode.into();
        self
    }

    pub fn default_host(mut self, host: impl Into<String>) -> Self {
        self.default_host = host.into();
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Append one origin-path rule. Rules are tried in the order added.
    pub fn origin_path(mut self, rule: impl Into<OriginPathRule>) -> Self {
        self.rules.push(rule.into());
        self
    }

    pub fn origin_paths<I, R>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<OriginPathRule>,
    {
        self.rules.extend(rules.into_iter().map(Into::into));
        self
    }

    pub fn load_context(mut self, provider: impl LoadContextProvider + 'static) -> Self {
        self.load_context = Some(Arc::new(provider));
        self
    }

    pub fn on_error(self, observer: impl ErrorObserver + 'static) -> Self {
        self.observer(Arc::new(observer))
    }

    pub fn observer(mut self, observer: Arc<dyn ErrorObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Normalize the origin paths and freeze the adapter.
    pub fn build(self) -> Result<EdgeAdapter, AdapterError> {
        let router = OriginRouter::new(self.rules)?;
        tracing::debug!(
            mode = %self.mode,
            origin_paths = router.paths().len(),
            "Edge adapter built"
        );

        let mut adapter = EdgeAdapter::new(router, self.build, self.load_context, self.observer);
        adapter.mode = self.mode;
        adapter.default_host = self.default_host;
        adapter.debug = self.debug;
        Ok(adapter)
    }
}
