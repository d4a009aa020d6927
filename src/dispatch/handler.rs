//! Capabilities supplied by the caller.
//!
//! # Responsibilities
//! - `RequestHandler`: the application, `handle(request, context) -> response`
//! - `ServerBuild`: produces the handler for an operating mode
//! - `LoadContextProvider`: derives per-request context from the raw event
//! - `ErrorObserver`: notified of every application failure
//!
//! # Design Decisions
//! - Closures implement every capability, so tests and small apps need no structs
//! - Any `tower::Service` (an axum `Router` included) can act as the application

use async_trait::async_trait;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tower::{Service, ServiceExt};

use crate::codec::{CanonicalRequest, CanonicalResponse};
use crate::dispatch::types::{BoxError, HandlerError, LoadContext};
use crate::edge::EdgeEvent;

/// The dynamic application.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn handle(
        &self,
        request: CanonicalRequest,
        context: LoadContext,
    ) -> Result<CanonicalResponse, BoxError>;
}

#[async_trait]
impl<F, Fut> RequestHandler for F
where
    F: Fn(CanonicalRequest, LoadContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<CanonicalResponse, BoxError>> + Send + 'static,
{
    async fn handle(
        &self,
        request: CanonicalRequest,
        context: LoadContext,
    ) -> Result<CanonicalResponse, BoxError> {
        (self)(request, context).await
    }
}

/// Adapts a `tower::Service` into a [`RequestHandler`].
///
/// The load context is inserted into the request extensions, so axum
/// handlers can extract it with `Extension<LoadContext>`.
#[derive(Clone)]
pub struct ServiceHandler<S> {
    service: S,
}

impl<S> ServiceHandler<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<S> RequestHandler for ServiceHandler<S>
where
    S: Service<CanonicalRequest, Response = CanonicalResponse> + Clone + Send + Sync + 'static,
    S::Future: Send,
    S::Error: Into<BoxError>,
{
    async fn handle(
        &self,
        mut request: CanonicalRequest,
        context: LoadContext,
    ) -> Result<CanonicalResponse, BoxError> {
        request.extensions_mut().insert(context);
        self.service
            .clone()
            .oneshot(request)
            .await
            .map_err(Into::into)
    }
}

/// Produces the application for an operating mode.
pub trait ServerBuild: Send + Sync {
    fn request_handler(&self, mode: &str) -> Arc<dyn RequestHandler>;
}

/// A build that serves the same handler in every mode.
#[derive(Clone)]
pub struct FixedBuild {
    handler: Arc<dyn RequestHandler>,
}

impl FixedBuild {
    pub fn new(handler: impl RequestHandler + 'static) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }
}

impl From<Arc<dyn RequestHandler>> for FixedBuild {
    fn from(handler: Arc<dyn RequestHandler>) -> Self {
        Self { handler }
    }
}

impl ServerBuild for FixedBuild {
    fn request_handler(&self, _mode: &str) -> Arc<dyn RequestHandler> {
        self.handler.clone()
    }
}

impl fmt::Debug for FixedBuild {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixedBuild").finish_non_exhaustive()
    }
}

/// Derives the load context from the raw event.
pub trait LoadContextProvider: Send + Sync {
    fn load_context(&self, event: &EdgeEvent) -> Result<LoadContext, BoxError>;
}

impl<F> LoadContextProvider for F
where
    F: Fn(&EdgeEvent) -> Result<LoadContext, BoxError> + Send + Sync,
{
    fn load_context(&self, event: &EdgeEvent) -> Result<LoadContext, BoxError> {
        (self)(event)
    }
}

/// Observes application failures.
pub trait ErrorObserver: Send + Sync {
    fn on_error(&self, error: &HandlerError);
}

impl<F> ErrorObserver for F
where
    F: Fn(&HandlerError) + Send + Sync,
{
    fn on_error(&self, error: &HandlerError) {
        (self)(error)
    }
}

/// Observer that does nothing; failures are still logged by the dispatcher.
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoreErrors;

impl ErrorObserver for IgnoreErrors {
    fn on_error(&self, _error: &HandlerError) {}
}
