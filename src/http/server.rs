//! Invoke server setup.
//!
//! # Responsibilities
//! - Create Axum Router with the invoke and health handlers
//! - Wire up middleware (request id, timeout, tracing)
//! - Hold the current adapter and swap it on config reload
//! - Serve until the shutdown signal
//!
//! # Design Decisions
//! - The server-wide timeout sits above the application timeout, so a slow
//!   application still yields an edge result
//! - The upstream handler is rebuilt on reload; bind address and the
//!   server-wide timeout only change on restart

use arc_swap::ArcSwap;
use axum::{
    extract::State,
    http::{HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::AdapterConfig;
use crate::dispatch::{
    AdapterError, EdgeAdapter, EdgeAdapterBuilder, FixedBuild, IgnoreErrors, Invocation,
    ServerBuild,
};
use crate::edge::EdgeEvent;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::http::upstream::UpstreamHandler;

/// Response header carrying the invocation's background-work hint.
pub const X_EDGE_WAIT_FOR_BACKGROUND: &str = "x-edge-wait-for-background";

/// Extra time the server-wide timeout allows beyond the application timeout.
const TIMEOUT_MARGIN_SECS: u64 = 5;

/// State injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub adapter: Arc<ArcSwap<EdgeAdapter>>,
}

/// HTTP server that feeds edge events to the adapter.
pub struct HttpServer {
    router: Router,
    config: AdapterConfig,
    application: Application,
    adapter: Arc<ArcSwap<EdgeAdapter>>,
}

/// Where dynamic requests go.
#[derive(Clone)]
enum Application {
    /// Forward to `server.app_url`, rebuilt from every config revision.
    Upstream,
    /// Caller-supplied build, kept across reloads.
    Fixed(Arc<dyn ServerBuild>),
}

impl Application {
    fn build(&self, config: &AdapterConfig) -> Result<Arc<dyn ServerBuild>, AdapterError> {
        match self {
            Application::Upstream => {
                let upstream = UpstreamHandler::new(
                    &config.server.app_url,
                    Duration::from_secs(config.server.request_timeout_secs),
                )?;
                Ok(Arc::new(FixedBuild::new(upstream)))
            }
            Application::Fixed(build) => Ok(build.clone()),
        }
    }
}

impl HttpServer {
    /// Server whose application is reached at `server.app_url`.
    pub fn new(config: AdapterConfig) -> Result<Self, AdapterError> {
        Self::with_application(config, Application::Upstream)
    }

    /// Server with a caller-supplied application.
    pub fn with_build(
        config: AdapterConfig,
        build: Arc<dyn ServerBuild>,
    ) -> Result<Self, AdapterError> {
        Self::with_application(config, Application::Fixed(build))
    }

    fn with_application(
        config: AdapterConfig,
        application: Application,
    ) -> Result<Self, AdapterError> {
        let adapter = Arc::new(ArcSwap::from_pointee(build_adapter(&config, &application)?));
        let state = AppState {
            adapter: adapter.clone(),
        };
        let router = Self::build_router(&config, state);

        Ok(Self {
            router,
            config,
            application,
            adapter,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AdapterConfig, state: AppState) -> Router {
        Router::new()
            .route("/invoke", post(invoke_handler))
            .route("/health", get(health_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.server.request_timeout_secs + TIMEOUT_MARGIN_SECS,
            )))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// The adapter currently serving requests.
    pub fn adapter(&self) -> Arc<EdgeAdapter> {
        self.adapter.load_full()
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Serve on `listener`, applying config updates until shutdown.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<AdapterConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            mode = %self.config.mode,
            origin_paths = self.config.origin_paths.len(),
            "Invoke server starting"
        );

        let adapter = self.adapter.clone();
        let application = self.application.clone();
        let startup = self.config.server.clone();
        let reloader = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                if config.server.bind_address != startup.bind_address {
                    tracing::warn!(
                        bind_address = %config.server.bind_address,
                        "server.bind_address changed; takes effect on restart"
                    );
                }
                if config.server.request_timeout_secs > startup.request_timeout_secs {
                    tracing::warn!(
                        request_timeout_secs = config.server.request_timeout_secs,
                        "server-wide timeout keeps its startup value until restart"
                    );
                }
                match build_adapter(&config, &application) {
                    Ok(next) => {
                        adapter.store(Arc::new(next));
                        tracing::info!(
                            mode = %config.mode,
                            app_url = %config.server.app_url,
                            "Adapter reloaded"
                        );
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Rejected config update, keeping current adapter");
                    }
                }
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        reloader.abort();
        tracing::info!("Invoke server stopped");
        Ok(())
    }
}

fn build_adapter(
    config: &AdapterConfig,
    application: &Application,
) -> Result<EdgeAdapter, AdapterError> {
    EdgeAdapterBuilder::new(application.build(config)?)
        .config(config)?
        .observer(Arc::new(IgnoreErrors))
        .build()
}

/// Run one edge event through the current adapter.
async fn invoke_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(event): Json<EdgeEvent>,
) -> Response {
    let mut invocation = match request_id(&headers) {
        Some(id) => Invocation::new(id),
        None => Invocation::default(),
    };

    let adapter = state.adapter.load_full();
    let result = adapter.handle(event, &mut invocation).await;

    let mut response = Json(result).into_response();
    response.headers_mut().insert(
        X_EDGE_WAIT_FOR_BACKGROUND,
        HeaderValue::from_static(if invocation.wait_for_background_tasks {
            "true"
        } else {
            "false"
        }),
    );
    response
}

async fn health_handler() -> &'static str {
    "ok"
}
