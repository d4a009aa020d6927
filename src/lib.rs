//! Edge adapter library.
//!
//! Translates edge viewer-request events into canonical HTTP requests for an
//! application, or forwards them untouched to the origin when their path
//! matches a configured origin path.
//!
//! ```ignore
//! use edge_adapter::{EdgeAdapter, EdgeEvent};
//!
//! let adapter = EdgeAdapter::for_handler(my_app)
//!     .origin_path("^/build/")
//!     .on_error(|e: &edge_adapter::HandlerError| eprintln!("{e}"))
//!     .build()?;
//!
//! let result = adapter.handle_event(event).await;
//! ```

pub mod codec;
pub mod config;
pub mod dispatch;
pub mod edge;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::AdapterConfig;
pub use dispatch::{EdgeAdapter, HandlerError, Invocation, LoadContext, RequestHandler};
pub use edge::{EdgeEvent, EdgeRequest, EdgeResponse, EdgeResult};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{OriginPathRule, OriginRouter};
