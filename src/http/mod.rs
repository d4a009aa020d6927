//! Local invoke server.
//!
//! # Data Flow
//! ```text
//! POST /invoke (JSON edge event)
//!     → request.rs (request id set / propagated)
//!     → server.rs (current adapter from ArcSwap)
//!     → dispatch::EdgeAdapter
//!         → upstream.rs (dynamic requests forwarded to the application)
//!     → JSON edge result + x-edge-wait-for-background
//! ```

pub mod request;
pub mod server;
pub mod upstream;

pub use request::{request_id, X_REQUEST_ID};
pub use server::{HttpServer, X_EDGE_WAIT_FOR_BACKGROUND};
pub use upstream::UpstreamHandler;
