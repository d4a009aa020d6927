//! Dispatch subsystem: the adapter entry point and the failure boundary.
//!
//! # Data Flow
//! ```text
//! EdgeEvent
//!     → adapter.rs (ROUTING: origin router)
//!         → match: EdgeResult::Request (pass-through, wait hint cleared)
//!     → adapter.rs (HANDLING)
//!         → codec::request (canonical request)
//!         → handler.rs (load context, application)
//!         → codec::response (edge response)
//!     → EdgeResult::Response
//!
//! On any HANDLING failure:
//!     → observer notified once
//!     → error logged
//!     → { status: "500", headers: {}, bodyEncoding: "text", body: message }
//! ```
//!
//! # Design Decisions
//! - Callers never see an error; every event produces an EdgeResult
//! - No retry and no memoization: each call does the work again
//! - The observer is an explicit capability of the adapter, never a global

pub mod adapter;
pub mod handler;
pub mod types;

pub use adapter::{EdgeAdapter, EdgeAdapterBuilder};
pub use handler::{
    ErrorObserver, FixedBuild, IgnoreErrors, LoadContextProvider, RequestHandler, ServerBuild,
    ServiceHandler,
};
pub use types::{AdapterError, BoxError, HandlerError, Invocation, LoadContext};
