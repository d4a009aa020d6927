//! Edge platform data model.
//!
//! # Data Flow
//! ```text
//! Viewer-request event (JSON)
//!     → event.rs (Records[0].cf.request)
//!     → headers.rs (lower-cased name → ordered { key, value } entries)
//!     → result.rs (pass-through request OR synthesized response)
//! ```
//!
//! # Design Decisions
//! - One ordered multi-map type for headers, shared by both codec directions
//! - Unknown request fields survive a round trip so pass-through keeps its shape
//! - `uri` is path only; query parameters live in `querystring`

pub mod event;
pub mod headers;
pub mod result;

pub use event::{BodyEncoding, EdgeBody, EdgeDistribution, EdgeEvent, EdgeRecord, EdgeRequest};
pub use headers::{EdgeHeader, EdgeHeaderMap};
pub use result::{EdgeResponse, EdgeResult};
