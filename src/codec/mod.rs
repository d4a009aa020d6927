//! Protocol translation between the edge platform and canonical HTTP.
//!
//! # Data Flow
//! ```text
//! EdgeRequest
//!     → headers.rs (edge → canonical, empty values dropped)
//!     → request.rs (https URL, method, decoded body)
//!     → [application handler]
//!     → response.rs (status string, headers canonical → edge, text body)
//!     → EdgeResponse
//! ```
//!
//! # Design Decisions
//! - Scheme is always https; the platform only delivers secure connections
//! - Empty edge header values are dropped, empty canonical values are kept
//! - Nothing here catches errors; the dispatcher owns the failure boundary

pub mod headers;
pub mod request;
pub mod response;

pub use headers::{from_canonical_headers, to_canonical_headers};
pub use request::{build_canonical_request, CanonicalRequest};
pub use response::{project_response, CanonicalResponse};
