//! Origin-path routing subsystem.
//!
//! # Data Flow
//! ```text
//! EdgeRequest (uri, no query string)
//!     → router.rs (ordered lookup)
//!     → matcher.rs (evaluate pattern, optional async mapper)
//!     → Return: Origin(request) or Application(request)
//!
//! Rule Compilation (at construction):
//!     OriginPathRule[] (string | regex | pattern + mapper)
//!     → Normalize to OriginPath { test, mapper }
//!     → Freeze as immutable OriginRouter
//! ```
//!
//! # Design Decisions
//! - Rules compiled at construction, immutable at runtime
//! - First match wins (configured order)
//! - A failing mapper degrades to pass-through with the original URI

pub mod matcher;
pub mod router;

pub use matcher::{MapperError, OriginPath, OriginPathRule, RegexRewrite, UriMapper};
pub use router::{OriginRouter, RouteDecision};
