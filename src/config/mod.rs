//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse, deserialize, EDGE_ADAPTER_MODE override)
//!     → validation.rs (semantic checks)
//!     → AdapterConfig (validated, immutable)
//!     → EdgeAdapterBuilder::config (origin paths normalized)
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → server rebuilds the adapter and swaps it atomically
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError};
pub use schema::{AdapterConfig, ObservabilityConfig, OriginPathConfig, ServerConfig};
pub use watcher::ConfigWatcher;
