//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     trigger → every subscriber wakes → server stops accepting → drain → exit
//! ```
//!
//! # Design Decisions
//! - One broadcast channel; every long-running task subscribes
//! - In-flight invocations finish before the server returns

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
