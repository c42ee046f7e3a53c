//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Dependency connection attempt:
//!     → retries.rs (run attempt, count it against the policy)
//!     → On failure: backoff.rs (constant or exponential delay)
//!     → On exhaustion: last error handed back to the caller
//! ```
//!
//! # Design Decisions
//! - One retry engine shared by every startup dependency
//! - Per-dependency policy comes from configuration

pub mod backoff;
pub mod retries;

pub use backoff::Backoff;
pub use retries::{retry, Exhausted, RetryPolicy};
