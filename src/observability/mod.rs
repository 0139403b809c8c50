//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! config loading produces:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (load counters, loaded-module gauge)
//! ```
//!
//! # Design Decisions
//! - Library code only emits events; installing a subscriber or a metrics
//!   recorder is left to the binary
//! - Without a recorder, metric updates are no-ops

pub mod logging;
pub mod metrics;
