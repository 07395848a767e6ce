//! Gap detection and alert aggregation.
//!
//! ## Submodules
//!
//! - [`detector`]: The per-service expected-clock state machine
//! - [`monitor`]: [`HeartbeatMonitor`], which fans detection out across
//!   services and aggregates the results into a [`MonitorReport`]
//!
//! The wall clock enters this layer exactly once per run, as an explicit
//! `DateTime<Utc>` argument. Production callers use
//! [`HeartbeatMonitor::run`], which reads the real clock; tests pin the
//! moment via [`HeartbeatMonitor::run_at`].

pub mod detector;
pub mod monitor;

pub use detector::detect_missed_heartbeats;
pub use monitor::{Alert, HeartbeatMonitor, MonitorReport, ServiceStats};
