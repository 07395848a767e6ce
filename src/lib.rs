//! # pulsewatch
//!
//! Heartbeat gap detection for independent named services.
//!
//! Given a batch of raw timestamped "heartbeat" records and a set of
//! tunable parameters, this crate determines where each service stopped
//! emitting beats within an acceptable margin and produces a sorted list
//! of alert records marking the points where a run of consecutive missed
//! beats crossed the configured threshold.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │  ┌────────┐   ┌──────────────┐   ┌──────────────┐   ┌───────┐ │
//! │  │ source │──▶│     data     │──▶│    detect    │──▶│report │ │
//! │  │ (input)│   │(validate/sort)   │(state machine)   │(render)│ │
//! │  └────────┘   └──────────────┘   └──────────────┘   └───────┘ │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`config`]**: Validated engine parameters ([`MonitorConfig`]) and the
//!   layered file/environment [`Settings`] loader
//! - **[`data`]**: Timestamp normalization, record validation, and
//!   per-service grouping/ordering/de-duplication
//! - **[`detect`]**: The expected-clock gap detector and the
//!   [`HeartbeatMonitor`] aggregator
//! - **[`source`]**: The [`EventSource`] collaborator seam with a
//!   file-based implementation
//! - **[`report`]**: Human-readable and JSON renderings of a run's outcome
//!
//! Data flows strictly forward; no component depends on a later one.
//!
//! ## Usage
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use pulsewatch::{HeartbeatMonitor, MonitorConfig};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), pulsewatch::ConfigError> {
//! let config = MonitorConfig::new(60, 3, 0.1, 300, 10)?;
//! let monitor = HeartbeatMonitor::new(config);
//!
//! let events = vec![
//!     json!({"service": "email", "timestamp": "2025-08-04T10:00:00Z"}),
//!     json!({"service": "email", "timestamp": "2025-08-04T10:06:00Z"}),
//! ];
//!
//! // Pin the wall clock for a deterministic result
//! let now = Utc.with_ymd_and_hms(2025, 8, 4, 23, 0, 0).unwrap();
//! let report = monitor.run_at(&events, now);
//! assert_eq!(report.alerts.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! The engine is synchronous and holds no state across runs; the only
//! implicit input is the wall clock, which enters through a single
//! explicit argument (or is read once by [`HeartbeatMonitor::run`]).

pub mod config;
pub mod data;
pub mod detect;
pub mod report;
pub mod source;

// Re-export main types for convenience
pub use config::{ConfigError, MonitorConfig, Settings};
pub use data::{
    format_timestamp, group_by_service, parse_timestamp, Event, GroupedEvents, RawEvent,
    RejectReason, ServiceTimeline,
};
pub use detect::{detect_missed_heartbeats, Alert, HeartbeatMonitor, MonitorReport, ServiceStats};
pub use source::{EventSource, FileSource};
