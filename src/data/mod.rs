//! Data models and processing for heartbeat events.
//!
//! This module turns opaque caller-supplied records into the ordered,
//! validated timelines the detection engine consumes.
//!
//! ## Submodules
//!
//! - [`timestamp`]: Normalization of heterogeneous ISO-8601 text to UTC instants
//! - [`event`]: Record validation ([`RawEvent`] -> [`Event`]) and rejection reasons
//! - [`timeline`]: Per-service grouping, chronological ordering, de-duplication
//!
//! ## Data Flow
//!
//! ```text
//! RawEvent (opaque JSON)
//!        │
//!        ▼
//! validate_event()  ──▶ rejected records logged + counted
//!        │
//!        ▼
//! group_by_service() ──▶ BTreeMap<service, ServiceTimeline>
//! ```

pub mod event;
pub mod timeline;
pub mod timestamp;

pub use event::{validate_event, Event, RawEvent, RejectReason, MAX_SERVICE_NAME_LEN};
pub use timeline::{group_by_service, GroupedEvents, ServiceTimeline};
pub use timestamp::{format_timestamp, parse_timestamp};
