//! Per-service timelines: grouping, ordering, and de-duplication.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::warn;

use super::event::{validate_event, Event, RawEvent};

/// An ordered, duplicate-free sequence of heartbeats for one service.
///
/// Invariant after construction: instants are strictly increasing. Only
/// [`group_by_service`] builds these, so the invariant cannot be broken
/// from outside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceTimeline {
    events: Vec<Event>,
}

impl ServiceTimeline {
    /// Sort a working list chronologically and keep the first event for
    /// each distinct instant, reporting every discarded duplicate.
    fn from_unsorted(service: &str, mut events: Vec<Event>, duplicates: &mut usize) -> Self {
        // Stable sort: among same-instant events the earliest-seen wins.
        events.sort_by_key(Event::instant);

        let mut unique: Vec<Event> = Vec::with_capacity(events.len());
        for event in events {
            if unique.last().map(Event::instant) == Some(event.instant()) {
                warn!(
                    service,
                    instant = %event.instant(),
                    "skipping duplicate heartbeat"
                );
                *duplicates += 1;
                continue;
            }
            unique.push(event);
        }

        Self { events: unique }
    }

    /// Events in ascending instant order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// First (oldest) heartbeat, if any.
    pub fn first(&self) -> Option<&Event> {
        self.events.first()
    }

    /// Last (newest) heartbeat, if any.
    pub fn last(&self) -> Option<&Event> {
        self.events.last()
    }
}

/// Result of partitioning raw records into per-service timelines.
#[derive(Debug, Clone, Default)]
pub struct GroupedEvents {
    /// Timelines keyed by trimmed service name.
    pub timelines: BTreeMap<String, ServiceTimeline>,
    /// Records dropped by validation.
    pub malformed: usize,
    /// Records dropped as exact-instant duplicates.
    pub duplicates: usize,
}

/// Partition raw records by service, dropping malformed records and
/// exact-timestamp duplicates.
///
/// Every drop is logged on the diagnostic channel and counted; the counts
/// do not affect the surviving data. An empty input yields an empty map.
pub fn group_by_service(events: &[RawEvent], now: DateTime<Utc>) -> GroupedEvents {
    let mut buckets: BTreeMap<String, Vec<Event>> = BTreeMap::new();
    let mut malformed = 0;

    for raw in events {
        match validate_event(raw, now) {
            Ok(event) => buckets
                .entry(event.service().to_string())
                .or_default()
                .push(event),
            Err(reason) => {
                warn!(%reason, record = %raw, "skipping malformed event");
                malformed += 1;
            }
        }
    }

    let mut duplicates = 0;
    let mut timelines = BTreeMap::new();
    for (service, list) in buckets {
        let timeline = ServiceTimeline::from_unsorted(&service, list, &mut duplicates);
        timelines.insert(service, timeline);
    }

    if malformed > 0 {
        warn!(
            total = events.len(),
            skipped = malformed,
            "skipped malformed events"
        );
    }

    GroupedEvents {
        timelines,
        malformed,
        duplicates,
    }
}
