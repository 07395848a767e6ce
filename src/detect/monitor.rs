//! Alert aggregation across services.
//!
//! [`HeartbeatMonitor`] drives the whole pipeline: group raw records into
//! per-service timelines, run the gap detector on each, then flatten and
//! sort the alerts and compute per-service summary statistics for
//! downstream consumers.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::error;

use super::detector::detect_missed_heartbeats;
use crate::config::MonitorConfig;
use crate::data::{format_timestamp, group_by_service, RawEvent};

/// A threshold crossing for one service.
///
/// Terminal value: collected, sorted, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    /// Trimmed service name.
    pub service: String,
    /// Instant of the expected slot whose miss crossed the threshold,
    /// serialized as `YYYY-MM-DDTHH:MM:SSZ`.
    #[serde(serialize_with = "serialize_instant")]
    pub alert_at: DateTime<Utc>,
}

fn serialize_instant<S: Serializer>(
    instant: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_timestamp(*instant))
}

/// Per-service summary counts exposed to reporting collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServiceStats {
    /// Validated, de-duplicated events on this service's timeline.
    pub total_events: usize,
    /// Alerts fired for this service in this run.
    pub alerts: usize,
}

/// The complete outcome of one monitoring run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MonitorReport {
    /// All alerts across all services, ascending by instant, ties broken
    /// by service name.
    pub alerts: Vec<Alert>,
    /// Summary counts keyed by service name.
    pub services: BTreeMap<String, ServiceStats>,
    /// Raw records dropped by validation.
    pub malformed: usize,
    /// Raw records dropped as exact-instant duplicates.
    pub duplicates: usize,
    /// Raw records supplied by the caller, valid or not.
    pub total_records: usize,
}

impl MonitorReport {
    /// Number of distinct services that produced at least one valid event.
    pub fn total_services(&self) -> usize {
        self.services.len()
    }

    /// Validated events across all services.
    pub fn total_events(&self) -> usize {
        self.services.values().map(|s| s.total_events).sum()
    }
}

/// The detection engine: a validated configuration plus the run methods.
///
/// Construction goes through [`MonitorConfig`], which refuses out-of-range
/// parameters, so a monitor never runs with settings it could not
/// validate. The engine holds no other state; every run starts fresh.
#[derive(Debug, Clone, Default)]
pub struct HeartbeatMonitor {
    config: MonitorConfig,
}

impl HeartbeatMonitor {
    pub fn new(config: MonitorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Run detection with the real wall clock, read once up front.
    pub fn run(&self, events: &[RawEvent]) -> MonitorReport {
        self.run_at(events, Utc::now())
    }

    /// Run detection against an explicit wall-clock reading.
    ///
    /// This is the deterministic entry point: the same `events` and `now`
    /// always yield the same report. Services are processed independently;
    /// their order does not affect the output thanks to the final sort.
    pub fn run_at(&self, events: &[RawEvent], now: DateTime<Utc>) -> MonitorReport {
        let grouped = group_by_service(events, now);

        let mut alerts = Vec::new();
        let mut services = BTreeMap::new();

        for (service, timeline) in &grouped.timelines {
            let fired = detect_missed_heartbeats(timeline, &self.config, now);

            services.insert(
                service.clone(),
                ServiceStats {
                    total_events: timeline.len(),
                    alerts: fired.len(),
                },
            );
            alerts.extend(fired.into_iter().map(|alert_at| Alert {
                service: service.clone(),
                alert_at,
            }));
        }

        alerts.sort_by(|a, b| {
            a.alert_at
                .cmp(&b.alert_at)
                .then_with(|| a.service.cmp(&b.service))
        });

        MonitorReport {
            alerts,
            services,
            malformed: grouped.malformed,
            duplicates: grouped.duplicates,
            total_records: events.len(),
        }
    }

    /// Run detection on an opaque JSON document.
    ///
    /// A top-level value that is not an array is reported and treated as
    /// zero events: the call still returns an (empty) report rather than
    /// failing outright.
    pub fn run_json(&self, input: &Value) -> MonitorReport {
        match input.as_array() {
            Some(events) => self.run(events),
            None => {
                error!("events input must be a JSON array");
                MonitorReport::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn monitor() -> HeartbeatMonitor {
        HeartbeatMonitor::new(MonitorConfig::new(60, 3, 0.1, 300, 10).unwrap())
    }

    fn at(hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 4, hour, minute, second).unwrap()
    }

    fn beat(service: &str, timestamp: &str) -> Value {
        json!({"service": service, "timestamp": timestamp})
    }

    /// The sample fixture: email has a 3-minute gap, database a 2-minute
    /// one, api is perfectly on time, and three records are malformed.
    fn sample_events() -> Vec<Value> {
        vec![
            beat("email", "2025-08-04T10:00:00Z"),
            beat("email", "2025-08-04T10:01:00Z"),
            beat("email", "2025-08-04T10:02:00Z"),
            beat("email", "2025-08-04T10:06:00Z"),
            beat("database", "2025-08-04T10:00:00Z"),
            beat("database", "2025-08-04T10:01:00Z"),
            beat("database", "2025-08-04T10:04:00Z"),
            beat("api", "2025-08-04T10:00:00Z"),
            beat("api", "2025-08-04T10:01:00Z"),
            beat("api", "2025-08-04T10:02:00Z"),
            beat("api", "2025-08-04T10:03:00Z"),
            json!({"service": "broken"}),
            json!({"timestamp": "2025-08-04T10:00:00Z"}),
            beat("invalid", "not-a-timestamp"),
        ]
    }

    #[test]
    fn test_sample_events_report() {
        // Detection runs hours after the fixture window, so every service
        // is past the gap limit and no trailing projection fires.
        let report = monitor().run_at(&sample_events(), at(23, 0, 0));

        assert_eq!(report.malformed, 3);
        assert_eq!(report.duplicates, 0);
        assert_eq!(report.total_records, 14);
        assert_eq!(report.total_services(), 3);
        assert_eq!(report.total_events(), 11);

        assert_eq!(report.services["email"].total_events, 4);
        assert_eq!(report.services["email"].alerts, 1);
        assert_eq!(report.services["api"].alerts, 0);

        let email_alerts: Vec<_> =
            report.alerts.iter().filter(|a| a.service == "email").collect();
        assert_eq!(email_alerts.len(), 1);
        assert_eq!(email_alerts[0].alert_at, at(10, 5, 0));
    }

    #[test]
    fn test_alerts_sorted_globally_with_service_tiebreak() {
        // Two services going silent at the same time produce alerts at
        // identical instants; order then falls back to the service name.
        let events = vec![
            beat("zeta", "2025-08-04T10:00:00Z"),
            beat("alpha", "2025-08-04T10:00:00Z"),
        ];
        let report = monitor().run_at(&events, at(10, 9, 0));

        assert!(!report.alerts.is_empty());
        assert!(report.alerts.windows(2).all(|w| {
            (w[0].alert_at, &w[0].service) <= (w[1].alert_at, &w[1].service)
        }));
        let first_pair: Vec<_> = report
            .alerts
            .iter()
            .filter(|a| a.alert_at == report.alerts[0].alert_at)
            .map(|a| a.service.as_str())
            .collect();
        assert_eq!(first_pair, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_duplicates_neither_miss_nor_double_alert() {
        let events = vec![
            beat("email", "2025-08-04T10:00:00Z"),
            beat("email", "2025-08-04T10:00:00Z"),
            beat("email", "2025-08-04T10:01:00Z"),
            beat("email", "2025-08-04T10:01:00Z"),
            beat("email", "2025-08-04T10:02:00Z"),
        ];
        let report = monitor().run_at(&events, at(10, 2, 30));

        assert_eq!(report.duplicates, 2);
        assert_eq!(report.services["email"].total_events, 3);
        assert!(report.alerts.is_empty());
    }

    #[test]
    fn test_empty_input_yields_empty_report() {
        let report = monitor().run_at(&[], at(10, 0, 0));
        assert!(report.alerts.is_empty());
        assert!(report.services.is_empty());
        assert_eq!(report.total_records, 0);
    }

    #[test]
    fn test_single_event_timeline_yields_no_alerts() {
        let events = vec![beat("email", "2025-08-04T10:00:00Z")];
        let report = monitor().run_at(&events, at(10, 0, 30));
        assert!(report.alerts.is_empty());
        assert_eq!(report.services["email"].total_events, 1);
    }

    #[test]
    fn test_run_json_accepts_array() {
        let input = json!([
            {"service": "email", "timestamp": "2025-08-04T10:00:00Z"}
        ]);
        let report = monitor().run_json(&input);
        assert_eq!(report.total_records, 1);
    }

    #[test]
    fn test_run_json_rejects_non_array_without_failing() {
        for input in [json!({"events": []}), json!("nope"), json!(42), json!(null)] {
            let report = monitor().run_json(&input);
            assert!(report.alerts.is_empty());
            assert_eq!(report.total_records, 0);
        }
    }

    #[test]
    fn test_alert_serializes_wire_timestamp() {
        let alert = Alert {
            service: "email".to_string(),
            alert_at: at(10, 5, 0),
        };
        let json = serde_json::to_value(&alert).unwrap();
        assert_eq!(
            json,
            json!({"service": "email", "alert_at": "2025-08-04T10:05:00Z"})
        );
    }

    #[test]
    fn test_report_serializes_summary_fields() {
        let report = monitor().run_at(&sample_events(), at(23, 0, 0));
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["malformed"], 3);
        assert_eq!(json["services"]["email"]["total_events"], 4);
        assert!(json["alerts"].is_array());
    }
}
