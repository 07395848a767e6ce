//! Report rendering for the CLI.
//!
//! Two renditions of a [`MonitorReport`]: a human-readable summary and a
//! pretty-printed JSON document. Both are plain strings; the binary
//! decides where they go.

use std::fmt::Write;

use anyhow::Result;

use crate::config::MonitorConfig;
use crate::data::format_timestamp;
use crate::detect::MonitorReport;

/// Render the human-readable report.
pub fn render_text(report: &MonitorReport, config: &MonitorConfig) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail; discard the fmt::Result noise.
    let _ = writeln!(out, "Heartbeat Monitor Results");
    let _ = writeln!(out, "{}", "=".repeat(30));
    let _ = writeln!(out, "Configuration:");
    let _ = writeln!(out, "  Expected interval: {} seconds", config.interval_seconds());
    let _ = writeln!(out, "  Allowed misses: {}", config.allowed_misses());
    let _ = writeln!(out, "  Tolerance: {}%", config.tolerance() * 100.0);
    let _ = writeln!(out, "  Future limit: {} seconds", config.future_limit().num_seconds());
    let _ = writeln!(out, "  Gap limit: {}x", config.gap_limit());
    let _ = writeln!(out);

    if report.alerts.is_empty() {
        let _ = writeln!(out, "No alerts detected.");
    } else {
        let _ = writeln!(out, "Found {} alert(s):", report.alerts.len());
        for alert in &report.alerts {
            let _ = writeln!(
                out,
                "Service '{}' missed heartbeats - Alert at: {}",
                alert.service,
                format_timestamp(alert.alert_at)
            );
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Services: {} tracked, {} valid events, {} malformed, {} duplicate",
        report.total_services(),
        report.total_events(),
        report.malformed,
        report.duplicates
    );
    for (service, stats) in &report.services {
        let _ = writeln!(
            out,
            "  {}: {} events, {} alert(s)",
            service, stats.total_events, stats.alerts
        );
    }

    out
}

/// Render the report as pretty-printed JSON.
pub fn render_json(report: &MonitorReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::HeartbeatMonitor;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn report() -> (MonitorReport, MonitorConfig) {
        let monitor = HeartbeatMonitor::default();
        let events = vec![
            json!({"service": "email", "timestamp": "2025-08-04T10:00:00Z"}),
            json!({"service": "email", "timestamp": "2025-08-04T10:06:00Z"}),
            json!({"service": "broken"}),
        ];
        let now = Utc.with_ymd_and_hms(2025, 8, 4, 23, 0, 0).unwrap();
        let report = monitor.run_at(&events, now);
        (report, monitor.config().clone())
    }

    #[test]
    fn test_text_report_lists_configuration_and_alerts() {
        let (report, config) = report();
        let text = render_text(&report, &config);

        assert!(text.contains("Expected interval: 60 seconds"));
        assert!(text.contains("Allowed misses: 3"));
        assert!(text.contains("Tolerance: 10%"));
        assert!(text.contains("Gap limit: 10x"));
        assert!(text.contains("Service 'email' missed heartbeats - Alert at: 2025-08-04T10:03:00Z"));
        assert!(text.contains("1 malformed"));
    }

    #[test]
    fn test_text_report_without_alerts() {
        let config = MonitorConfig::default();
        let text = render_text(&MonitorReport::default(), &config);
        assert!(text.contains("No alerts detected."));
    }

    #[test]
    fn test_json_report_round_trips() {
        let (report, _) = report();
        let rendered = render_json(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(value["malformed"], 1);
        assert_eq!(value["alerts"][0]["service"], "email");
        assert_eq!(value["alerts"][0]["alert_at"], "2025-08-04T10:03:00Z");
    }
}
