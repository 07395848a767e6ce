//! Event validation.
//!
//! Raw records arrive as opaque JSON values; [`validate_event`] narrows
//! them to typed [`Event`]s or explains why they were dropped. Rejections
//! never abort a run - callers count them and move on.

use chrono::{DateTime, TimeDelta, Utc};
use serde_json::Value;
use thiserror::Error;

use super::timestamp::parse_timestamp;

/// Maximum accepted service name length, after trimming.
pub const MAX_SERVICE_NAME_LEN: usize = 100;

/// A raw heartbeat record as supplied by a collaborator. Expected, but not
/// guaranteed, to carry string `service` and `timestamp` fields.
pub type RawEvent = Value;

/// A validated heartbeat: a trimmed service name and a UTC instant.
///
/// Immutable once constructed; the fields are only readable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    service: String,
    instant: DateTime<Utc>,
}

impl Event {
    /// Trimmed, non-empty service name.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// When the heartbeat was emitted.
    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }
}

/// Why a raw record was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("record is not a JSON object")]
    NotAnObject,

    #[error("missing `service` field")]
    MissingService,

    #[error("missing `timestamp` field")]
    MissingTimestamp,

    #[error("`service` is not a string")]
    ServiceNotText,

    #[error("`service` is blank")]
    BlankService,

    #[error("`service` exceeds {MAX_SERVICE_NAME_LEN} characters")]
    ServiceTooLong,

    #[error("`timestamp` is not a parseable ISO-8601 date-time")]
    UnparseableTimestamp,

    #[error("`timestamp` is more than 24 hours in the future")]
    TooFarInFuture,
}

/// Validate one raw record against the current wall-clock time.
///
/// A well-formed record is a JSON object carrying a string `service`
/// (non-empty after trimming, at most 100 characters) and a parseable
/// `timestamp` no more than 24 hours ahead of `now`. The 24-hour bound is
/// fixed; the configured `future_limit` is accepted but not consulted.
pub fn validate_event(raw: &RawEvent, now: DateTime<Utc>) -> Result<Event, RejectReason> {
    let record = raw.as_object().ok_or(RejectReason::NotAnObject)?;

    let service = record.get("service").ok_or(RejectReason::MissingService)?;
    let timestamp = record.get("timestamp").ok_or(RejectReason::MissingTimestamp)?;

    let service = service.as_str().ok_or(RejectReason::ServiceNotText)?.trim();
    if service.is_empty() {
        return Err(RejectReason::BlankService);
    }
    if service.chars().count() > MAX_SERVICE_NAME_LEN {
        return Err(RejectReason::ServiceTooLong);
    }

    let text = timestamp.as_str().ok_or(RejectReason::UnparseableTimestamp)?;
    let instant = parse_timestamp(text).ok_or(RejectReason::UnparseableTimestamp)?;

    if instant > now + TimeDelta::hours(24) {
        return Err(RejectReason::TooFarInFuture);
    }

    Ok(Event {
        service: service.to_string(),
        instant,
    })
}
