//! Monitor configuration and validation.
//!
//! [`MonitorConfig`] holds the tunable parameters of the detection engine
//! and refuses construction when any of them is out of range. [`Settings`]
//! is the loosely-typed layer underneath it: defaults, an optional TOML
//! file, and `PULSEWATCH_`-prefixed environment variables, merged in that
//! order before CLI flags are applied on top.

use std::path::Path;

use chrono::TimeDelta;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;

/// Upper bound on the heartbeat interval.
pub const MAX_INTERVAL_SECONDS: i64 = 3600;
/// Upper bound on the consecutive-miss threshold.
pub const MAX_ALLOWED_MISSES: u32 = 10;

/// Errors raised while building a [`MonitorConfig`].
///
/// All of these are fatal: the engine never runs with parameters it could
/// not validate.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Interval outside 1..=3600 seconds.
    #[error("interval must be between 1 and {MAX_INTERVAL_SECONDS} seconds, got {0}")]
    Interval(i64),

    /// Allowed misses outside 1..=10.
    #[error("allowed_misses must be between 1 and {MAX_ALLOWED_MISSES}, got {0}")]
    AllowedMisses(u32),

    /// Tolerance outside 0.0..=1.0.
    #[error("tolerance must be between 0.0 and 1.0, got {0}")]
    Tolerance(f64),

    /// Negative future limit.
    #[error("future_limit must be non-negative, got {0}")]
    FutureLimit(i64),

    /// Zero gap limit.
    #[error("gap_limit must be positive, got {0}")]
    GapLimit(u32),

    /// Settings file or environment could not be read.
    #[error("failed to load settings: {0}")]
    Settings(#[from] config::ConfigError),
}

/// Validated, immutable engine configuration.
///
/// Fields are private so a value of this type always satisfies its ranges;
/// construct one with [`MonitorConfig::new`] or via [`Settings`].
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    interval_seconds: i64,
    allowed_misses: u32,
    tolerance: f64,
    future_limit_seconds: i64,
    gap_limit: u32,
    tolerance_window: TimeDelta,
}

impl MonitorConfig {
    /// Validate and build a configuration.
    ///
    /// * `interval_seconds` - expected spacing of heartbeats (1..=3600)
    /// * `allowed_misses` - consecutive misses before an alert fires (1..=10)
    /// * `tolerance` - fraction of the interval within which a beat still
    ///   counts as on time (0.0..=1.0)
    /// * `future_limit_seconds` - reserved; accepted and stored but the
    ///   future-timestamp bound is currently fixed at 24 hours
    /// * `gap_limit` - multiplier of the interval beyond which a silent
    ///   service is treated as retired rather than missing
    pub fn new(
        interval_seconds: i64,
        allowed_misses: u32,
        tolerance: f64,
        future_limit_seconds: i64,
        gap_limit: u32,
    ) -> Result<Self, ConfigError> {
        if interval_seconds <= 0 || interval_seconds > MAX_INTERVAL_SECONDS {
            return Err(ConfigError::Interval(interval_seconds));
        }
        if allowed_misses == 0 || allowed_misses > MAX_ALLOWED_MISSES {
            return Err(ConfigError::AllowedMisses(allowed_misses));
        }
        if !(0.0..=1.0).contains(&tolerance) {
            return Err(ConfigError::Tolerance(tolerance));
        }
        if future_limit_seconds < 0 {
            return Err(ConfigError::FutureLimit(future_limit_seconds));
        }
        if gap_limit == 0 {
            return Err(ConfigError::GapLimit(gap_limit));
        }

        // Converted once; all later arithmetic compares TimeDeltas directly.
        let tolerance_window =
            TimeDelta::microseconds((interval_seconds as f64 * tolerance * 1_000_000.0) as i64);

        Ok(Self {
            interval_seconds,
            allowed_misses,
            tolerance,
            future_limit_seconds,
            gap_limit,
            tolerance_window,
        })
    }

    /// Expected spacing between heartbeats.
    pub fn interval(&self) -> TimeDelta {
        TimeDelta::seconds(self.interval_seconds)
    }

    /// Expected spacing in whole seconds, for display.
    pub fn interval_seconds(&self) -> i64 {
        self.interval_seconds
    }

    /// Consecutive misses that trigger an alert.
    pub fn allowed_misses(&self) -> u32 {
        self.allowed_misses
    }

    /// Tolerance as the configured fraction.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Symmetric margin around an expected beat (`interval * tolerance`).
    pub fn tolerance_window(&self) -> TimeDelta {
        self.tolerance_window
    }

    /// Reserved future-timestamp bound. Stored but not consulted; the
    /// validator's bound is fixed at 24 hours.
    pub fn future_limit(&self) -> TimeDelta {
        TimeDelta::seconds(self.future_limit_seconds)
    }

    /// Gap-limit multiplier.
    pub fn gap_limit(&self) -> u32 {
        self.gap_limit
    }

    /// Silence longer than this marks a service as retired
    /// (`interval * gap_limit`).
    pub fn max_gap(&self) -> TimeDelta {
        TimeDelta::seconds(self.interval_seconds * i64::from(self.gap_limit))
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        // The reference parameters: 60s interval, 3 misses, 10% tolerance.
        Self {
            interval_seconds: 60,
            allowed_misses: 3,
            tolerance: 0.1,
            future_limit_seconds: 300,
            gap_limit: 10,
            tolerance_window: TimeDelta::seconds(6),
        }
    }
}

/// Unvalidated settings as read from file/environment, before CLI flags.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub interval_seconds: i64,
    pub allowed_misses: u32,
    pub tolerance: f64,
    pub future_limit_seconds: i64,
    pub gap_limit: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            interval_seconds: 60,
            allowed_misses: 3,
            tolerance: 0.1,
            future_limit_seconds: 300,
            gap_limit: 10,
        }
    }
}

impl Settings {
    /// Load settings, layering an optional TOML file and
    /// `PULSEWATCH_`-prefixed environment variables over the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("interval_seconds", defaults.interval_seconds)?
            .set_default("allowed_misses", i64::from(defaults.allowed_misses))?
            .set_default("tolerance", defaults.tolerance)?
            .set_default("future_limit_seconds", defaults.future_limit_seconds)?
            .set_default("gap_limit", i64::from(defaults.gap_limit))?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let config = builder
            .add_source(Environment::with_prefix("PULSEWATCH"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Validate into an engine configuration.
    pub fn into_monitor_config(self) -> Result<MonitorConfig, ConfigError> {
        MonitorConfig::new(
            self.interval_seconds,
            self.allowed_misses,
            self.tolerance,
            self.future_limit_seconds,
            self.gap_limit,
        )
    }
}
