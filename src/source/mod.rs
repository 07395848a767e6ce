//! Event source abstraction for supplying raw heartbeat records.
//!
//! Loading events is a collaborator concern, not part of the detection
//! engine's contract. This module provides the trait seam between the two:
//! the engine consumes a `Vec<RawEvent>` and does not care whether it came
//! from a file, an upload, or a test fixture.

mod file;

pub use file::FileSource;

use std::fmt::Debug;

use crate::data::RawEvent;

/// Trait for collaborators that supply raw heartbeat records.
///
/// # Example
///
/// ```no_run
/// use pulsewatch::source::{EventSource, FileSource};
///
/// let mut source = FileSource::new("heartbeat_events.json");
/// if let Some(events) = source.fetch() {
///     println!("Got {} records", events.len());
/// }
/// ```
pub trait EventSource: Send + Debug {
    /// Fetch the current batch of raw records.
    ///
    /// Returns `None` when no events could be produced; [`error`] then
    /// explains why.
    ///
    /// [`error`]: EventSource::error
    fn fetch(&mut self) -> Option<Vec<RawEvent>>;

    /// Human-readable description of the source, for logs and reports.
    fn description(&self) -> &str;

    /// The error encountered by the last fetch, if any.
    fn error(&self) -> Option<&str>;
}
