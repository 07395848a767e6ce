//! File-based event source.
//!
//! Reads a JSON array of raw heartbeat records from disk.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::EventSource;
use crate::data::RawEvent;

/// An event source that reads records from a JSON file.
///
/// The file must contain a top-level JSON array; its elements are passed
/// through opaquely for the validator to judge. Read, parse, and shape
/// failures are captured as the source error instead of panicking or
/// aborting.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    last_error: Option<String>,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            last_error: None,
        }
    }

    /// Returns the path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventSource for FileSource {
    fn fetch(&mut self) -> Option<Vec<RawEvent>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                self.last_error = Some(format!("Read error: {}", e));
                return None;
            }
        };

        let value: Value = match serde_json::from_str(&content) {
            Ok(value) => value,
            Err(e) => {
                self.last_error = Some(format!("Parse error: {}", e));
                return None;
            }
        };

        match value {
            Value::Array(events) => {
                self.last_error = None;
                Some(events)
            }
            other => {
                self.last_error = Some(format!(
                    "Shape error: expected a JSON array of events, got {}",
                    type_name(&other)
                ));
                None
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample_json() -> &'static str {
        r#"[
            {"service": "email", "timestamp": "2025-08-04T10:00:00Z"},
            {"service": "email", "timestamp": "2025-08-04T10:01:00Z"},
            {"service": "broken"}
        ]"#
    }

    #[test]
    fn test_file_source_new() {
        let source = FileSource::new("/tmp/events.json");
        assert_eq!(source.path(), Path::new("/tmp/events.json"));
        assert_eq!(source.description(), "file: /tmp/events.json");
        assert!(source.error().is_none());
    }

    #[test]
    fn test_fetch_reads_array() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let mut source = FileSource::new(file.path());
        let events = source.fetch().unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0]["service"], "email");
        assert!(source.error().is_none());
    }

    #[test]
    fn test_fetch_missing_file() {
        let mut source = FileSource::new("/nonexistent/path/events.json");
        assert!(source.fetch().is_none());
        assert!(source.error().unwrap().contains("Read error"));
    }

    #[test]
    fn test_fetch_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let mut source = FileSource::new(file.path());
        assert!(source.fetch().is_none());
        assert!(source.error().unwrap().contains("Parse error"));
    }

    #[test]
    fn test_fetch_rejects_non_array_document() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"events": []}}"#).unwrap();

        let mut source = FileSource::new(file.path());
        assert!(source.fetch().is_none());
        let error = source.error().unwrap();
        assert!(error.contains("Shape error"));
        assert!(error.contains("an object"));
    }

    #[test]
    fn test_fetch_recovers_after_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[]").unwrap();

        let mut source = FileSource::new("/nonexistent/events.json");
        assert!(source.fetch().is_none());
        assert!(source.error().is_some());

        let mut source = FileSource::new(file.path());
        let events = source.fetch().unwrap();
        assert!(events.is_empty());
        assert!(source.error().is_none());
    }
}
