//! Persistence sinks for normalized record sets
//!
//! The write is scoped: serialize, write to a temp file next to the
//! destination, then rename over it. The handle is released on every
//! exit path and a partially-written destination is never observable.

use std::fs::{self, File};
use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::Value;
use tracing::debug;

use crate::error::SinkError;

/// Destination-addressed write of a record set
pub trait RecordSink: Send + Sync {
    /// Write `records` to `destination`, replacing any previous content
    fn write(&self, destination: &Utf8Path, records: &[Value]) -> Result<(), SinkError>;
}

/// Sink that writes record sets as pretty-printed JSON files
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFileSink;

impl JsonFileSink {
    /// Create a new JSON file sink
    pub fn new() -> Self {
        Self
    }
}

impl RecordSink for JsonFileSink {
    fn write(&self, destination: &Utf8Path, records: &[Value]) -> Result<(), SinkError> {
        let serialized = serde_json::to_vec_pretty(records)?;

        if let Some(parent) = destination.parent() {
            if !parent.as_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| SinkError::Io {
                    path: parent.to_owned(),
                    source,
                })?;
            }
        }

        // Write to a temp file in the same directory, then rename over the
        // destination so readers never see a partial record set.
        let temp_path = Utf8PathBuf::from(format!("{destination}.tmp"));

        let mut file = File::create(&temp_path).map_err(io_error(&temp_path))?;
        file.write_all(&serialized).map_err(io_error(&temp_path))?;
        file.sync_all().map_err(io_error(&temp_path))?;
        drop(file);

        fs::rename(&temp_path, destination).map_err(io_error(destination))?;

        debug!(
            destination = %destination,
            records = records.len(),
            bytes = serialized.len(),
            "record set written"
        );

        Ok(())
    }
}

fn io_error(path: &Utf8Path) -> impl FnOnce(std::io::Error) -> SinkError {
    let path = path.to_owned();
    move |source| SinkError::Io { path, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_destination(name: &str) -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::TempDir::new().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join(name)).unwrap();
        (dir, path)
    }

    #[test]
    fn test_writes_record_set_as_json() {
        let (_dir, dest) = temp_destination("users.json");
        let records = vec![json!({"id": 1, "nombre": "A"})];

        JsonFileSink::new().write(&dest, &records).unwrap();

        let written: Vec<Value> =
            serde_json::from_str(&fs::read_to_string(&dest).unwrap()).unwrap();
        assert_eq!(written, records);
    }

    #[test]
    fn test_creates_parent_directories() {
        let (_dir, dest) = temp_destination("nested/deeper/users.json");

        JsonFileSink::new().write(&dest, &[json!({"id": 1})]).unwrap();

        assert!(dest.exists());
    }

    #[test]
    fn test_overwrites_existing_destination() {
        let (_dir, dest) = temp_destination("users.json");
        let sink = JsonFileSink::new();

        sink.write(&dest, &[json!({"id": 1})]).unwrap();
        sink.write(&dest, &[json!({"id": 2})]).unwrap();

        let written: Vec<Value> =
            serde_json::from_str(&fs::read_to_string(&dest).unwrap()).unwrap();
        assert_eq!(written, vec![json!({"id": 2})]);
    }

    #[test]
    fn test_leaves_no_temp_file_behind() {
        let (_dir, dest) = temp_destination("users.json");

        JsonFileSink::new().write(&dest, &[json!({"id": 1})]).unwrap();

        let temp_path = Utf8PathBuf::from(format!("{dest}.tmp"));
        assert!(!temp_path.exists());
    }

    #[test]
    fn test_empty_record_set_writes_empty_array() {
        let (_dir, dest) = temp_destination("empty.json");

        JsonFileSink::new().write(&dest, &[]).unwrap();

        let written: Vec<Value> =
            serde_json::from_str(&fs::read_to_string(&dest).unwrap()).unwrap();
        assert!(written.is_empty());
    }

    #[test]
    fn test_unwritable_destination_surfaces_io_error() {
        // A regular file where the parent directory should be
        let (_dir, blocker) = temp_destination("blocker");
        fs::write(&blocker, b"in the way").unwrap();
        let dest = blocker.join("users.json");

        let err = JsonFileSink::new()
            .write(&dest, &[json!({"id": 1})])
            .unwrap_err();

        assert!(matches!(err, SinkError::Io { .. }));
    }
}
