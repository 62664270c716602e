//! Persistence sink port — where serialized snapshots are written.

use std::future::Future;
use std::sync::Arc;

use hasnap_domain::error::SnapshotError;

/// Writes a UTF-8 text blob under a named location.
pub trait SnapshotSink {
    /// Write `contents` as `file_name`, creating the output location when it
    /// does not exist yet. Returns a human-readable description of where the
    /// blob ended up (typically a path).
    fn write(
        &self,
        file_name: &str,
        contents: String,
    ) -> impl Future<Output = Result<String, SnapshotError>> + Send;
}

impl<T: SnapshotSink + Send + Sync> SnapshotSink for Arc<T> {
    fn write(
        &self,
        file_name: &str,
        contents: String,
    ) -> impl Future<Output = Result<String, SnapshotError>> + Send {
        (**self).write(file_name, contents)
    }
}
