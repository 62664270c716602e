//! # hasnap-adapter-fs
//!
//! Filesystem implementation of the `SnapshotSink` port.
//!
//! Snapshots are written under a single output directory, which is created on
//! first use. The file is first written next to its target and then renamed,
//! so a reader never observes a half-written snapshot.
//!
//! ## Dependency rule
//! Depends on `hasnap-app` (for the port trait) and `hasnap-domain`.

use std::path::{Path, PathBuf};

use hasnap_app::ports::SnapshotSink;
use hasnap_domain::error::SnapshotError;

/// Errors raised while writing a snapshot file.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// The name would escape the output directory.
    #[error("invalid snapshot file name {0:?}")]
    InvalidFileName(String),

    #[error("unable to create output directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<SinkError> for SnapshotError {
    fn from(err: SinkError) -> Self {
        Self::Storage(Box::new(err))
    }
}

/// Writes snapshots as files under `output_dir`.
#[derive(Debug, Clone)]
pub struct FsSnapshotSink {
    output_dir: PathBuf,
}

impl FsSnapshotSink {
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    async fn write_file(&self, file_name: &str, contents: String) -> Result<PathBuf, SinkError> {
        if !is_plain_file_name(file_name) {
            return Err(SinkError::InvalidFileName(file_name.to_string()));
        }

        if tokio::fs::metadata(&self.output_dir).await.is_err() {
            tracing::warn!(path = %self.output_dir.display(), "output directory missing, creating it");
        }
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|source| SinkError::CreateDir {
                path: self.output_dir.clone(),
                source,
            })?;

        let target = self.output_dir.join(file_name);
        let staging = self.output_dir.join(format!(".{file_name}.tmp"));
        tokio::fs::write(&staging, contents)
            .await
            .map_err(|source| SinkError::Write {
                path: staging.clone(),
                source,
            })?;
        tokio::fs::rename(&staging, &target)
            .await
            .map_err(|source| SinkError::Write {
                path: target.clone(),
                source,
            })?;

        tracing::debug!(path = %target.display(), "snapshot written");
        Ok(target)
    }
}

fn is_plain_file_name(file_name: &str) -> bool {
    !file_name.is_empty()
        && file_name != "."
        && file_name != ".."
        && !file_name.contains(['/', '\\'])
}

impl SnapshotSink for FsSnapshotSink {
    async fn write(&self, file_name: &str, contents: String) -> Result<String, SnapshotError> {
        let path = self.write_file(file_name, contents).await?;
        Ok(path.display().to_string())
    }
}
