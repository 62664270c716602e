//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`SnapshotError`] via `#[from]` (or an explicit `From` impl for boxed
//! collaborator failures).

/// Top-level error returned by every port and use-case.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// A domain invariant was violated.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A record that had to exist was not found.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// The supplied snapshot document could not be interpreted.
    #[error("invalid snapshot document")]
    Document(#[from] DocumentError),

    /// An optional collaborator capability is not available.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),

    /// An import stopped part-way; updates applied before the failure are kept.
    #[error("import aborted after {changes_applied} applied and {changes_skipped} skipped changes")]
    ImportAborted {
        changes_applied: usize,
        changes_skipped: usize,
        #[source]
        source: Box<SnapshotError>,
    },

    /// A registry, sink, or notifier could not be reached.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Domain invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("identifier must not be empty")]
    EmptyId,
    #[error("entity_id must not be empty")]
    EmptyEntityId,
    #[error("file name must not be empty")]
    EmptyFileName,
}

/// A lookup that required a match came back empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} not found: {id}")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// Failure to read a snapshot document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The text is not JSON, or its shape does not match the document schema.
    #[error("failed to parse snapshot document")]
    Parse(#[from] serde_json::Error),
}
