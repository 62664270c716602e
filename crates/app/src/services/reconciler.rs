//! Reconciler — re-applies entity names and labels from a snapshot document.
//!
//! Only existing entities are touched, and only their display name and the
//! label list stored under this system's options namespace. Records are
//! processed in document order; a failure part-way keeps the updates already
//! applied.

use hasnap_domain::entity::{Entity, EntityUpdate};
use hasnap_domain::error::SnapshotError;
use hasnap_domain::id::EntityId;
use hasnap_domain::snapshot::import::{ImportDocument, ImportEntity};
use serde::Serialize;

use crate::ports::EntityRepository;

/// Outcome counters of one import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportTally {
    /// Records that produced an update.
    pub changes_applied: usize,
    /// Records that produced nothing (no id, unknown entity, nothing changed).
    pub changes_skipped: usize,
}

impl ImportTally {
    /// Number of leaf records processed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.changes_applied + self.changes_skipped
    }
}

/// Applies import documents to the entity registry.
pub struct Reconciler<ER> {
    entities: ER,
}

impl<ER: EntityRepository + Send + Sync> Reconciler<ER> {
    pub fn new(entities: ER) -> Self {
        Self { entities }
    }

    /// Parse `text` and apply it.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Document`] when the text cannot be parsed, in
    /// which case nothing is touched. See [`apply`](Self::apply) for the
    /// remaining failures.
    pub async fn import_str(&self, text: &str) -> Result<ImportTally, SnapshotError> {
        let document = ImportDocument::parse(text)?;
        self.apply(&document).await
    }

    /// Apply every leaf record of `document`, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::ImportAborted`] when a lookup or update fails;
    /// it carries the counters reached before the failure and the cause.
    #[tracing::instrument(skip_all)]
    pub async fn apply(&self, document: &ImportDocument) -> Result<ImportTally, SnapshotError> {
        let mut tally = ImportTally::default();
        for record in document.records() {
            match self.reconcile(record).await {
                Ok(true) => tally.changes_applied += 1,
                Ok(false) => tally.changes_skipped += 1,
                Err(source) => {
                    tracing::error!(
                        error = %source,
                        changes_applied = tally.changes_applied,
                        changes_skipped = tally.changes_skipped,
                        "import aborted"
                    );
                    return Err(SnapshotError::ImportAborted {
                        changes_applied: tally.changes_applied,
                        changes_skipped: tally.changes_skipped,
                        source: Box::new(source),
                    });
                }
            }
        }
        tracing::info!(
            changes_applied = tally.changes_applied,
            changes_skipped = tally.changes_skipped,
            "import finished"
        );
        Ok(tally)
    }

    /// Returns whether an update was applied for this record.
    async fn reconcile(&self, record: &ImportEntity) -> Result<bool, SnapshotError> {
        let Some(raw_id) = record.entity_id.as_deref() else {
            tracing::debug!("skipping record without entity_id");
            return Ok(false);
        };
        let entity_id = EntityId::from(raw_id);
        let Some(current) = self.entities.find_by_entity_id(&entity_id).await? else {
            tracing::debug!(%entity_id, "skipping unknown entity");
            return Ok(false);
        };

        let update = stage(&current, record);
        if update.is_empty() {
            return Ok(false);
        }
        tracing::debug!(
            %entity_id,
            name = update.name.is_some(),
            labels = update.options.is_some(),
            "updating entity"
        );
        self.entities.update(&entity_id, update).await?;
        Ok(true)
    }
}

/// The changes `record` asks for that differ from `current`.
fn stage(current: &Entity, record: &ImportEntity) -> EntityUpdate {
    let name = record
        .name
        .as_ref()
        .filter(|name| !name.is_empty() && current.name.as_ref() != Some(*name))
        .cloned();

    let options = record
        .labels
        .as_ref()
        .filter(|labels| !labels.is_empty() && **labels != current.labels())
        .map(|labels| current.options.with_labels(labels));

    EntityUpdate { name, options }
}
