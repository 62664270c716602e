//! Snapshot service — the `export_data` and `import_data` use-cases.
//!
//! Composes the [`SnapshotBuilder`], the [`Reconciler`], a [`SnapshotSink`],
//! and a [`Notifier`]. Runs issued through one service are serialized.

use std::error::Error;

use hasnap_domain::error::{SnapshotError, ValidationError};
use hasnap_domain::notification::Notification;
use serde::Serialize;
use tokio::sync::Mutex;

use super::reconciler::{ImportTally, Reconciler};
use super::snapshot_builder::{ExportOptions, SnapshotBuilder};
use crate::ports::{
    AreaRepository, ConfigEntryRepository, DeviceRepository, EntityRepository, Notifier,
    SnapshotSink,
};

pub const EXPORT_NOTIFICATION_ID: &str = "ha_snapshot_export_data";
pub const EXPORT_ERROR_NOTIFICATION_ID: &str = "ha_snapshot_export_error";
pub const IMPORT_NOTIFICATION_ID: &str = "ha_snapshot_import_data";
pub const IMPORT_ERROR_NOTIFICATION_ID: &str = "ha_snapshot_import_error";

const DEFAULT_FILE_NAME: &str = "ha_snapshot_data.json";
const DEFAULT_DOWNLOAD_BASE: &str = "/local";

const IMPORT_LIMITATIONS: &str = "Import can only update existing entities' names and labels. \
It does NOT create new entities, change domains, reassign devices, or remove anything.";

/// Where and how exports are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotSettings {
    /// Name of the file handed to the sink.
    pub file_name: String,
    /// URL prefix under which the sink's output is served.
    pub download_base: String,
    /// Indent the written JSON.
    pub pretty: bool,
}

impl Default for SnapshotSettings {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_FILE_NAME.to_string(),
            download_base: DEFAULT_DOWNLOAD_BASE.to_string(),
            pretty: false,
        }
    }
}

impl SnapshotSettings {
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyFileName`] when `file_name` is blank.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.file_name.trim().is_empty() {
            return Err(ValidationError::EmptyFileName.into());
        }
        Ok(())
    }

    /// Public URL of the exported file.
    #[must_use]
    pub fn download_url(&self) -> String {
        format!(
            "{}/{}",
            self.download_base.trim_end_matches('/'),
            self.file_name
        )
    }
}

/// Parameters of one export run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportRequest {
    pub options: ExportOptions,
    /// Raise a notification with the outcome.
    pub notify: bool,
}

/// Outcome of a successful export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportReport {
    /// Where the sink stored the document.
    pub location: String,
    pub download_url: String,
    pub devices: usize,
    pub entities: usize,
}

/// Export and import orchestration.
pub struct SnapshotService<DR, ER, AR, CR, S, N> {
    builder: SnapshotBuilder<DR, ER, AR, CR>,
    reconciler: Reconciler<ER>,
    sink: S,
    notifier: N,
    settings: SnapshotSettings,
    run_lock: Mutex<()>,
}

impl<DR, ER, AR, CR, S, N> SnapshotService<DR, ER, AR, CR, S, N>
where
    DR: DeviceRepository + Send + Sync,
    ER: EntityRepository + Clone + Send + Sync,
    AR: AreaRepository + Send + Sync,
    CR: ConfigEntryRepository + Send + Sync,
    S: SnapshotSink + Send + Sync,
    N: Notifier + Send + Sync,
{
    pub fn new(
        devices: DR,
        entities: ER,
        areas: AR,
        config_entries: CR,
        sink: S,
        notifier: N,
        settings: SnapshotSettings,
    ) -> Self {
        Self {
            builder: SnapshotBuilder::new(devices, entities.clone(), areas, config_entries),
            reconciler: Reconciler::new(entities),
            sink,
            notifier,
            settings,
            run_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &SnapshotSettings {
        &self.settings
    }

    /// Build a snapshot and hand it to the sink.
    ///
    /// # Errors
    ///
    /// Returns the builder or sink failure. With `notify`, an error
    /// notification is raised before returning it.
    #[tracing::instrument(skip(self))]
    pub async fn export_data(&self, request: ExportRequest) -> Result<ExportReport, SnapshotError> {
        let _run = self.run_lock.lock().await;
        match self.export(&request.options).await {
            Ok(report) => {
                tracing::info!(
                    location = %report.location,
                    download_url = %report.download_url,
                    "snapshot exported"
                );
                if request.notify {
                    self.notify(Notification::new(
                        EXPORT_NOTIFICATION_ID,
                        "HA Snapshot Created",
                        format!(
                            "Your HA snapshot file is ready! [Click here to download]({})",
                            report.download_url
                        ),
                    ))
                    .await;
                }
                Ok(report)
            }
            Err(err) => {
                let reason = describe(&err);
                tracing::error!(error = %reason, "snapshot export failed");
                if request.notify {
                    self.notify(Notification::new(
                        EXPORT_ERROR_NOTIFICATION_ID,
                        "HA Snapshot Error",
                        format!("Failed to export data: {reason}"),
                    ))
                    .await;
                }
                Err(err)
            }
        }
    }

    /// Apply a snapshot document to the entity registry.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Document`] for unreadable input and
    /// [`SnapshotError::ImportAborted`] when the registry fails part-way.
    #[tracing::instrument(skip(self, text), fields(bytes = text.len()))]
    pub async fn import_data(&self, text: &str, notify: bool) -> Result<ImportTally, SnapshotError> {
        let _run = self.run_lock.lock().await;
        match self.reconciler.import_str(text).await {
            Ok(tally) => {
                if notify {
                    self.notify(Notification::new(
                        IMPORT_NOTIFICATION_ID,
                        "HA Snapshot Imported",
                        format!(
                            "Applied {} changes, skipped {}.",
                            tally.changes_applied, tally.changes_skipped
                        ),
                    ))
                    .await;
                }
                Ok(tally)
            }
            Err(err) => {
                let reason = describe(&err);
                tracing::error!(error = %reason, "snapshot import failed");
                if notify {
                    self.notify(Notification::new(
                        IMPORT_ERROR_NOTIFICATION_ID,
                        "HA Snapshot Error",
                        format!("Failed to import data: {reason}"),
                    ))
                    .await;
                }
                Err(err)
            }
        }
    }

    /// # Errors
    ///
    /// Returns the notifier failure.
    pub async fn notifications(&self) -> Result<Vec<Notification>, SnapshotError> {
        self.notifier.get_all().await
    }

    /// # Errors
    ///
    /// Returns the notifier failure.
    pub async fn dismiss_notification(&self, notification_id: &str) -> Result<(), SnapshotError> {
        self.notifier.dismiss(notification_id).await
    }

    async fn export(&self, options: &ExportOptions) -> Result<ExportReport, SnapshotError> {
        let document = self.builder.build(options).await?;
        let contents = document
            .to_json(self.settings.pretty)
            .map_err(|err| SnapshotError::Storage(Box::new(err)))?;
        let location = self.sink.write(&self.settings.file_name, contents).await?;
        Ok(ExportReport {
            location,
            download_url: self.settings.download_url(),
            devices: document.devices().count(),
            entities: document.entities().count(),
        })
    }

    /// Notifications are best effort; a failure is logged and dropped.
    async fn notify(&self, notification: Notification) {
        let notification_id = notification.notification_id.clone();
        if let Err(err) = self.notifier.create(notification).await {
            tracing::warn!(%notification_id, error = %describe(&err), "unable to raise notification");
        }
    }
}

/// What an import can and cannot change, for display to users.
#[must_use]
pub fn import_limitations() -> &'static str {
    IMPORT_LIMITATIONS
}

/// Render an error and its sources on one line.
fn describe(err: &(dyn Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
