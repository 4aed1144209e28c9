//! Export orchestration
//!
//! [`ExportOrchestrator`] runs one export mode for one record: it lays out the
//! target directories, drives the locator, fetcher and metadata exporter in
//! sequence, and finishes with a summary read back from disk.
//!
//! Assets are fetched one at a time. A failed asset is reported and counted,
//! then the export moves on to the next one.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::exporter::MetadataExporter;
use crate::fetcher::{AssetFetcher, HttpAssetFetcher, ImageFetcher};
use crate::locator::AssetLocator;
use crate::paths;
use crate::types::{
    AppRecord, DeviceFilter, DownloadTarget, Event, ExportMode, ExportSummary, IconSize,
};
use crate::utils::tally_directory;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Capacity of the progress event channel
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Stage names of an all-assets export
const ALL_STAGES: [&str; 3] = [
    "Downloading icons",
    "Downloading screenshots",
    "Generating app info",
];

/// What to export
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExportRequest {
    /// Content mode
    pub mode: ExportMode,
    /// Icon size, used by [`ExportMode::IconOnly`]
    pub icon_size: IconSize,
    /// Screenshot sets, used by [`ExportMode::ScreenshotsOnly`]
    pub device: DeviceFilter,
}

impl ExportRequest {
    /// Request for `mode` with the default icon size and both screenshot sets
    pub fn new(mode: ExportMode) -> Self {
        Self {
            mode,
            icon_size: IconSize::Large,
            device: DeviceFilter::All,
        }
    }
}

/// Runs exports under one output root
pub struct ExportOrchestrator {
    root: PathBuf,
    fetcher: ImageFetcher,
    exporter: MetadataExporter,
    event_tx: broadcast::Sender<Event>,
    quiet: bool,
}

impl ExportOrchestrator {
    /// Create an orchestrator writing under `root`
    ///
    /// With `quiet`, per-asset saves and failures are not emitted as events;
    /// failures are logged instead.
    pub fn new(root: impl Into<PathBuf>, source: Arc<dyn AssetFetcher>, quiet: bool) -> Self {
        let (event_tx, _rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            root: root.into(),
            fetcher: ImageFetcher::new(source, event_tx.clone()),
            exporter: MetadataExporter,
            event_tx,
            quiet,
        }
    }

    /// Create an orchestrator from configuration, fetching over HTTP
    ///
    /// # Errors
    /// Returns error if the output root cannot be resolved or the HTTP client
    /// cannot be built
    pub fn from_config(config: &Config) -> Result<Self> {
        let root = paths::resolve_root(&config.output)?;
        let source = HttpAssetFetcher::new(&config.http)?;
        Ok(Self::new(root, Arc::new(source), config.quiet))
    }

    /// Subscribe to progress events
    ///
    /// Events sent before the first subscription are dropped.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Output root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory the record's assets are written under
    pub fn app_dir(&self, record: &AppRecord) -> PathBuf {
        paths::app_dir(&self.root, record)
    }

    /// Run the export described by `request`
    pub async fn run(&self, record: &AppRecord, request: &ExportRequest) -> Result<ExportSummary> {
        tracing::info!(
            app = record.track_censored_name.as_deref().unwrap_or("?"),
            mode = request.mode.name(),
            "starting export"
        );
        match request.mode {
            ExportMode::IconOnly => self.export_icon(record, request.icon_size).await,
            ExportMode::ScreenshotsOnly => self.export_screenshots(record, request.device).await,
            ExportMode::InfoOnly => self.export_info(record).await,
            ExportMode::All => self.export_all(record).await,
        }
    }

    /// Save one icon into `icons/`
    ///
    /// An app that does not provide `size` gets an [`Event::AssetSkipped`]
    /// and no directory is created.
    pub async fn export_icon(&self, record: &AppRecord, size: IconSize) -> Result<ExportSummary> {
        let dir = paths::icons_dir(&self.app_dir(record));
        let failed = self
            .download_icons(&AssetLocator::new(record), &[size], &dir, self.quiet)
            .await?;
        self.summarize(ExportMode::IconOnly, dir, failed)
    }

    /// Save the screenshot sets selected by `filter` into `screenshots/<device>/`
    pub async fn export_screenshots(
        &self,
        record: &AppRecord,
        filter: DeviceFilter,
    ) -> Result<ExportSummary> {
        let app = self.app_dir(record);
        let failed = self
            .download_screenshots(&AssetLocator::new(record), filter, &app, self.quiet)
            .await?;
        self.summarize(ExportMode::ScreenshotsOnly, paths::screenshots_dir(&app), failed)
    }

    /// Write the three metadata artifacts into `info/`
    ///
    /// # Errors
    /// A partially written set is returned as [`Error::ExportIncomplete`].
    pub async fn export_info(&self, record: &AppRecord) -> Result<ExportSummary> {
        let dir = paths::info_dir(&self.app_dir(record));
        paths::ensure_dir(&dir).await?;

        let written = self.exporter.export(record, &dir).await?;
        self.emit(Event::MetadataWritten { paths: written });
        self.summarize(ExportMode::InfoOnly, dir, 0)
    }

    /// Every icon size, both screenshot sets, then the metadata, flat in the
    /// app directory
    ///
    /// Individual saves and failures are quiet; failures are logged and
    /// counted. The summary is taken once all three stages have run, whatever
    /// their failures.
    pub async fn export_all(&self, record: &AppRecord) -> Result<ExportSummary> {
        let app = self.app_dir(record);
        let locator = AssetLocator::new(record);
        paths::ensure_dir(&app).await?;

        self.stage(0);
        let mut failed = self
            .download_icons(&locator, &IconSize::ALL, &paths::icons_dir(&app), true)
            .await?;

        self.stage(1);
        failed += self
            .download_screenshots(&locator, DeviceFilter::All, &app, true)
            .await?;

        self.stage(2);
        match self.exporter.export(record, &app).await {
            Ok(written) => self.emit(Event::MetadataWritten { paths: written }),
            Err(Error::ExportIncomplete { written, failed: errors }) => {
                for (path, reason) in &errors {
                    tracing::error!(path = %path.display(), reason = %reason, "metadata file not written");
                }
                failed += errors.len();
                self.emit(Event::MetadataWritten { paths: written });
            }
            Err(e) => return Err(e),
        }

        self.summarize(ExportMode::All, app, failed)
    }

    /// Download the given icon sizes into `dir`; returns the failure count
    async fn download_icons(
        &self,
        locator: &AssetLocator<'_>,
        sizes: &[IconSize],
        dir: &Path,
        quiet: bool,
    ) -> Result<usize> {
        let targets: Vec<DownloadTarget> = sizes
            .iter()
            .filter_map(|size| {
                let target = locator.icon_target(*size, dir);
                if target.is_none() {
                    tracing::debug!(size = size.label(), "icon not provided");
                    self.emit(Event::AssetSkipped {
                        asset: format!("icon {}", size.label()),
                    });
                }
                target
            })
            .collect();

        if targets.is_empty() {
            return Ok(0);
        }
        paths::ensure_dir(dir).await?;
        Ok(self.download_each(&targets, quiet).await)
    }

    /// Download the screenshot sets selected by `filter`; returns the failure count
    async fn download_screenshots(
        &self,
        locator: &AssetLocator<'_>,
        filter: DeviceFilter,
        app: &Path,
        quiet: bool,
    ) -> Result<usize> {
        let sets = locator.resolve_screenshots(filter);
        if sets.is_empty() {
            self.emit(Event::AssetSkipped {
                asset: "screenshots".to_string(),
            });
            return Ok(0);
        }

        let mut failed = 0;
        for device in filter.classes() {
            let count = sets.get(*device).len();
            if count == 0 {
                continue;
            }
            let dir = paths::device_dir(app, *device);
            paths::ensure_dir(&dir).await?;

            self.emit(Event::ScreenshotSetStarted {
                device: *device,
                count,
            });
            failed += self
                .download_each(&locator.screenshot_targets(*device, &dir), quiet)
                .await;
            self.emit(Event::ScreenshotSetFinished { device: *device });
        }
        Ok(failed)
    }

    /// Save targets in order; a failure is reported and the rest still run
    async fn download_each(&self, targets: &[DownloadTarget], quiet: bool) -> usize {
        let mut failed = 0;
        for target in targets {
            if let Err(e) = self.fetcher.save_target(target, quiet).await {
                failed += 1;
                self.report_failure(&target.url, &e, quiet);
            }
        }
        failed
    }

    /// Quiet failures are logged instead of emitted
    fn report_failure(&self, url: &str, error: &Error, quiet: bool) {
        let reason = match error {
            Error::DownloadFailed { reason, .. } => reason.clone(),
            other => other.to_string(),
        };
        if quiet {
            tracing::warn!(url = %url, reason = %reason, "asset download failed");
        } else {
            tracing::debug!(url = %url, reason = %reason, "asset download failed");
            self.emit(Event::DownloadFailed {
                url: url.to_string(),
                error: reason,
            });
        }
    }

    fn stage(&self, index: usize) {
        self.emit(Event::StageStarted {
            index: index + 1,
            total: ALL_STAGES.len(),
            name: ALL_STAGES[index].to_string(),
        });
    }

    /// Tally `directory` as it is on disk now
    fn summarize(
        &self,
        mode: ExportMode,
        directory: PathBuf,
        failed_assets: usize,
    ) -> Result<ExportSummary> {
        let (file_count, total_bytes) = tally_directory(&directory)?;
        let summary = ExportSummary {
            directory,
            file_count,
            total_bytes,
            failed_assets,
        };
        tracing::info!(
            mode = mode.name(),
            files = summary.file_count,
            total_mb = summary.total_mb(),
            failed = summary.failed_assets,
            "export finished"
        );
        self.emit(Event::Completed {
            mode,
            summary: summary.clone(),
        });
        Ok(summary)
    }

    fn emit(&self, event: Event) {
        // no subscribers is fine
        self.event_tx.send(event).ok();
    }
}
