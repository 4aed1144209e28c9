//! # appcask
//!
//! Export app store assets to local disk: icons, screenshots and the app's
//! metadata as plain text, JSON and markdown.
//!
//! ## Pipeline
//!
//! - [`catalog`] searches the store and decodes [`AppRecord`]s
//! - [`locator`] turns a record into concrete asset URLs
//! - [`fetcher`] downloads images, sniffs their format and saves them under
//!   collision-safe names
//! - [`exporter`] renders the three metadata artifacts
//! - [`orchestrator`] runs one export mode and tallies the result from disk
//!
//! Assets are fetched one at a time. Progress is reported through
//! [`Event`]s; the library itself prints nothing except prompts.
//!
//! ## Quick Start
//!
//! ```no_run
//! use appcask::{CatalogClient, Config, Country, ExportMode, ExportOrchestrator, ExportRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let catalog = CatalogClient::new(&config.http)?;
//!     let results = catalog.search("notes", &Country::lookup_or_default("us")).await?;
//!
//!     let orchestrator = ExportOrchestrator::from_config(&config)?;
//!     let mut events = orchestrator.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     let summary = orchestrator
//!         .run(&results.results[0], &ExportRequest::new(ExportMode::All))
//!         .await?;
//!     println!("{} files, {} MB", summary.file_count, summary.total_mb());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Catalog search
pub mod catalog;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Metadata artifacts
pub mod exporter;
/// Image download and persistence
pub mod fetcher;
/// Asset URL resolution
pub mod locator;
/// Export orchestration
pub mod orchestrator;
/// Output directory layout
pub mod paths;
/// Interactive prompts
pub mod prompt;
/// Core types and events
pub mod types;
/// Utility functions
pub mod utils;

// Re-export commonly used types
pub use catalog::{CatalogClient, SearchResults};
pub use config::Config;
pub use error::{Error, Outcome, Result};
pub use exporter::{ExportBundle, MetadataExporter};
pub use fetcher::{AssetFetcher, HttpAssetFetcher, ImageFetcher};
pub use locator::AssetLocator;
pub use orchestrator::{ExportOrchestrator, ExportRequest};
pub use types::{
    AppRecord, Country, DeviceClass, DeviceFilter, DownloadTarget, Event, ExportMode,
    ExportSummary, IconSize, SavedFile,
};

/// Wait until the user interrupts the process
///
/// - **Unix:** listens for SIGINT and SIGTERM, falling back to
///   `tokio::signal::ctrl_c()` if the handlers cannot be registered.
/// - **Windows/other:** listens for Ctrl+C.
///
/// Race this against a run with `tokio::select!` and map the signal to
/// [`Error::Interrupted`].
#[cfg(unix)]
pub async fn wait_for_interrupt() {
    use tokio::signal::unix::{SignalKind, signal};

    // Registration can fail in restricted environments (containers, tests)
    match (signal(SignalKind::interrupt()), signal(SignalKind::terminate())) {
        (Ok(mut sigint), Ok(mut sigterm)) => {
            tokio::select! {
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
            }
        }
        (Ok(mut sigint), Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            sigint.recv().await;
            tracing::info!("Received SIGINT signal (Ctrl+C)");
        }
        (Err(e), _) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, using ctrl_c fallback");
            tokio::signal::ctrl_c().await.ok();
        }
    }
}

/// Wait until the user interrupts the process (Ctrl+C)
#[cfg(not(unix))]
pub async fn wait_for_interrupt() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
