//! Metadata export
//!
//! One [`AppRecord`] becomes three artifacts with fixed file names:
//! a plain-text report, a structured JSON record and a markdown document.
//! All three are rendered from the same [`ExportFields`], so derived values
//! (size in MB, rounded rating) always agree.
//!
//! Metadata files are overwritten on every export; they are a reproducible
//! snapshot of the record, unlike downloaded assets.

pub mod fields;
pub mod json;
pub mod markdown;
pub mod text;

pub use fields::ExportFields;

use crate::error::{Error, Result};
use crate::types::AppRecord;
use chrono::{DateTime, Local, SecondsFormat};
use std::path::{Path, PathBuf};

/// Plain-text report file name
pub const TEXT_FILE: &str = "app_info.txt";
/// Structured record file name
pub const JSON_FILE: &str = "app_info.json";
/// Formatted document file name
pub const MARKDOWN_FILE: &str = "README.md";

/// Export time in the two forms the artifacts use
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Timestamps {
    /// Human-readable (`2024-06-01 12:30:00`), for text and markdown
    pub display: String,
    /// RFC 3339, for the structured record
    pub structured: String,
}

impl Timestamps {
    /// Both forms of one instant
    pub fn at(time: DateTime<Local>) -> Self {
        Self {
            display: time.format("%Y-%m-%d %H:%M:%S").to_string(),
            structured: time.to_rfc3339_opts(SecondsFormat::Secs, false),
        }
    }

    /// The current local time
    pub fn now() -> Self {
        Self::at(Local::now())
    }
}

/// The three rendered artifacts of one record
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportBundle {
    /// `app_info.txt`
    pub text: String,
    /// `app_info.json`
    pub json: String,
    /// `README.md`
    pub markdown: String,
}

impl ExportBundle {
    /// Render all artifacts of `record` with the given timestamps
    pub fn generate(record: &AppRecord, timestamps: &Timestamps) -> Result<Self> {
        let fields = ExportFields::from(record);
        Ok(Self {
            text: text::render(&fields, &timestamps.display),
            json: json::render(&fields, &timestamps.structured)?,
            markdown: markdown::render(&fields, &timestamps.display),
        })
    }

    /// File names paired with contents, in write order
    pub fn files(&self) -> [(&'static str, &str); 3] {
        [
            (TEXT_FILE, self.text.as_str()),
            (JSON_FILE, self.json.as_str()),
            (MARKDOWN_FILE, self.markdown.as_str()),
        ]
    }

    /// Write every artifact into `dir`, overwriting existing files
    ///
    /// Every artifact is attempted. If any fails, the result is
    /// [`Error::ExportIncomplete`] listing what was and was not written.
    pub async fn write_to(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        let mut failed = Vec::new();

        for (name, content) in self.files() {
            let path = dir.join(name);
            match tokio::fs::write(&path, content).await {
                Ok(()) => written.push(path),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to write metadata file");
                    failed.push((path, e.to_string()));
                }
            }
        }

        if failed.is_empty() {
            Ok(written)
        } else {
            Err(Error::ExportIncomplete { written, failed })
        }
    }
}

/// Writes the metadata artifacts of a record
#[derive(Clone, Copy, Debug, Default)]
pub struct MetadataExporter;

impl MetadataExporter {
    /// Render and write all three artifacts into `dir`
    pub async fn export(&self, record: &AppRecord, dir: &Path) -> Result<Vec<PathBuf>> {
        let bundle = ExportBundle::generate(record, &Timestamps::now())?;
        bundle.write_to(dir).await
    }
}
