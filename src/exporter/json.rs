//! Structured record (`app_info.json`).

use super::fields::{
    BasicInfo, Categories, ExportFields, Links, Pricing, Ratings, ReleaseInfo, Screenshots,
    VersionInfo,
};
use crate::error::Result;
use serde::Serialize;

/// Top-level document; section order is fixed by field order
#[derive(Debug, Serialize)]
pub struct AppInfoDocument<'a> {
    /// Identity
    pub basic: &'a BasicInfo,
    /// Version
    pub version: &'a VersionInfo,
    /// Pricing
    pub pricing: &'a Pricing,
    /// Ratings
    pub ratings: &'a Ratings,
    /// Categories
    pub categories: &'a Categories,
    /// Release
    pub release: &'a ReleaseInfo,
    /// Store description
    pub description: &'a Option<String>,
    /// Release notes
    pub release_notes: &'a Option<String>,
    /// Links
    pub urls: &'a Links,
    /// Screenshots
    pub screenshots: &'a Screenshots,
    /// RFC 3339 export time
    pub exported_at: &'a str,
}

impl<'a> AppInfoDocument<'a> {
    /// Borrow the sections of `fields`
    pub fn new(fields: &'a ExportFields, exported_at: &'a str) -> Self {
        Self {
            basic: &fields.basic,
            version: &fields.version,
            pricing: &fields.pricing,
            ratings: &fields.ratings,
            categories: &fields.categories,
            release: &fields.release,
            description: &fields.description,
            release_notes: &fields.release_notes,
            urls: &fields.links,
            screenshots: &fields.screenshots,
            exported_at,
        }
    }
}

/// Render the structured record as pretty-printed JSON
pub fn render(fields: &ExportFields, exported_at: &str) -> Result<String> {
    Ok(serde_json::to_string_pretty(&AppInfoDocument::new(
        fields,
        exported_at,
    ))?)
}
