//! Field groups shared by every metadata template.
//!
//! Each group is built once from the record, with derived values (megabytes,
//! rounded rating) computed here and nowhere else. The structured artifact
//! serializes the groups directly; the text and markdown templates render them
//! through the `*_display` helpers, which substitute placeholders for absent
//! values.

use crate::types::AppRecord;
use crate::utils::{bytes_to_mb, round_to};
use serde::Serialize;

/// Placeholder for an absent scalar value
pub const NOT_AVAILABLE: &str = "N/A";
/// Placeholder for absent release notes
pub const NO_RELEASE_NOTES: &str = "No release notes provided.";

/// Identity of the app and its developer
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BasicInfo {
    /// Display name
    pub name: Option<String>,
    /// App id
    pub app_id: Option<u64>,
    /// Bundle id
    pub bundle_id: Option<String>,
    /// Developer name
    pub developer: Option<String>,
    /// Developer id
    pub developer_id: Option<u64>,
}

/// Version and size
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VersionInfo {
    /// Version string
    pub current_version: Option<String>,
    /// Size in bytes
    pub file_size_bytes: Option<u64>,
    /// Size in megabytes, 2 decimals
    pub file_size_mb: Option<f64>,
    /// Minimum OS version
    pub minimum_os_version: Option<String>,
    /// Supported devices
    pub supported_devices: Vec<String>,
}

/// Price
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Pricing {
    /// Raw price
    pub price: Option<f64>,
    /// Localized price
    pub formatted_price: Option<String>,
    /// Currency code
    pub currency: Option<String>,
}

/// User ratings
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Ratings {
    /// Average rating, 1 decimal
    pub average_rating: Option<f64>,
    /// Total ratings
    pub rating_count: Option<u64>,
    /// Ratings for the current version
    pub rating_count_current_version: Option<u64>,
}

/// Categories
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Categories {
    /// Primary category
    pub primary_genre: Option<String>,
    /// All categories
    pub all_genres: Vec<String>,
}

/// Release dates and content rating
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReleaseInfo {
    /// First release
    pub release_date: Option<String>,
    /// Current version release
    pub current_version_release_date: Option<String>,
    /// Content rating
    pub content_rating: Option<String>,
}

/// Store and developer links
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Links {
    /// Store page
    pub app_store: Option<String>,
    /// Developer website
    pub developer_website: Option<String>,
}

/// Screenshot URLs
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Screenshots {
    /// iPhone screenshots
    pub iphone: Vec<String>,
    /// iPad screenshots
    pub ipad: Vec<String>,
}

/// All field groups of one record
#[derive(Clone, Debug, PartialEq)]
pub struct ExportFields {
    /// Identity
    pub basic: BasicInfo,
    /// Version
    pub version: VersionInfo,
    /// Pricing
    pub pricing: Pricing,
    /// Ratings
    pub ratings: Ratings,
    /// Categories
    pub categories: Categories,
    /// Release
    pub release: ReleaseInfo,
    /// Store description
    pub description: Option<String>,
    /// Release notes
    pub release_notes: Option<String>,
    /// Links
    pub links: Links,
    /// Screenshots
    pub screenshots: Screenshots,
}

impl From<&AppRecord> for ExportFields {
    fn from(r: &AppRecord) -> Self {
        Self {
            basic: BasicInfo {
                name: r.track_censored_name.clone(),
                app_id: r.track_id,
                bundle_id: r.bundle_id.clone(),
                developer: r.artist_name.clone(),
                developer_id: r.artist_id,
            },
            version: VersionInfo {
                current_version: r.version.clone(),
                file_size_bytes: r.file_size_bytes,
                file_size_mb: r.file_size_bytes.map(bytes_to_mb),
                minimum_os_version: r.minimum_os_version.clone(),
                supported_devices: r.supported_devices.clone().unwrap_or_default(),
            },
            pricing: Pricing {
                price: r.price,
                formatted_price: r.formatted_price.clone(),
                currency: r.currency.clone(),
            },
            ratings: Ratings {
                average_rating: r.average_user_rating.map(|v| round_to(v, 1)),
                rating_count: r.user_rating_count,
                rating_count_current_version: r.user_rating_count_for_current_version,
            },
            categories: Categories {
                primary_genre: r.primary_genre_name.clone(),
                all_genres: r.genres.clone().unwrap_or_default(),
            },
            release: ReleaseInfo {
                release_date: r.release_date.clone(),
                current_version_release_date: r.current_version_release_date.clone(),
                content_rating: r.content_advisory_rating.clone(),
            },
            description: r.description.clone(),
            release_notes: r.release_notes.clone(),
            links: Links {
                app_store: r.track_view_url.clone(),
                developer_website: r.seller_url.clone(),
            },
            screenshots: Screenshots {
                iphone: r.screenshot_urls.clone().unwrap_or_default(),
                ipad: r.ipad_screenshot_urls.clone().unwrap_or_default(),
            },
        }
    }
}

/// Text of an optional string field, or the placeholder
pub fn or_na(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(NOT_AVAILABLE)
}

/// Text of an optional id, or the placeholder
pub fn id_or_na(value: Option<u64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
}

/// Comma-joined list, or the placeholder when empty
pub fn list_or_na(values: &[String]) -> String {
    if values.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        values.join(", ")
    }
}

/// Decimal number that always shows a fractional part (`10.0`, `4.5`, `117.74`)
pub fn decimal(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

impl VersionInfo {
    /// "10.0 MB", or the placeholder
    pub fn file_size_display(&self) -> String {
        self.file_size_mb
            .map_or_else(|| NOT_AVAILABLE.to_string(), |mb| format!("{} MB", decimal(mb)))
    }

    /// "iOS 14.0", or the placeholder
    pub fn minimum_os_display(&self) -> String {
        self.minimum_os_version
            .as_deref()
            .map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("iOS {v}"))
    }
}

impl Pricing {
    /// Localized price, else the raw price, else the placeholder
    pub fn display(&self) -> String {
        match (&self.formatted_price, self.price) {
            (Some(formatted), _) => formatted.clone(),
            (None, Some(price)) => decimal(price),
            (None, None) => NOT_AVAILABLE.to_string(),
        }
    }
}

impl Ratings {
    /// Rounded average, or the placeholder
    pub fn average_display(&self) -> String {
        self.average_rating
            .map_or_else(|| NOT_AVAILABLE.to_string(), decimal)
    }

    /// Rating count, 0 when absent
    pub fn count_display(&self) -> u64 {
        self.rating_count.unwrap_or(0)
    }
}

impl ExportFields {
    /// Release notes, or the "none provided" placeholder
    pub fn release_notes_display(&self) -> &str {
        self.release_notes.as_deref().unwrap_or(NO_RELEASE_NOTES)
    }

    /// Description, or the placeholder
    pub fn description_display(&self) -> &str {
        or_na(&self.description)
    }
}
