//! Core types for appcask

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

/// One app as returned by the catalog search API
///
/// Field names follow the catalog's JSON schema. Every field is optional and
/// a value of an unexpected type decodes as absent, so one odd field never
/// rejects the whole record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppRecord {
    /// Numeric app identifier
    #[serde(default, deserialize_with = "lenient")]
    pub track_id: Option<u64>,
    /// Display name
    #[serde(default, deserialize_with = "lenient")]
    pub track_censored_name: Option<String>,
    /// Bundle identifier (e.g. "com.example.app")
    #[serde(default, deserialize_with = "lenient")]
    pub bundle_id: Option<String>,
    /// Developer name
    #[serde(default, deserialize_with = "lenient")]
    pub artist_name: Option<String>,
    /// Numeric developer identifier
    #[serde(default, deserialize_with = "lenient")]
    pub artist_id: Option<u64>,
    /// Current version string
    #[serde(default, deserialize_with = "lenient")]
    pub version: Option<String>,
    /// Download size in bytes (the catalog sends this as a string)
    #[serde(default, deserialize_with = "lenient_u64")]
    pub file_size_bytes: Option<u64>,
    /// Minimum OS version
    #[serde(default, deserialize_with = "lenient")]
    pub minimum_os_version: Option<String>,
    /// Supported device identifiers
    #[serde(default, deserialize_with = "lenient")]
    pub supported_devices: Option<Vec<String>>,
    /// Raw price
    #[serde(default, deserialize_with = "lenient")]
    pub price: Option<f64>,
    /// Localized price (e.g. "Free", "$4.99")
    #[serde(default, deserialize_with = "lenient")]
    pub formatted_price: Option<String>,
    /// Currency code
    #[serde(default, deserialize_with = "lenient")]
    pub currency: Option<String>,
    /// Average user rating, unrounded
    #[serde(default, deserialize_with = "lenient")]
    pub average_user_rating: Option<f64>,
    /// Number of user ratings
    #[serde(default, deserialize_with = "lenient")]
    pub user_rating_count: Option<u64>,
    /// Number of user ratings for the current version
    #[serde(default, deserialize_with = "lenient")]
    pub user_rating_count_for_current_version: Option<u64>,
    /// Primary category
    #[serde(default, deserialize_with = "lenient")]
    pub primary_genre_name: Option<String>,
    /// All categories
    #[serde(default, deserialize_with = "lenient")]
    pub genres: Option<Vec<String>>,
    /// First release date
    #[serde(default, deserialize_with = "lenient")]
    pub release_date: Option<String>,
    /// Release date of the current version
    #[serde(default, deserialize_with = "lenient")]
    pub current_version_release_date: Option<String>,
    /// Content rating (e.g. "4+")
    #[serde(default, deserialize_with = "lenient")]
    pub content_advisory_rating: Option<String>,
    /// Store description
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    /// Release notes for the current version
    #[serde(default, deserialize_with = "lenient")]
    pub release_notes: Option<String>,
    /// Developer website
    #[serde(default, deserialize_with = "lenient")]
    pub seller_url: Option<String>,
    /// Store page
    #[serde(default, deserialize_with = "lenient")]
    pub track_view_url: Option<String>,
    /// 60px icon
    #[serde(default, deserialize_with = "lenient")]
    pub artwork_url60: Option<String>,
    /// 100px icon
    #[serde(default, deserialize_with = "lenient")]
    pub artwork_url100: Option<String>,
    /// 512px icon, also the base for the 1024px rewrite
    #[serde(default, deserialize_with = "lenient")]
    pub artwork_url512: Option<String>,
    /// iPhone screenshots in store order
    #[serde(default, deserialize_with = "lenient")]
    pub screenshot_urls: Option<Vec<String>>,
    /// iPad screenshots in store order
    #[serde(default, deserialize_with = "lenient")]
    pub ipad_screenshot_urls: Option<Vec<String>>,
}

impl AppRecord {
    /// Icon URL stored in the given artwork field
    pub fn artwork_url(&self, field: ArtworkField) -> Option<&str> {
        match field {
            ArtworkField::Url60 => self.artwork_url60.as_deref(),
            ArtworkField::Url100 => self.artwork_url100.as_deref(),
            ArtworkField::Url512 => self.artwork_url512.as_deref(),
        }
    }

    /// Screenshot URLs for one device class, empty when the app has none
    pub fn screenshots(&self, device: DeviceClass) -> &[String] {
        let urls = match device {
            DeviceClass::IPhone => &self.screenshot_urls,
            DeviceClass::IPad => &self.ipad_screenshot_urls,
        };
        urls.as_deref().unwrap_or(&[])
    }
}

/// Decode a field, treating a value of the wrong type as absent
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Accept a u64 given either as a JSON number or as a numeric string
fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u64),
        Float(f64),
        Text(String),
    }

    Ok(
        match Option::<NumberOrString>::deserialize(deserializer)? {
            Some(NumberOrString::Number(n)) => Some(n),
            Some(NumberOrString::Float(f)) if f >= 0.0 => Some(f as u64),
            Some(NumberOrString::Float(_)) => None,
            Some(NumberOrString::Text(s)) => s.trim().parse().ok(),
            None => None,
        },
    )
}

/// Artwork field of an [`AppRecord`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArtworkField {
    /// `artworkUrl60`
    Url60,
    /// `artworkUrl100`
    Url100,
    /// `artworkUrl512`
    Url512,
}

/// Icon sizes offered for download
///
/// The catalog has no 1024px field: [`IconSize::Largest`] reads the 512px
/// field and rewrites its size segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IconSize {
    /// 60x60
    Small,
    /// 100x100
    Medium,
    /// 512x512
    Large,
    /// 1024x1024
    Largest,
}

impl IconSize {
    /// Every size, in menu order
    pub const ALL: [IconSize; 4] = [
        IconSize::Small,
        IconSize::Medium,
        IconSize::Large,
        IconSize::Largest,
    ];

    /// Selector used when the user just presses Enter
    pub const DEFAULT_SELECTOR: &'static str = "2";

    /// Menu selector
    pub fn selector(&self) -> &'static str {
        match self {
            IconSize::Small => "0",
            IconSize::Medium => "1",
            IconSize::Large => "2",
            IconSize::Largest => "3",
        }
    }

    /// Human label, also used in the file name
    pub fn label(&self) -> &'static str {
        match self {
            IconSize::Small => "60x60",
            IconSize::Medium => "100x100",
            IconSize::Large => "512x512",
            IconSize::Largest => "1024x1024",
        }
    }

    /// Record field holding the source URL
    pub fn source_field(&self) -> ArtworkField {
        match self {
            IconSize::Small => ArtworkField::Url60,
            IconSize::Medium => ArtworkField::Url100,
            IconSize::Large | IconSize::Largest => ArtworkField::Url512,
        }
    }

    /// URL substring rewrite applied before fetching, if any
    pub fn rewrite(&self) -> Option<(&'static str, &'static str)> {
        match self {
            IconSize::Largest => Some(("512x512", "1024x1024")),
            _ => None,
        }
    }

    /// Look up a size by its menu selector
    pub fn from_selector(selector: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.selector() == selector)
    }
}

/// Device class a screenshot set belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    /// Phone screenshots (`screenshotUrls`)
    IPhone,
    /// Tablet screenshots (`ipadScreenshotUrls`)
    IPad,
}

impl DeviceClass {
    /// Name used for directories and file names
    pub fn dir_name(&self) -> &'static str {
        match self {
            DeviceClass::IPhone => "iPhone",
            DeviceClass::IPad => "iPad",
        }
    }
}

/// Which screenshot sets to export
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceFilter {
    /// iPhone only
    IPhone,
    /// iPad only
    IPad,
    /// Both sets
    #[default]
    All,
}

impl DeviceFilter {
    /// Device classes selected by this filter, phone first
    pub fn classes(&self) -> &'static [DeviceClass] {
        match self {
            DeviceFilter::IPhone => &[DeviceClass::IPhone],
            DeviceFilter::IPad => &[DeviceClass::IPad],
            DeviceFilter::All => &[DeviceClass::IPhone, DeviceClass::IPad],
        }
    }

    /// Parse user input; empty and unrecognised input select both sets
    pub fn parse(input: &str) -> Self {
        match input.trim().to_lowercase().as_str() {
            "iphone" => DeviceFilter::IPhone,
            "ipad" => DeviceFilter::IPad,
            _ => DeviceFilter::All,
        }
    }
}

/// Content mode chosen for an export
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExportMode {
    /// One icon at a chosen size
    IconOnly,
    /// Screenshot sets
    ScreenshotsOnly,
    /// The three metadata artifacts
    InfoOnly,
    /// Every icon size, both screenshot sets and the metadata
    All,
}

impl ExportMode {
    /// Every mode, in menu order
    pub const ALL: [ExportMode; 4] = [
        ExportMode::IconOnly,
        ExportMode::ScreenshotsOnly,
        ExportMode::InfoOnly,
        ExportMode::All,
    ];

    /// Menu selector
    pub fn selector(&self) -> &'static str {
        match self {
            ExportMode::IconOnly => "1",
            ExportMode::ScreenshotsOnly => "2",
            ExportMode::InfoOnly => "3",
            ExportMode::All => "4",
        }
    }

    /// Menu label
    pub fn name(&self) -> &'static str {
        match self {
            ExportMode::IconOnly => "Icon Only",
            ExportMode::ScreenshotsOnly => "Screenshots Only",
            ExportMode::InfoOnly => "Description Only",
            ExportMode::All => "All Assets",
        }
    }

    /// Look up a mode by its menu selector
    pub fn from_selector(selector: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.selector() == selector)
    }
}

/// App Store region
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Country {
    /// Two-letter storefront code
    pub code: &'static str,
    /// Display name
    pub name: &'static str,
}

impl Country {
    /// Supported storefronts, in menu order
    pub const ALL: [Country; 9] = [
        Country::new("us", "United States"),
        Country::new("cn", "China"),
        Country::new("jp", "Japan"),
        Country::new("kr", "South Korea"),
        Country::new("hk", "Hong Kong"),
        Country::new("tw", "Taiwan"),
        Country::new("gb", "United Kingdom"),
        Country::new("de", "Germany"),
        Country::new("fr", "France"),
    ];

    /// Storefront used when none is given
    pub const DEFAULT_CODE: &'static str = "us";

    const fn new(code: &'static str, name: &'static str) -> Self {
        Self { code, name }
    }

    /// Case-insensitive lookup by code
    pub fn lookup(code: &str) -> Option<Country> {
        let code = code.trim().to_lowercase();
        Self::ALL.into_iter().find(|c| c.code == code)
    }

    /// Lookup that falls back to the default storefront
    pub fn lookup_or_default(code: &str) -> Country {
        Self::lookup(code).unwrap_or(Self::ALL[0])
    }
}

/// A resolved asset download: where to fetch from and where to save
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadTarget {
    /// Asset URL
    pub url: String,
    /// Destination directory
    pub directory: PathBuf,
    /// File name without extension; the extension comes from the payload
    pub base_name: String,
}

/// A file written by the fetcher
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SavedFile {
    /// Final path, after collision handling
    pub path: PathBuf,
    /// Bytes written
    pub byte_size: u64,
}

impl SavedFile {
    /// Size in kilobytes, rounded to 2 decimals
    pub fn size_kb(&self) -> f64 {
        crate::utils::round_to(self.byte_size as f64 / 1024.0, 2)
    }
}

/// Ground-truth tally of an export's target directory
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExportSummary {
    /// Directory that was tallied
    pub directory: PathBuf,
    /// Number of regular files under it
    pub file_count: usize,
    /// Sum of their sizes
    pub total_bytes: u64,
    /// Assets that failed to download during this export
    pub failed_assets: usize,
}

impl ExportSummary {
    /// Total size in megabytes, rounded to 2 decimals
    pub fn total_mb(&self) -> f64 {
        crate::utils::bytes_to_mb(self.total_bytes)
    }
}

/// Progress events emitted during an export
///
/// Consumers subscribe through the orchestrator; nothing is printed by the
/// library itself.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A stage of an all-assets export started
    StageStarted {
        /// 1-based stage number
        index: usize,
        /// Number of stages
        total: usize,
        /// Stage description
        name: String,
    },

    /// Downloading a screenshot set started
    ScreenshotSetStarted {
        /// Device class
        device: DeviceClass,
        /// Number of screenshots in the set
        count: usize,
    },

    /// A screenshot set finished (individual failures are reported separately)
    ScreenshotSetFinished {
        /// Device class
        device: DeviceClass,
    },

    /// An asset was saved
    AssetSaved {
        /// Saved file
        file: SavedFile,
    },

    /// The app does not provide this asset
    AssetSkipped {
        /// What was skipped (e.g. "icon 60x60")
        asset: String,
    },

    /// An asset failed to download; the export continues
    DownloadFailed {
        /// Asset URL
        url: String,
        /// Failure description
        error: String,
    },

    /// The metadata artifacts were written
    MetadataWritten {
        /// Paths of the written artifacts
        paths: Vec<PathBuf>,
    },

    /// The export finished
    Completed {
        /// Mode that ran
        mode: ExportMode,
        /// On-disk tally
        summary: ExportSummary,
    },
}
