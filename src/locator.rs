//! Asset URL resolution
//!
//! Turns an [`AppRecord`] into concrete download URLs. Missing fields are a
//! normal outcome here: lookups return `None` or empty lists, never errors.

use crate::types::{AppRecord, DeviceClass, DeviceFilter, DownloadTarget, IconSize};
use std::path::Path;

/// Screenshot URLs partitioned by device class, in store order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScreenshotSets {
    /// iPhone screenshots
    pub iphone: Vec<String>,
    /// iPad screenshots
    pub ipad: Vec<String>,
}

impl ScreenshotSets {
    /// URLs for one device class
    pub fn get(&self, device: DeviceClass) -> &[String] {
        match device {
            DeviceClass::IPhone => &self.iphone,
            DeviceClass::IPad => &self.ipad,
        }
    }

    /// True when no class has any screenshot
    pub fn is_empty(&self) -> bool {
        self.iphone.is_empty() && self.ipad.is_empty()
    }
}

/// Resolves asset URLs for one record
#[derive(Clone, Copy, Debug)]
pub struct AssetLocator<'a> {
    record: &'a AppRecord,
}

impl<'a> AssetLocator<'a> {
    /// Create a locator over a record
    pub fn new(record: &'a AppRecord) -> Self {
        Self { record }
    }

    /// URL of the icon at `size`, or `None` if the app does not provide it
    ///
    /// The largest size reuses the 512px field with `512x512` rewritten to
    /// `1024x1024`; the rest of the URL is left untouched.
    pub fn resolve_icon(&self, size: IconSize) -> Option<String> {
        let url = self.record.artwork_url(size.source_field())?;
        Some(match size.rewrite() {
            Some((from, to)) => url.replace(from, to),
            None => url.to_string(),
        })
    }

    /// Screenshot URLs selected by `filter`, original order preserved
    pub fn resolve_screenshots(&self, filter: DeviceFilter) -> ScreenshotSets {
        let mut sets = ScreenshotSets::default();
        for device in filter.classes() {
            let urls = self.record.screenshots(*device).to_vec();
            match device {
                DeviceClass::IPhone => sets.iphone = urls,
                DeviceClass::IPad => sets.ipad = urls,
            }
        }
        sets
    }

    /// Download target for an icon, if the app provides that size
    pub fn icon_target(&self, size: IconSize, directory: &Path) -> Option<DownloadTarget> {
        self.resolve_icon(size).map(|url| DownloadTarget {
            url,
            directory: directory.to_path_buf(),
            base_name: icon_base_name(size),
        })
    }

    /// Download targets for one screenshot set, named with a 1-based index
    pub fn screenshot_targets(&self, device: DeviceClass, directory: &Path) -> Vec<DownloadTarget> {
        self.record
            .screenshots(device)
            .iter()
            .enumerate()
            .map(|(i, url)| DownloadTarget {
                url: url.clone(),
                directory: directory.to_path_buf(),
                base_name: screenshot_base_name(device, i + 1),
            })
            .collect()
    }
}

/// `icon-<label>`
pub fn icon_base_name(size: IconSize) -> String {
    format!("icon-{}", size.label())
}

/// `screenshot-<device>-<n>`
pub fn screenshot_base_name(device: DeviceClass, index: usize) -> String {
    format!("screenshot-{}-{}", device.dir_name(), index)
}
