//! Output directory layout
//!
//! ```text
//! <root>/<sanitized app name>/
//!     icons/icon-<size>.<ext>
//!     screenshots/iPhone/screenshot-iPhone-<n>.<ext>
//!     screenshots/iPad/screenshot-iPad-<n>.<ext>
//!     info/                      (info-only exports)
//!     app_info.txt               (all-assets exports)
//!     app_info.json
//!     README.md
//! ```

use crate::config::OutputConfig;
use crate::error::Result;
use crate::types::{AppRecord, DeviceClass};
use crate::utils::sanitize_filename;
use std::path::{Path, PathBuf};

/// Subdirectory for icons
pub const ICONS_DIR: &str = "icons";
/// Subdirectory for screenshot sets
pub const SCREENSHOTS_DIR: &str = "screenshots";
/// Subdirectory for info-only metadata exports
pub const INFO_DIR: &str = "info";

/// Directory name used when a record has no usable display name
const UNNAMED_APP: &str = "Unnamed App";

/// Resolve the export root (`<base>/<folder_name>`)
///
/// The base is the configured root, or the Desktop when it exists, or the
/// current working directory.
pub fn resolve_root(config: &OutputConfig) -> Result<PathBuf> {
    let base = match &config.root {
        Some(root) => root.clone(),
        None => match dirs::desktop_dir().filter(|d| d.is_dir()) {
            Some(desktop) => desktop,
            None => std::env::current_dir()?,
        },
    };
    Ok(base.join(&config.folder_name))
}

/// Directory for one app under the export root
pub fn app_dir(root: &Path, record: &AppRecord) -> PathBuf {
    let name = record
        .track_censored_name
        .as_deref()
        .map(sanitize_filename)
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| UNNAMED_APP.to_string());
    root.join(name)
}

/// `<app>/icons`
pub fn icons_dir(app_dir: &Path) -> PathBuf {
    app_dir.join(ICONS_DIR)
}

/// `<app>/screenshots`
pub fn screenshots_dir(app_dir: &Path) -> PathBuf {
    app_dir.join(SCREENSHOTS_DIR)
}

/// `<app>/screenshots/<device>`
pub fn device_dir(app_dir: &Path, device: DeviceClass) -> PathBuf {
    screenshots_dir(app_dir).join(device.dir_name())
}

/// `<app>/info`
pub fn info_dir(app_dir: &Path) -> PathBuf {
    app_dir.join(INFO_DIR)
}

/// Create a directory and its parents; succeeds if it already exists
pub async fn ensure_dir(dir: &Path) -> Result<()> {
    tokio::fs::create_dir_all(dir).await?;
    Ok(())
}

/// Open a directory in the platform file browser
///
/// Only macOS has an `open` command that does this; elsewhere this is a no-op
/// returning `false`.
pub fn open_folder(dir: &Path) -> Result<bool> {
    if cfg!(target_os = "macos") {
        let status = std::process::Command::new("open").arg(dir).status()?;
        Ok(status.success())
    } else {
        tracing::debug!(path = %dir.display(), "open folder is only supported on macOS");
        Ok(false)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn named(name: &str) -> AppRecord {
        AppRecord {
            track_censored_name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn configured_root_is_joined_with_folder_name() {
        let config = OutputConfig {
            root: Some(PathBuf::from("/data")),
            ..Default::default()
        };
        assert_eq!(
            resolve_root(&config).unwrap(),
            PathBuf::from("/data/AppCask Downloads")
        );
    }

    #[test]
    fn unconfigured_root_ends_with_folder_name() {
        let root = resolve_root(&OutputConfig::default()).unwrap();
        assert!(root.ends_with("AppCask Downloads"));
    }

    #[test]
    fn app_dir_uses_sanitized_name() {
        let root = Path::new("/exports");
        assert_eq!(
            app_dir(root, &named("Test/App:Name")),
            PathBuf::from("/exports/Test_App_Name")
        );
        assert_eq!(
            app_dir(root, &named("   ")),
            PathBuf::from("/exports/Unnamed App")
        );
        assert_eq!(
            app_dir(root, &AppRecord::default()),
            PathBuf::from("/exports/Unnamed App")
        );
    }

    #[test]
    fn layout_subdirectories() {
        let app = Path::new("/exports/App");
        assert_eq!(icons_dir(app), PathBuf::from("/exports/App/icons"));
        assert_eq!(
            device_dir(app, DeviceClass::IPhone),
            PathBuf::from("/exports/App/screenshots/iPhone")
        );
        assert_eq!(
            device_dir(app, DeviceClass::IPad),
            PathBuf::from("/exports/App/screenshots/iPad")
        );
        assert_eq!(info_dir(app), PathBuf::from("/exports/App/info"));
    }

    #[tokio::test]
    async fn ensure_dir_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("a").join("b");
        ensure_dir(&dir).await.unwrap();
        ensure_dir(&dir).await.unwrap();
        assert!(dir.is_dir());
    }
}
