//! Image download and persistence
//!
//! Each asset is fetched whole into memory, its real format is sniffed from
//! the payload, and the bytes are written under a collision-safe name.

mod http;
mod sniff;

pub use http::HttpAssetFetcher;
pub use sniff::{ImageFormat, detect_image_extension};

use crate::error::{Error, Result};
use crate::types::{DownloadTarget, Event, SavedFile};
use crate::utils::collision_candidates;
use async_trait::async_trait;
use std::io;
use std::path::Path;
use std::sync::Arc;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::broadcast;

/// Source of asset bytes
///
/// Implementations report every failure as [`Error::DownloadFailed`].
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    /// Fetch the full body at `url`
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Downloads images and writes them to disk
#[derive(Clone)]
pub struct ImageFetcher {
    source: Arc<dyn AssetFetcher>,
    event_tx: broadcast::Sender<Event>,
}

impl ImageFetcher {
    /// Create a fetcher over a byte source, reporting to `event_tx`
    pub fn new(source: Arc<dyn AssetFetcher>, event_tx: broadcast::Sender<Event>) -> Self {
        Self { source, event_tx }
    }

    /// Fetch `url` and save it as `<directory>/<base_name>.<ext>`
    ///
    /// The extension comes from the payload's signature. If the file name is
    /// taken, `_1`, `_2`, ... is appended to the stem. Unless `quiet`, an
    /// [`Event::AssetSaved`] is emitted.
    ///
    /// # Errors
    /// Any transport or I/O failure is returned as [`Error::DownloadFailed`].
    pub async fn fetch_and_save(
        &self,
        url: &str,
        directory: &Path,
        base_name: &str,
        quiet: bool,
    ) -> Result<SavedFile> {
        let content = self.source.fetch(url).await.map_err(|e| match e {
            Error::DownloadFailed { .. } => e,
            other => Error::download_failed(url, other),
        })?;

        let ext = detect_image_extension(&content);
        let saved = write_unique(directory, base_name, ext, &content)
            .await
            .map_err(|e| Error::download_failed(url, e))?;

        tracing::debug!(
            url = %url,
            path = %saved.path.display(),
            bytes = saved.byte_size,
            "asset saved"
        );
        if !quiet {
            self.event_tx
                .send(Event::AssetSaved {
                    file: saved.clone(),
                })
                .ok();
        }
        Ok(saved)
    }

    /// [`fetch_and_save`](Self::fetch_and_save) for a resolved target
    pub async fn save_target(&self, target: &DownloadTarget, quiet: bool) -> Result<SavedFile> {
        self.fetch_and_save(&target.url, &target.directory, &target.base_name, quiet)
            .await
    }
}

/// Write `content` to the first free `<base_name>[_N].<ext>` in `directory`
///
/// Each name is opened with `create_new`, so a file that appears between
/// attempts is skipped rather than replaced.
async fn write_unique(
    directory: &Path,
    base_name: &str,
    ext: &str,
    content: &[u8],
) -> Result<SavedFile> {
    let requested = directory.join(format!("{base_name}.{ext}"));
    for path in collision_candidates(&requested)? {
        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e.into()),
        };
        file.write_all(content).await?;
        file.flush().await?;
        return Ok(SavedFile {
            path,
            byte_size: content.len() as u64,
        });
    }
    Err(Error::Other(format!(
        "no free file name for {}",
        requested.display()
    )))
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    /// In-memory asset source keyed by URL; unknown URLs fail
    pub(crate) struct StaticFetcher(pub HashMap<String, Vec<u8>>);

    impl StaticFetcher {
        pub(crate) fn with(entries: &[(&str, &[u8])]) -> Arc<Self> {
            Arc::new(Self(
                entries
                    .iter()
                    .map(|(url, body)| (url.to_string(), body.to_vec()))
                    .collect(),
            ))
        }
    }

    #[async_trait]
    impl AssetFetcher for StaticFetcher {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
            self.0
                .get(url)
                .cloned()
                .ok_or_else(|| Error::download_failed(url, "HTTP 404 Not Found"))
        }
    }

    const PNG: &[u8] = b"\x89PNG\r\n\x1A\npixels";
    const WEBP: &[u8] = b"RIFF\x10\x00\x00\x00WEBPVP8 ";

    fn fetcher(entries: &[(&str, &[u8])]) -> (ImageFetcher, broadcast::Receiver<Event>) {
        let (tx, rx) = broadcast::channel(16);
        (ImageFetcher::new(StaticFetcher::with(entries), tx), rx)
    }

    #[tokio::test]
    async fn extension_comes_from_payload_not_url() {
        let temp = TempDir::new().unwrap();
        let (fetcher, _rx) = fetcher(&[("https://cdn.example/icon.jpg", PNG)]);

        let saved = fetcher
            .fetch_and_save("https://cdn.example/icon.jpg", temp.path(), "icon-60x60", true)
            .await
            .unwrap();

        assert_eq!(saved.path, temp.path().join("icon-60x60.png"));
        assert_eq!(saved.byte_size, PNG.len() as u64);
        assert_eq!(std::fs::read(&saved.path).unwrap(), PNG);
    }

    #[tokio::test]
    async fn repeated_saves_never_overwrite() {
        let temp = TempDir::new().unwrap();
        let (fetcher, _rx) = fetcher(&[("https://cdn.example/a", WEBP)]);

        let mut names = Vec::new();
        for _ in 0..3 {
            let saved = fetcher
                .fetch_and_save("https://cdn.example/a", temp.path(), "shot", true)
                .await
                .unwrap();
            names.push(saved.path.file_name().unwrap().to_string_lossy().to_string());
        }

        assert_eq!(names, vec!["shot.webp", "shot_1.webp", "shot_2.webp"]);
    }

    #[tokio::test]
    async fn takes_the_first_free_suffix() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("shot.png"), "original").unwrap();
        std::fs::write(temp.path().join("shot_2.png"), "second").unwrap();
        let (fetcher, _rx) = fetcher(&[("https://cdn.example/a", PNG)]);

        let saved = fetcher
            .fetch_and_save("https://cdn.example/a", temp.path(), "shot", true)
            .await
            .unwrap();

        assert_eq!(saved.path, temp.path().join("shot_1.png"));
        assert_eq!(std::fs::read(temp.path().join("shot.png")).unwrap(), b"original");
        assert_eq!(std::fs::read(temp.path().join("shot_2.png")).unwrap(), b"second");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn dangling_symlink_is_never_written_through() {
        let temp = TempDir::new().unwrap();
        let outside = temp.path().join("outside.bin");
        std::os::unix::fs::symlink(&outside, temp.path().join("icon.png")).unwrap();
        let (fetcher, _rx) = fetcher(&[("https://cdn.example/a", PNG)]);

        let saved = fetcher
            .fetch_and_save("https://cdn.example/a", temp.path(), "icon", true)
            .await
            .unwrap();

        assert_eq!(saved.path, temp.path().join("icon_1.png"));
        assert!(!outside.exists());
    }

    #[tokio::test]
    async fn emits_saved_event_unless_quiet() {
        let temp = TempDir::new().unwrap();
        let (fetcher, mut rx) = fetcher(&[("https://cdn.example/a", PNG)]);

        fetcher
            .fetch_and_save("https://cdn.example/a", temp.path(), "quiet", true)
            .await
            .unwrap();
        assert!(rx.try_recv().is_err(), "quiet save must not emit");

        let saved = fetcher
            .fetch_and_save("https://cdn.example/a", temp.path(), "loud", false)
            .await
            .unwrap();
        assert_eq!(rx.try_recv().unwrap(), Event::AssetSaved { file: saved });
    }

    #[tokio::test]
    async fn transport_failure_is_download_failed_and_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let (fetcher, _rx) = fetcher(&[]);

        let result = fetcher
            .fetch_and_save("https://cdn.example/gone", temp.path(), "gone", false)
            .await;

        assert!(matches!(result, Err(Error::DownloadFailed { .. })));
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn missing_directory_is_download_failed() {
        let temp = TempDir::new().unwrap();
        let (fetcher, _rx) = fetcher(&[("https://cdn.example/a", PNG)]);

        let result = fetcher
            .fetch_and_save(
                "https://cdn.example/a",
                &temp.path().join("does-not-exist"),
                "icon",
                true,
            )
            .await;

        match result {
            Err(Error::DownloadFailed { url, .. }) => assert_eq!(url, "https://cdn.example/a"),
            other => panic!("expected DownloadFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn save_target_uses_target_fields() {
        let temp = TempDir::new().unwrap();
        let (fetcher, _rx) = fetcher(&[("https://cdn.example/s1", &b"\xFF\xD8jpeg"[..])]);
        let target = DownloadTarget {
            url: "https://cdn.example/s1".into(),
            directory: temp.path().to_path_buf(),
            base_name: "screenshot-iPhone-1".into(),
        };

        let saved = fetcher.save_target(&target, true).await.unwrap();
        assert_eq!(saved.path, temp.path().join("screenshot-iPhone-1.jpg"));
    }
}
