//! End-to-end exports against a local HTTP server.
//!
//! A mock catalog serves one search result whose artwork and screenshot URLs
//! point back at the same server.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use appcask::config::HttpConfig;
use appcask::{
    AppRecord, CatalogClient, Country, ExportMode, ExportOrchestrator, ExportRequest,
    HttpAssetFetcher, IconSize,
};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PNG: &[u8] = b"\x89PNG\r\n\x1A\n0000000000000000";
const JPEG: &[u8] = b"\xFF\xD8\xFF\xE0jfif-data";
const GIF: &[u8] = b"GIF89a-frames";

async fn mount_asset(server: &MockServer, asset_path: &str, body: &[u8]) {
    Mock::given(method("GET"))
        .and(path(asset_path))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .mount(server)
        .await;
}

/// Catalog plus assets; the 100px icon is not provided and one iPad
/// screenshot is missing on the server
async fn store() -> MockServer {
    let server = MockServer::start().await;
    let base = server.uri();

    let body = serde_json::json!({
        "resultCount": 1,
        "results": [{
            "trackId": 1001,
            "trackCensoredName": "Pixel/Notes",
            "artistName": "Example Studio",
            "version": "3.2-beta",
            "fileSizeBytes": "10485760",
            "formattedPrice": "Free",
            "averageUserRating": 4.462,
            "userRatingCount": 12,
            "artworkUrl60": format!("{base}/art/60x60bb.jpg"),
            "artworkUrl512": format!("{base}/art/512x512bb.jpg"),
            "screenshotUrls": [format!("{base}/shots/p1.jpg"), format!("{base}/shots/p2.jpg")],
            "ipadScreenshotUrls": [format!("{base}/shots/t1.jpg"), format!("{base}/shots/t2.jpg")]
        }]
    });
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    mount_asset(&server, "/art/60x60bb.jpg", PNG).await;
    mount_asset(&server, "/art/512x512bb.jpg", PNG).await;
    mount_asset(&server, "/art/1024x1024bb.jpg", PNG).await;
    mount_asset(&server, "/shots/p1.jpg", JPEG).await;
    mount_asset(&server, "/shots/p2.jpg", GIF).await;
    mount_asset(&server, "/shots/t1.jpg", JPEG).await;
    server
}

fn http_config(server: &MockServer) -> HttpConfig {
    HttpConfig {
        search_url: format!("{}/search", server.uri()),
        ..Default::default()
    }
}

async fn find_app(server: &MockServer) -> AppRecord {
    let results = CatalogClient::new(&http_config(server))
        .unwrap()
        .search("notes", &Country::lookup_or_default("us"))
        .await
        .unwrap();
    results.results.into_iter().next().unwrap()
}

fn orchestrator(server: &MockServer, root: &Path) -> ExportOrchestrator {
    let fetcher = HttpAssetFetcher::new(&http_config(server)).unwrap();
    ExportOrchestrator::new(root, Arc::new(fetcher), true)
}

fn sorted_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn all_assets_export_produces_full_layout() {
    let server = store().await;
    let temp = TempDir::new().unwrap();
    let record = find_app(&server).await;

    let summary = orchestrator(&server, temp.path())
        .run(&record, &ExportRequest::new(ExportMode::All))
        .await
        .unwrap();

    let app = temp.path().join("Pixel_Notes");
    assert_eq!(
        sorted_names(&app),
        vec!["README.md", "app_info.json", "app_info.txt", "icons", "screenshots"]
    );
    assert_eq!(
        sorted_names(&app.join("icons")),
        vec!["icon-1024x1024.png", "icon-512x512.png", "icon-60x60.png"]
    );
    assert_eq!(
        sorted_names(&app.join("screenshots/iPhone")),
        vec!["screenshot-iPhone-1.jpg", "screenshot-iPhone-2.gif"]
    );
    assert_eq!(
        sorted_names(&app.join("screenshots/iPad")),
        vec!["screenshot-iPad-1.jpg"]
    );

    assert_eq!(summary.file_count, 9);
    assert_eq!(summary.failed_assets, 1);

    let markdown = std::fs::read_to_string(app.join("README.md")).unwrap();
    assert!(markdown.contains("![Rating](https://img.shields.io/badge/Rating-4.5-blue)"));
    assert!(markdown.contains("![Version](https://img.shields.io/badge/Version-3.2-beta-green)"));
    let text = std::fs::read_to_string(app.join("app_info.txt")).unwrap();
    assert!(text.contains("File Size: 10.0 MB"));
}

#[tokio::test]
async fn info_only_export_writes_three_files_and_a_truthful_summary() {
    let server = store().await;
    let temp = TempDir::new().unwrap();
    let mut record = find_app(&server).await;
    record.screenshot_urls = Some(vec![]);
    record.ipad_screenshot_urls = Some(vec![]);

    let summary = orchestrator(&server, temp.path())
        .run(&record, &ExportRequest::new(ExportMode::InfoOnly))
        .await
        .unwrap();

    let info = temp.path().join("Pixel_Notes").join("info");
    assert_eq!(
        sorted_names(&info),
        vec!["README.md", "app_info.json", "app_info.txt"]
    );
    let on_disk: u64 = sorted_names(&info)
        .iter()
        .map(|name| std::fs::metadata(info.join(name)).unwrap().len())
        .sum();
    assert_eq!(summary.file_count, 3);
    assert_eq!(summary.total_bytes, on_disk);

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(info.join("app_info.json")).unwrap())
            .unwrap();
    assert_eq!(json["basic"]["app_id"], 1001);
    assert_eq!(json["ratings"]["average_rating"], 4.5);
}

#[tokio::test]
async fn icon_only_export_repeats_without_overwriting() {
    let server = store().await;
    let temp = TempDir::new().unwrap();
    let record = find_app(&server).await;
    let orchestrator = orchestrator(&server, temp.path());
    let request = ExportRequest {
        icon_size: IconSize::Largest,
        ..ExportRequest::new(ExportMode::IconOnly)
    };

    orchestrator.run(&record, &request).await.unwrap();
    let summary = orchestrator.run(&record, &request).await.unwrap();

    assert_eq!(
        sorted_names(&temp.path().join("Pixel_Notes").join("icons")),
        vec!["icon-1024x1024.png", "icon-1024x1024_1.png"]
    );
    assert_eq!(summary.file_count, 2);
    assert_eq!(summary.total_bytes, 2 * PNG.len() as u64);
}
