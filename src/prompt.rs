//! Interactive prompts
//!
//! Menus are rendered to strings and answers are parsed by pure functions, so
//! both can be tested without a terminal. [`ask`] is the only function that
//! touches stdin.

use crate::catalog::SearchResults;
use crate::error::{Error, Result};
use crate::exporter::fields::decimal;
use crate::types::{AppRecord, Country, DeviceFilter, ExportMode, IconSize};
use crate::utils::{round_to, valid_index};
use std::fmt::Write as _;
use std::io::{self, Write};

/// Print `prompt` and read one trimmed line from stdin
///
/// Reading happens on a blocking task so the caller can race it against a
/// shutdown signal.
///
/// # Errors
/// Closed stdin is [`Error::Interrupted`].
pub async fn ask(prompt: &str) -> Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;

    let line = tokio::task::spawn_blocking(|| {
        let mut input = String::new();
        io::stdin().read_line(&mut input).map(|n| (n, input))
    })
    .await
    .map_err(|e| Error::Other(format!("input task failed: {}", e)))??;

    match line {
        (0, _) => Err(Error::Interrupted),
        (_, input) => Ok(input.trim().to_string()),
    }
}

/// Region menu, three storefronts per row
pub fn render_regions() -> String {
    let mut out = String::from("\n🌍 Select App Store region:\n");
    for row in Country::ALL.chunks(3) {
        let cells: Vec<String> = row
            .iter()
            .map(|c| format!("{:<4}- {}", c.code, c.name))
            .collect();
        let _ = writeln!(out, "  {}", cells.join("    "));
    }
    out
}

/// Storefront for `input`; empty or unknown input gives `default_code`
pub fn parse_country(input: &str, default_code: &str) -> Country {
    Country::lookup(input).unwrap_or_else(|| Country::lookup_or_default(default_code))
}

/// Rating as listed in search results
fn rating_label(record: &AppRecord) -> String {
    match record.average_user_rating {
        Some(rating) => format!("⭐ {}", decimal(round_to(rating, 1))),
        None => "No Rating".to_string(),
    }
}

/// Numbered listing of search results
pub fn render_results(results: &SearchResults) -> String {
    let mut out = format!("\n📋 Found {} result(s):\n\n", results.results.len());
    for (index, app) in results.results.iter().enumerate() {
        let price = app
            .formatted_price
            .clone()
            .or_else(|| app.price.map(decimal))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "  [{index}] {}",
            app.track_censored_name.as_deref().unwrap_or_default()
        );
        let _ = writeln!(
            out,
            "      Developer: {} | Version: {}",
            app.artist_name.as_deref().unwrap_or("Unknown Developer"),
            app.version.as_deref().unwrap_or("N/A")
        );
        let _ = writeln!(out, "      Price: {price} | Rating: {}\n", rating_label(app));
    }
    out
}

/// Prompt line for choosing among `count` results
pub fn selection_prompt(count: usize) -> String {
    format!(
        "Select an app (0-{}, or press q to quit): ",
        count.saturating_sub(1)
    )
}

/// Index of the chosen result, or `None` when the user quits with `q`
///
/// # Errors
/// Non-numeric and out-of-range input is [`Error::InvalidSelection`].
pub fn parse_app_selection(input: &str, count: usize) -> Result<Option<usize>> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("q") {
        return Ok(None);
    }
    let index: i64 = input
        .parse()
        .map_err(|_| Error::InvalidSelection(input.to_string()))?;
    if !valid_index(index, count) {
        return Err(Error::InvalidSelection(input.to_string()));
    }
    Ok(Some(index as usize))
}

/// Content mode menu
pub fn render_modes() -> String {
    let mut out = String::from("\n📦 Select download content:\n");
    for mode in ExportMode::ALL {
        let _ = writeln!(out, "  [{}] {}", mode.selector(), mode.name());
    }
    out
}

/// Mode for a `1`..`4` selector
pub fn parse_mode(input: &str) -> Result<ExportMode> {
    let input = input.trim();
    ExportMode::from_selector(input).ok_or_else(|| Error::InvalidSelection(input.to_string()))
}

/// Icon size menu
pub fn render_icon_sizes() -> String {
    let mut out = String::from("\n📐 Select icon size:\n");
    for size in IconSize::ALL {
        let _ = writeln!(out, "  [{}] {}", size.selector(), size.label());
    }
    out
}

/// Icon size for a `0`..`3` selector; empty input selects `default_selector`
pub fn parse_icon_size(input: &str, default_selector: &str) -> Result<IconSize> {
    let input = match input.trim() {
        "" => default_selector,
        other => other,
    };
    IconSize::from_selector(input).ok_or_else(|| Error::InvalidSelection(input.to_string()))
}

/// Screenshot counts shown before the device prompt
pub fn render_screenshot_counts(iphone: usize, ipad: usize) -> String {
    let mut out = String::from("Available screenshots:\n");
    if iphone > 0 {
        let _ = writeln!(out, "  iPhone: {iphone}");
    }
    if ipad > 0 {
        let _ = writeln!(out, "  iPad:   {ipad}");
    }
    out
}

/// Device filter; empty input selects `default`
pub fn parse_device(input: &str, default: DeviceFilter) -> DeviceFilter {
    if input.trim().is_empty() {
        default
    } else {
        DeviceFilter::parse(input)
    }
}

/// `y` or `yes`, case-insensitive; anything else declines
pub fn parse_confirmation(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Confirmation for an optional follow-up question
///
/// Closed stdin declines instead of cancelling the run. Other read errors
/// are returned.
pub fn confirm_or_decline(answer: Result<String>) -> Result<bool> {
    match answer {
        Ok(input) => Ok(parse_confirmation(&input)),
        Err(Error::Interrupted) => Ok(false),
        Err(e) => Err(e),
    }
}
