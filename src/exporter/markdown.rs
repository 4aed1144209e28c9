//! Formatted document (`README.md`).

use super::fields::{ExportFields, id_or_na, or_na};
use std::fmt::{self, Write};

/// Badge service base URL
const BADGE_BASE: &str = "https://img.shields.io/badge";

/// Escape a badge field; the badge path uses `-` as its separator
pub fn escape_badge(value: &str) -> String {
    value.replace('-', "--")
}

/// The rating, version and price badge lines
///
/// Only the price is escaped.
pub fn badges(fields: &ExportFields) -> [String; 3] {
    [
        format!(
            "![Rating]({BADGE_BASE}/Rating-{}-blue)",
            fields.ratings.average_display()
        ),
        format!(
            "![Version]({BADGE_BASE}/Version-{}-green)",
            or_na(&fields.version.current_version)
        ),
        format!(
            "![Price]({BADGE_BASE}/Price-{}-orange)",
            escape_badge(&fields.pricing.display())
        ),
    ]
}

/// Render the markdown document
pub fn render(fields: &ExportFields, exported_at: &str) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = write_document(&mut out, fields, exported_at);
    out
}

fn write_document(out: &mut impl Write, fields: &ExportFields, exported_at: &str) -> fmt::Result {
    let ExportFields {
        basic,
        version,
        ratings,
        categories,
        release,
        links,
        ..
    } = fields;

    writeln!(out, "# {}\n", or_na(&basic.name))?;
    writeln!(out, "> Developer: {}\n", or_na(&basic.developer))?;
    for badge in badges(fields) {
        writeln!(out, "{badge}")?;
    }

    writeln!(out, "\n## 📱 Basic Information\n")?;
    writeln!(out, "| Item | Value |\n|------|-------|")?;
    writeln!(out, "| App ID | {} |", id_or_na(basic.app_id))?;
    writeln!(out, "| Bundle ID | {} |", or_na(&basic.bundle_id))?;
    writeln!(out, "| Developer | {} |", or_na(&basic.developer))?;
    writeln!(out, "| Primary Category | {} |", or_na(&categories.primary_genre))?;
    writeln!(out, "| Content Rating | {} |", or_na(&release.content_rating))?;

    writeln!(out, "\n## 📊 Version Information\n")?;
    writeln!(out, "- **Current Version**: {}", or_na(&version.current_version))?;
    writeln!(out, "- **File Size**: {}", version.file_size_display())?;
    writeln!(out, "- **Minimum OS**: {}", version.minimum_os_display())?;
    writeln!(
        out,
        "- **Release Date**: {}",
        or_na(&release.current_version_release_date)
    )?;

    writeln!(out, "\n## ⭐ Ratings\n")?;
    writeln!(out, "- **Average Rating**: {} / 5.0", ratings.average_display())?;
    writeln!(out, "- **Total Ratings**: {}", ratings.count_display())?;

    writeln!(out, "\n## 📝 Description\n\n{}", fields.description_display())?;
    writeln!(out, "\n## 🆕 What's New\n\n{}", fields.release_notes_display())?;

    writeln!(out, "\n## 🔗 Links\n")?;
    writeln!(out, "- [App Store]({})", or_na(&links.app_store))?;
    writeln!(
        out,
        "- [Developer Website]({})",
        or_na(&links.developer_website)
    )?;

    writeln!(out, "\n---\n\n*Exported at: {exported_at}*")
}
