//! Plain-text report (`app_info.txt`).

use super::fields::{ExportFields, id_or_na, list_or_na, or_na};
use std::fmt::{self, Write};

const RULE: &str = "===================================================";

/// Render the plain-text report
pub fn render(fields: &ExportFields, exported_at: &str) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = write_report(&mut out, fields, exported_at);
    out
}

fn write_report(out: &mut impl Write, fields: &ExportFields, exported_at: &str) -> fmt::Result {
    let ExportFields {
        basic,
        version,
        pricing,
        ratings,
        categories,
        release,
        links,
        ..
    } = fields;

    writeln!(out, "{RULE}\n                APPLICATION DETAILS\n{RULE}\n")?;

    writeln!(out, "[Basic Information]")?;
    writeln!(out, "App Name: {}", or_na(&basic.name))?;
    writeln!(out, "App ID: {}", id_or_na(basic.app_id))?;
    writeln!(out, "Bundle ID: {}", or_na(&basic.bundle_id))?;
    writeln!(out, "Developer: {}", or_na(&basic.developer))?;
    writeln!(out, "Developer ID: {}\n", id_or_na(basic.developer_id))?;

    writeln!(out, "[Version Information]")?;
    writeln!(out, "Current Version: {}", or_na(&version.current_version))?;
    writeln!(out, "File Size: {}", version.file_size_display())?;
    writeln!(out, "Minimum OS Requirement: {}", version.minimum_os_display())?;
    writeln!(
        out,
        "Supported Devices: {}\n",
        list_or_na(&version.supported_devices)
    )?;

    writeln!(out, "[Pricing & Ratings]")?;
    writeln!(out, "Price: {}", pricing.display())?;
    writeln!(out, "Currency: {}", or_na(&pricing.currency))?;
    writeln!(
        out,
        "Rating: {} ({} ratings)\n",
        ratings.average_display(),
        ratings.count_display()
    )?;

    writeln!(out, "[Categories]")?;
    writeln!(out, "Primary Category: {}", or_na(&categories.primary_genre))?;
    writeln!(out, "All Categories: {}\n", list_or_na(&categories.all_genres))?;

    writeln!(out, "[Release Information]")?;
    writeln!(out, "First Released: {}", or_na(&release.release_date))?;
    writeln!(
        out,
        "Last Updated: {}",
        or_na(&release.current_version_release_date)
    )?;
    writeln!(out, "Content Rating: {}\n", or_na(&release.content_rating))?;

    writeln!(out, "[Description]\n{}\n", fields.description_display())?;
    writeln!(out, "[Release Notes]\n{}\n", fields.release_notes_display())?;

    writeln!(
        out,
        "[Developer Information]\nDeveloper Website: {}\n",
        or_na(&links.developer_website)
    )?;
    writeln!(out, "[Store Link]\nApp Store: {}\n", or_na(&links.app_store))?;

    writeln!(out, "{RULE}\nExported At: {exported_at}\n{RULE}")
}
