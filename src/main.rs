//! appcask command-line entry point.
//!
//! Every prompt can be answered up front with a flag, so scripts can run the
//! tool without a terminal.

use appcask::prompt;
use appcask::{
    AppRecord, AssetLocator, CatalogClient, Config, Country, DeviceFilter, Error, Event,
    ExportMode, ExportOrchestrator, ExportRequest, ExportSummary, Outcome, Result,
};
use clap::Parser;
use std::path::PathBuf;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing_subscriber::EnvFilter;

/// Download App Store icons, screenshots and app information
#[derive(Parser, Debug)]
#[command(name = "appcask", version, about)]
struct Args {
    /// App name to search for (prompted when omitted)
    term: Option<String>,

    /// Storefront code, e.g. us, jp, de (prompted when omitted or unknown)
    country: Option<String>,

    /// JSON configuration file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Base directory for exports (default: Desktop, else the working directory)
    #[arg(short = 'o', long, env = "APPCASK_OUTPUT")]
    output: Option<PathBuf>,

    /// Search result index to export, or `q` to quit
    #[arg(long)]
    select: Option<String>,

    /// Content mode: 1 icon, 2 screenshots, 3 app info, 4 everything
    #[arg(long)]
    mode: Option<String>,

    /// Icon size selector: 0 60x60, 1 100x100, 2 512x512, 3 1024x1024
    #[arg(long = "icon-size")]
    icon_size: Option<String>,

    /// Screenshot sets: iphone, ipad or all
    #[arg(long)]
    device: Option<String>,

    /// Suppress per-asset messages
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Debug logging and full error chains
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Never offer to open the export folder
    #[arg(long = "no-open")]
    no_open: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);
    let verbose = args.verbose;

    let result = tokio::select! {
        result = run(args) => result,
        _ = appcask::wait_for_interrupt() => Err(Error::Interrupted),
    };

    match &result {
        Ok(()) => {}
        Err(Error::Interrupted) => println!("\n\n👋 Goodbye!"),
        Err(Error::NotFound(term)) => eprintln!("❌ No apps found for \"{term}\"."),
        Err(Error::InvalidSelection(input)) => eprintln!("❌ Invalid selection: {input}"),
        Err(e) => {
            eprintln!("\n❌ Error: {e}");
            if verbose {
                let mut source = std::error::Error::source(e);
                while let Some(cause) = source {
                    eprintln!("   caused by: {cause}");
                    source = std::error::Error::source(cause);
                }
            }
            tracing::debug!(code = e.error_code(), "run failed");
        }
    }

    std::process::exit(Outcome::from_result(&result).exit_code());
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("appcask=debug,warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(output) = &args.output {
        config.output.root = Some(output.clone());
    }
    config.quiet |= args.quiet;
    config.validate()?;

    println!("\n  AppCask v{}\n", env!("CARGO_PKG_VERSION"));

    let term = match &args.term {
        Some(term) => term.trim().to_string(),
        None => prompt::ask("📱 Enter the app name to search: ").await?,
    };
    if term.is_empty() {
        return Err(Error::InvalidSelection("empty search term".to_string()));
    }
    let country = choose_country(&args, &config).await?;

    println!("\n🔍 Searching for \"{term}\"...");
    let results = CatalogClient::new(&config.http)?
        .search(&term, &country)
        .await?;

    let input = match &args.select {
        Some(select) => select.clone(),
        None => {
            print!("{}", prompt::render_results(&results));
            prompt::ask(&prompt::selection_prompt(results.results.len())).await?
        }
    };
    let Some(index) = prompt::parse_app_selection(&input, results.results.len())? else {
        return Ok(());
    };
    let record = &results.results[index];
    println!(
        "\n✅ Selected: {}",
        record.track_censored_name.as_deref().unwrap_or("N/A")
    );

    let mode = match &args.mode {
        Some(mode) => prompt::parse_mode(mode)?,
        None => {
            print!("{}", prompt::render_modes());
            prompt::parse_mode(&prompt::ask("\nChoose an option (1-4): ").await?)?
        }
    };

    let Some(request) = build_request(&args, &config, record, mode).await? else {
        return Ok(());
    };

    let summary = export(&config, record, &request).await?;
    print_summary(mode, &summary);

    let interactive = args.select.is_none();
    if cfg!(target_os = "macos")
        && interactive
        && !config.quiet
        && !args.no_open
        && summary.file_count > 0
    {
        let answer = prompt::ask("\nOpen the folder now? (y/n): ").await;
        if prompt::confirm_or_decline(answer)? {
            appcask::paths::open_folder(&summary.directory)?;
        }
    }
    Ok(())
}

async fn choose_country(args: &Args, config: &Config) -> Result<Country> {
    if let Some(country) = args.country.as_deref().and_then(Country::lookup) {
        return Ok(country);
    }
    print!("{}", prompt::render_regions());
    let input = prompt::ask(&format!(
        "Choose one (default: {}): ",
        config.defaults.country
    ))
    .await?;
    Ok(prompt::parse_country(&input, &config.defaults.country))
}

/// Ask the mode-specific questions; `None` means there is nothing to export
async fn build_request(
    args: &Args,
    config: &Config,
    record: &AppRecord,
    mode: ExportMode,
) -> Result<Option<ExportRequest>> {
    let mut request = ExportRequest::new(mode);
    match mode {
        ExportMode::IconOnly => {
            println!("\n🎨 Downloading app icon");
            let input = match &args.icon_size {
                Some(size) => size.clone(),
                None => {
                    print!("{}", prompt::render_icon_sizes());
                    prompt::ask(&format!(
                        "\nSelect (0-3, default: {}): ",
                        config.defaults.icon_size
                    ))
                    .await?
                }
            };
            request.icon_size = prompt::parse_icon_size(&input, &config.defaults.icon_size)?;
        }
        ExportMode::ScreenshotsOnly => {
            println!("\n📸 Downloading app screenshots");
            let sets = AssetLocator::new(record).resolve_screenshots(DeviceFilter::All);
            if sets.is_empty() {
                println!("❌ This app does not provide any screenshots.");
                return Ok(None);
            }
            print!(
                "{}",
                prompt::render_screenshot_counts(sets.iphone.len(), sets.ipad.len())
            );
            let input = match &args.device {
                Some(device) => device.clone(),
                None => {
                    prompt::ask(
                        "\nWhich device screenshots would you like to download? \
                         (iphone/ipad/all, default: all): ",
                    )
                    .await?
                }
            };
            request.device = prompt::parse_device(&input, config.defaults.device);
        }
        ExportMode::InfoOnly => println!("\n📝 Saving app information"),
        ExportMode::All => {
            println!("\n📦 Downloading full package (icons + screenshots + app info)")
        }
    }
    Ok(Some(request))
}

/// Run the export while a task prints its progress
async fn export(
    config: &Config,
    record: &AppRecord,
    request: &ExportRequest,
) -> Result<ExportSummary> {
    let orchestrator = ExportOrchestrator::from_config(config)?;
    let printer = tokio::spawn(print_events(orchestrator.subscribe()));

    let result = orchestrator.run(record, request).await;

    // closing the channel lets the printer finish what is queued
    drop(orchestrator);
    printer.await.ok();
    result
}

async fn print_events(mut events: broadcast::Receiver<Event>) {
    loop {
        match events.recv().await {
            Ok(event) => print_event(&event),
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "progress output fell behind");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

fn print_event(event: &Event) {
    match event {
        Event::StageStarted { index, total, name } => println!("\n[{index}/{total}] 📥 {name}..."),
        Event::ScreenshotSetStarted { device, count } => {
            println!("\nDownloading {} screenshots ({count})...", device.dir_name())
        }
        Event::ScreenshotSetFinished { device } => {
            println!("\n✅ {} screenshots downloaded", device.dir_name())
        }
        Event::AssetSaved { file } => println!(
            "\n✅ Saved: {} ({} KB)",
            file.path
                .file_name()
                .map(|n| n.to_string_lossy())
                .unwrap_or_default(),
            file.size_kb()
        ),
        Event::AssetSkipped { asset } => {
            println!("❌ This app does not provide {asset}.")
        }
        Event::DownloadFailed { url, error } => eprintln!("❌ Download failed: {error} ({url})"),
        Event::MetadataWritten { .. } | Event::Completed { .. } => {}
    }
}

fn print_summary(mode: ExportMode, summary: &ExportSummary) {
    match mode {
        ExportMode::InfoOnly => {
            println!("✨ App information saved successfully!");
            println!("📁 Directory: {}", summary.directory.display());
            println!("   - app_info.txt  (Plain text)");
            println!("   - app_info.json (JSON format)");
            println!("   - README.md     (Markdown format)");
        }
        ExportMode::All => {
            println!("\n✨ Download completed!");
            println!("📁 All files saved to: {}", summary.directory.display());
            println!("\nDirectory structure:");
            println!("  ├── icons/           (App icons)");
            println!("  ├── screenshots/     (App screenshots)");
            println!("  ├── app_info.txt     (Plain text)");
            println!("  ├── app_info.json    (JSON format)");
            println!("  └── README.md        (Markdown)");
        }
        ExportMode::IconOnly | ExportMode::ScreenshotsOnly => {
            println!("\n📁 Saved to: {}", summary.directory.display());
        }
    }

    println!(
        "\n📊 Summary: {} files, total size {} MB",
        summary.file_count,
        summary.total_mb()
    );
    if summary.failed_assets > 0 {
        println!("⚠️  {} asset(s) could not be downloaded", summary.failed_assets);
    }
}
