//! Court Board
//!
//! Command line front end: reconstructs court signups from a photo of the
//! sign-up board, or from a saved text detection response.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use clap::{Parser, Subcommand};
use log::{LevelFilter, Log, Metadata, Record};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use court_board::layout::{format_signups, process_annotations, LayoutResult};
use court_board::ocr::{
    ensure_tesseract, load_annotations, read_board, CachedDetector, TesseractDetector,
    MAX_REQUESTS_PER_MONTH,
};
use court_board::paths;
use court_board::venue::{VenueRegistry, DEFAULT_VENUE_ID};

#[derive(Parser)]
#[command(name = "court-board", version, about = "Read court signups off a sign-up board photo")]
struct Cli {
    /// Venue config file (defaults to venues.json in the data directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconstruct signups from a saved text detection response (JSON)
    Parse {
        annotations: PathBuf,
        #[arg(long, default_value = DEFAULT_VENUE_ID)]
        venue: String,
        /// When the photo was taken (RFC 3339); defaults to now
        #[arg(long)]
        taken_at: Option<DateTime<Local>>,
        /// Print JSON instead of the text report
        #[arg(long)]
        json: bool,
        /// Include per-court sections and lines
        #[arg(long)]
        debug: bool,
    },
    /// Run Tesseract on a board photo, then reconstruct signups
    Detect {
        image: PathBuf,
        #[arg(long, default_value = DEFAULT_VENUE_ID)]
        venue: String,
        /// When the photo was taken (RFC 3339); defaults to now
        #[arg(long)]
        taken_at: Option<DateTime<Local>>,
        /// Keep only pixels brighter than this before recognition
        #[arg(long)]
        threshold: Option<u8>,
        /// Monthly budget of uncached detections
        #[arg(long, default_value_t = MAX_REQUESTS_PER_MONTH)]
        max_requests: usize,
        /// Skip the detection cache
        #[arg(long)]
        no_cache: bool,
        #[arg(long)]
        json: bool,
        #[arg(long)]
        debug: bool,
    },
    /// List configured venues
    Venues,
    /// Locate Tesseract and download English trained data if missing
    Setup,
}

/// Writes log records to stderr and the log file with a timestamp.
struct ConsoleFileLogger {
    level: LevelFilter,
    log_path: PathBuf,
}

impl Log for ConsoleFileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let timestamp = Local::now().format("%H:%M:%S%.3f");
        let line = format!("[{}] {:<5} {}\n", timestamp, record.level(), record.args());
        eprint!("{}", line);
        if let Ok(mut file) = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
        {
            let _ = file.write_all(line.as_bytes());
        }
    }

    fn flush(&self) {}
}

fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let logger = ConsoleFileLogger {
        level,
        log_path: paths::get_logs_dir().join("court_board.log"),
    };
    log::set_boxed_logger(Box::new(logger)).context("Logger already installed")?;
    log::set_max_level(level);
    Ok(())
}

fn main() -> Result<()> {
    // Set up panic hook to log panics
    std::panic::set_hook(Box::new(|panic_info| {
        let msg = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        let location = panic_info
            .location()
            .map(|loc| format!(" at {}:{}:{}", loc.file(), loc.line(), loc.column()))
            .unwrap_or_default();
        log::error!("[PANIC]{} {}", location, msg);
        eprintln!("[PANIC]{} {}", location, msg);
    }));

    let cli = Cli::parse();

    // Ensure output directories exist
    paths::ensure_directories()?;
    init_logging(cli.verbose)?;

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(paths::get_venues_config_path);
    let registry = VenueRegistry::load(&config_path);

    match cli.command {
        Commands::Parse {
            annotations,
            venue,
            taken_at,
            json,
            debug,
        } => {
            let venue = registry.get_or_default(&venue);
            let fragments = load_annotations(&annotations)?;
            log::info!(
                "Loaded {} fragments from {}",
                fragments.len(),
                annotations.display()
            );
            let result = process_annotations(&fragments, taken_at.unwrap_or_else(Local::now), &venue)?;
            print_result(&result, json, debug)
        }

        Commands::Detect {
            image,
            venue,
            taken_at,
            threshold,
            max_requests,
            no_cache,
            json,
            debug,
        } => {
            let venue = registry.get_or_default(&venue);
            let taken_at = taken_at.unwrap_or_else(Local::now);
            let detector = TesseractDetector::new(threshold);

            let result = if no_cache {
                read_board(&detector, &image, taken_at, &venue)?
            } else {
                let cached = CachedDetector::new(detector, paths::get_cache_dir(), max_requests);
                read_board(&cached, &image, taken_at, &venue)?
            };
            print_result(&result, json, debug)
        }

        Commands::Venues => {
            for venue in registry.venues() {
                println!(
                    "{}\t{}\t{} courts, {} per row, landmark \"{}\"",
                    venue.id, venue.display_name, venue.court_count, venue.courts_per_row, venue.landmark
                );
            }
            Ok(())
        }

        Commands::Setup => {
            let tesseract = ensure_tesseract()?;
            println!("tesseract: {}", tesseract.executable.display());
            println!("tessdata:  {}", tesseract.tessdata.display());
            Ok(())
        }
    }
}

/// Prints the signups as a text report or JSON, optionally with the per-court
/// diagnostics.
fn print_result(result: &LayoutResult, json: bool, debug: bool) -> Result<()> {
    if json {
        let output = if debug {
            serde_json::to_string_pretty(result)?
        } else {
            serde_json::to_string_pretty(&result.court_signups)?
        };
        println!("{}", output);
        return Ok(());
    }

    if debug {
        for info in &result.court_debug_info {
            println!(
                "Court {} section {:?} ({} fragments)",
                info.court,
                info.section_rectangle
                    .iter()
                    .map(|v| (v.x, v.y))
                    .collect::<Vec<_>>(),
                info.all_bounding_boxes_in_section.len()
            );
            for line in &info.lines_of_text {
                println!("    {}", line.join(" "));
            }
        }
        println!();
    }

    println!("{}", format_signups(&result.court_signups));
    Ok(())
}
