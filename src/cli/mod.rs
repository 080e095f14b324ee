//! Command-line entry point for the tidy-data pipeline.

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use std::path::PathBuf;
use std::time::Instant;

use crate::pipeline::run_pipeline;
use crate::PipelineConfig;

#[derive(Parser)]
#[command(name = "har-tidy")]
#[command(about = "Build a tidy per-subject, per-activity summary of the UCI HAR dataset", version)]
pub struct Cli {
    /// Path to YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Create a spinner for indeterminate operations
fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Print a summary box
fn print_summary(title: &str, items: &[(&str, String)]) {
    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║ {:<60} ║", title);
    println!("╠══════════════════════════════════════════════════════════════╣");
    for (key, value) in items {
        let display_value = if value.chars().count() > 38 {
            let head: String = value.chars().take(35).collect();
            format!("{}...", head)
        } else {
            value.clone()
        };
        println!("║ {:<20}: {:<38} ║", key, display_value);
    }
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
}

pub fn run() {
    let cli = Cli::parse();

    // Initialize logging based on verbosity (must come first)
    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .format_timestamp_secs()
        .init();

    let config = match &cli.config {
        Some(path) => match PipelineConfig::from_yaml(path) {
            Ok(cfg) => {
                info!("Loaded config from: {}", path.display());
                cfg
            }
            Err(e) => {
                error!("Failed to load config from {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => PipelineConfig::default(),
    };

    let start = Instant::now();
    let spinner = create_spinner("Building tidy dataset...");

    match run_pipeline(&config) {
        Ok(summary) => {
            spinner.finish_and_clear();

            print_summary(
                "Tidy Dataset Complete",
                &[
                    ("Dataset", summary.dataset_root.display().to_string()),
                    ("Train rows", summary.train_rows.to_string()),
                    ("Test rows", summary.test_rows.to_string()),
                    (
                        "Features kept",
                        format!("{} of {}", summary.selected_columns, summary.feature_columns),
                    ),
                    ("Groups written", summary.groups.to_string()),
                    ("Output file", summary.output_path.display().to_string()),
                    ("Duration", format!("{:.2?}", start.elapsed())),
                ],
            );
        }
        Err(e) => {
            spinner.finish_and_clear();
            error!("Pipeline failed: {:#}", e);
            std::process::exit(1);
        }
    }
}
