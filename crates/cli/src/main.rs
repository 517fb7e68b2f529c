//! bodygen CLI — generate out-of-line dispatch stubs for a header tree.
//!
//! Calls `bodygen-core` directly. With no PATH argument the folder is asked for
//! interactively on stdin.

use clap::Parser;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::debug;

use bodygen_core::types::RunReport;
use bodygen_core::{load_bodygen_config, run, validate_root};

/// bodygen — stub out declared-but-undefined C++ member functions.
#[derive(Parser)]
#[command(name = "bodygen", version, about)]
struct Cli {
    /// Folder containing header files (prompted for when omitted)
    path: Option<PathBuf>,

    /// Worker threads (default: available parallelism, or .bodygen.toml)
    #[arg(long)]
    threads: Option<usize>,

    /// Print the run report as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

/// Ask for the input folder on stdout and read one line from stdin.
fn prompt_for_path() -> std::io::Result<PathBuf> {
    println!("enter path to folder containing header files");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(PathBuf::from(line.trim_end_matches(['\r', '\n'])))
}

fn print_summary(report: &RunReport) {
    println!("\nprocessing complete. output in {}", report.output_root.display());
    println!(
        "{} files scanned: {} generated ({} functions), {} without matches, {} failed",
        report.files.len(),
        report.generated_count(),
        report.function_count(),
        report.no_match_count(),
        report.failed_count()
    );
}

fn main() {
    // Log lines go to stderr through one mutex so workers never interleave mid-line.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bodygen=info".parse().unwrap()),
        )
        .with_target(false)
        .with_writer(Mutex::new(std::io::stderr()))
        .init();

    let cli = Cli::parse();

    let path = match cli.path {
        Some(p) => p,
        None => prompt_for_path().unwrap_or_else(|e| {
            eprintln!("Error: could not read folder path: {e}");
            std::process::exit(1);
        }),
    };

    let root = match validate_root(&path) {
        Ok(root) => root,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let mut config = load_bodygen_config(&root);
    if let Some(threads) = cli.threads.filter(|n| *n > 0) {
        config.threads = Some(threads);
    }
    debug!(
        extensions = ?config.extensions,
        output_dir = config.output_dir.as_str(),
        threads = ?config.threads,
        "Resolved config"
    );

    let report = match run(&root, &config) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: could not serialize report: {e}");
                std::process::exit(1);
            }
        }
    } else {
        print_summary(&report);
    }
}
