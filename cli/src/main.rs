//! hwp-extract CLI - HWP/HWPX text and embedded-file extraction tool

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use colored::Colorize;

use unhwp::{
    run_batch_with, BatchEvent, ExtractOptions, FileOutcome, Metadata, TextDestination,
};

mod interactive;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "hwp-extract")]
#[command(disable_version_flag = true)]
#[command(about = "Extract text, metadata, and embedded files from HWP/HWPX documents", long_about = None)]
struct Cli {
    /// Target document file(s)
    #[arg(value_name = "target_file")]
    targets: Vec<PathBuf>,

    /// Enable debug mode
    #[arg(short, long)]
    debug: bool,

    /// Extract metadata information
    #[arg(short = 'm', long = "extract-meta")]
    extract_meta: bool,

    /// Extract embedded files
    #[arg(short = 'f', long = "extract-files")]
    extract_files: bool,

    /// Output directory for extracted files
    #[arg(short = 'o', long = "output-directory", value_name = "OUTPUT_DIRECTORY")]
    output_directory: Option<PathBuf>,

    /// Password for encrypted files
    #[arg(short, long, value_name = "PASSWORD")]
    password: Option<String>,

    /// Output text to console instead of file
    #[arg(short, long)]
    console: bool,

    /// Show version information
    #[arg(short = 'v', long)]
    version: bool,

    /// Launch interactive mode
    #[arg(short, long)]
    interactive: bool,
}

fn main() -> ExitCode {
    // Bare invocation launches interactive mode.
    if std::env::args().len() <= 1 {
        init_logger(false);
        return interactive::run(&ExtractOptions::new());
    }

    let cli = Cli::parse();
    init_logger(cli.debug);

    if cli.version {
        println!("hwp-extractor version {}", VERSION);
        return ExitCode::SUCCESS;
    }

    let mut options = ExtractOptions::new()
        .with_debug(cli.debug)
        .with_metadata(cli.extract_meta)
        .with_resources(cli.extract_files)
        .with_console(cli.console);
    if let Some(dir) = cli.output_directory {
        options = options.with_output_dir(dir);
    }
    if let Some(password) = cli.password {
        options = options.with_password(password);
    }

    if cli.interactive {
        return interactive::run(&options);
    }

    if cli.targets.is_empty() {
        eprintln!("hwp-extract: error: the following arguments are required: target_file");
        eprintln!("{}", Cli::command().render_usage());
        return ExitCode::FAILURE;
    }

    run_cli_batch(&cli.targets, &options)
}

fn init_logger(debug: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn run_cli_batch(paths: &[PathBuf], options: &ExtractOptions) -> ExitCode {
    let stdout = io::stdout();
    let summary = run_batch_with(paths, options, &mut stdout.lock(), |event| {
        if let BatchEvent::Failed { file_name, message } = event {
            eprintln!(
                "{} processing file '{}': {}",
                "Error".red().bold(),
                file_name,
                message
            );
        }
    });

    for outcome in &summary.outcomes {
        if let Some(metadata) = &outcome.metadata {
            print_metadata(outcome, metadata);
        }
        if let TextDestination::File(path) = &outcome.text_destination {
            println!("{} {}", "Saved".green(), path.display());
        }
        if let Some(report) = &outcome.resources {
            if report.written_count() > 0 {
                println!(
                    "Extracted {} file(s) to: {}",
                    report.written_count(),
                    report.directory.display()
                );
            }
            for failure in &report.failures {
                eprintln!(
                    "{} extracting '{}': {}",
                    "Error".red().bold(),
                    failure.name,
                    failure.message
                );
            }
        }
    }

    if summary.has_failures() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn print_metadata(outcome: &FileOutcome, metadata: &Metadata) {
    println!(
        "{}",
        format!("=== Metadata: {} ===", outcome.path.display())
            .cyan()
            .bold()
    );
    for (label, value) in metadata.fields() {
        match value {
            Some(value) => println!("{}: {}", label.bold(), value),
            None => println!("{}: {}", label.bold(), "(unavailable)".dimmed()),
        }
    }
    println!();
}
