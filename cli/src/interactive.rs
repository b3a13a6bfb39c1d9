//! Interactive mode: a line-oriented front-end over the batch worker.
//!
//! Paths queue up one per line; a blank line runs the queued batch on the
//! background worker while this thread renders its progress channel. The
//! worker owns the pipeline, this module owns the terminal.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use unhwp::{spawn_batch, BatchEvent, DocumentKind, ExtractOptions};

pub fn run(options: &ExtractOptions) -> ExitCode {
    println!("{}", "hwp-extract interactive mode".cyan().bold());
    println!("Enter document paths, one per line. A blank line runs the batch; Ctrl-D quits.");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut queue: Vec<PathBuf> = Vec::new();
    let mut had_failure = false;

    loop {
        print!("{} ", ">".dimmed());
        let _ = io::stdout().flush();

        match lines.next() {
            Some(Ok(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    if !queue.is_empty() {
                        had_failure |= run_queue(std::mem::take(&mut queue), options.clone());
                    }
                    continue;
                }
                let path = PathBuf::from(line);
                let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
                if DocumentKind::from_extension(ext).is_none() {
                    println!("{} unrecognized suffix, queued anyway: {}", "!".yellow(), line);
                }
                queue.push(path);
            }
            Some(Err(_)) | None => break,
        }
    }

    if !queue.is_empty() {
        had_failure |= run_queue(queue, options.clone());
    }

    if had_failure {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Run one queued batch; returns true when any file failed.
fn run_queue(paths: Vec<PathBuf>, options: ExtractOptions) -> bool {
    let total = paths.len() as u64;
    let worker = spawn_batch(paths, options);

    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    for event in worker.events().iter() {
        match event {
            BatchEvent::Progress {
                file_name,
                index,
                total,
            } => {
                bar.set_message(format!("{} ({}/{})", file_name, index + 1, total));
            }
            BatchEvent::Completed { file_name } => {
                bar.inc(1);
                bar.println(format!("{} {}", "ok".green(), file_name));
            }
            BatchEvent::Failed { file_name, message } => {
                bar.inc(1);
                bar.println(format!("{} {}: {}", "failed".red(), file_name, message));
            }
        }
    }

    let summary = worker.wait();
    bar.finish_with_message(format!(
        "{} succeeded, {} failed",
        summary.succeeded(),
        summary.failures.len()
    ));
    summary.has_failures()
}
