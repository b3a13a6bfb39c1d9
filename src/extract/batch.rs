//! Batch extraction over an ordered list of inputs.
//!
//! The loop is strictly sequential: one file's decode → extract → route →
//! resource-write unit completes before the next begins. A failing unit is
//! captured and reported; it never halts the loop. The overall outcome is a
//! failure if any single file failed.
//!
//! [`spawn_batch`] runs the same loop on a dedicated thread for interactive
//! front-ends, publishing progress messages over a one-way channel and
//! honoring a cancellation flag checked only between files.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{unbounded, Receiver, Sender};

use super::{extract_with_console, ExtractOptions, FileOutcome};

/// One file that failed, with the message reported for it.
#[derive(Debug, Clone)]
pub struct BatchFailure {
    /// Offending path
    pub path: PathBuf,
    /// Failure message
    pub message: String,
}

/// Aggregated result of a batch run.
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Number of files attempted (cancellation can leave this short)
    pub attempted: usize,

    /// Per-file outcomes of the successful units
    pub outcomes: Vec<FileOutcome>,

    /// Per-file failures, in input order
    pub failures: Vec<BatchFailure>,
}

impl BatchSummary {
    /// True when any file failed.
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Number of files that completed successfully.
    pub fn succeeded(&self) -> usize {
        self.outcomes.len()
    }
}

/// Progress notification published by the batch loop.
#[derive(Debug, Clone)]
pub enum BatchEvent {
    /// About to start a file (index is 0-based)
    Progress {
        /// File name of the unit about to run
        file_name: String,
        /// Position in the batch
        index: usize,
        /// Total batch size
        total: usize,
    },
    /// A file finished successfully
    Completed {
        /// File name of the finished unit
        file_name: String,
    },
    /// A file failed
    Failed {
        /// File name of the failed unit
        file_name: String,
        /// Failure message
        message: String,
    },
}

/// Run a batch, writing console-mode text to stdout.
pub fn run_batch(paths: &[PathBuf], options: &ExtractOptions) -> BatchSummary {
    let stdout = io::stdout();
    run_batch_with(paths, options, &mut stdout.lock(), |_| {})
}

/// Run a batch with an injected console stream and an event observer.
pub fn run_batch_with<W: Write, F: FnMut(&BatchEvent)>(
    paths: &[PathBuf],
    options: &ExtractOptions,
    console: &mut W,
    mut observe: F,
) -> BatchSummary {
    run_loop(paths, options, console, &mut observe, None)
}

fn run_loop<W: Write>(
    paths: &[PathBuf],
    options: &ExtractOptions,
    console: &mut W,
    observe: &mut dyn FnMut(&BatchEvent),
    cancel: Option<&AtomicBool>,
) -> BatchSummary {
    let total = paths.len();
    let mut summary = BatchSummary::default();

    for (index, path) in paths.iter().enumerate() {
        if let Some(flag) = cancel {
            if flag.load(Ordering::SeqCst) {
                log::info!("batch cancelled before file {} of {}", index + 1, total);
                break;
            }
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        observe(&BatchEvent::Progress {
            file_name: file_name.clone(),
            index,
            total,
        });

        summary.attempted += 1;
        match extract_with_console(path, options, console) {
            Ok(outcome) => {
                observe(&BatchEvent::Completed { file_name });
                summary.outcomes.push(outcome);
            }
            Err(e) => {
                if options.debug {
                    log::error!("{}: {:?}", path.display(), e);
                }
                observe(&BatchEvent::Failed {
                    file_name,
                    message: e.to_string(),
                });
                summary.failures.push(BatchFailure {
                    path: path.clone(),
                    message: e.to_string(),
                });
            }
        }
    }

    summary
}

/// Handle to a batch running on its own thread.
///
/// Events arrive on [`BatchWorker::events`]; the worker never touches
/// caller state. Cancellation takes effect between files.
pub struct BatchWorker {
    events: Receiver<BatchEvent>,
    cancel: Arc<AtomicBool>,
    handle: JoinHandle<BatchSummary>,
}

impl BatchWorker {
    /// The progress event channel.
    pub fn events(&self) -> &Receiver<BatchEvent> {
        &self.events
    }

    /// Request cancellation before the next file starts.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    /// Wait for the loop to finish and take the summary.
    pub fn wait(self) -> BatchSummary {
        // Receiver stays alive until here so the worker never blocks on a
        // disconnected channel.
        self.handle.join().unwrap_or_else(|_| BatchSummary {
            attempted: 0,
            outcomes: Vec::new(),
            failures: vec![BatchFailure {
                path: PathBuf::new(),
                message: "batch worker panicked".to_string(),
            }],
        })
    }
}

/// Run the batch loop on a dedicated thread, publishing progress over a
/// channel. Console-mode text goes to stdout.
pub fn spawn_batch(paths: Vec<PathBuf>, options: ExtractOptions) -> BatchWorker {
    let (sender, events): (Sender<BatchEvent>, Receiver<BatchEvent>) = unbounded();
    let cancel = Arc::new(AtomicBool::new(false));
    let cancel_flag = Arc::clone(&cancel);

    let handle = std::thread::spawn(move || {
        let stdout = io::stdout();
        let mut console = stdout.lock();
        let mut observe = |event: &BatchEvent| {
            // A dropped receiver only mutes progress; the loop still runs.
            let _ = sender.send(event.clone());
        };
        run_loop(&paths, &options, &mut console, &mut observe, Some(&cancel_flag))
    });

    BatchWorker {
        events,
        cancel,
        handle,
    }
}
