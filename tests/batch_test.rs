//! Batch runner and background worker tests.

mod common;

use std::fs;
use std::path::PathBuf;

use unhwp::{run_batch_with, spawn_batch, BatchEvent, ExtractOptions};

#[test]
fn poisoned_middle_file_does_not_stop_the_batch() {
    let dir = tempfile::tempdir().unwrap();

    let first = dir.path().join("one.hwp");
    common::write_hwp(&first, 0, &common::simple_section(&["first"]), &[]);

    let second = dir.path().join("two.pdf");
    fs::write(&second, b"%PDF-1.7").unwrap();

    let third = dir.path().join("three.hwpx");
    common::write_simple_hwpx(&third, &["third"]);

    let out = dir.path().join("out");
    let options = ExtractOptions::new().with_output_dir(&out);
    let paths = vec![first, second.clone(), third];

    let mut console = Vec::new();
    let summary = run_batch_with(&paths, &options, &mut console, |_| {});

    // First and third were still processed and their outputs exist.
    assert_eq!(fs::read_to_string(out.join("one.txt")).unwrap(), "first");
    assert_eq!(fs::read_to_string(out.join("three.txt")).unwrap(), "third");

    // Exactly one failure, naming the offending path.
    assert_eq!(summary.attempted, 3);
    assert_eq!(summary.succeeded(), 2);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].path, second);
    assert!(summary.has_failures());
}

#[test]
fn batch_processes_files_in_input_order() {
    let dir = tempfile::tempdir().unwrap();
    let mut paths = Vec::new();
    for name in ["c.hwpx", "a.hwpx", "b.hwpx"] {
        let path = dir.path().join(name);
        common::write_simple_hwpx(&path, &[name]);
        paths.push(path);
    }

    let mut seen = Vec::new();
    let mut console = Vec::new();
    let summary = run_batch_with(&paths, &ExtractOptions::new(), &mut console, |event| {
        if let BatchEvent::Progress { file_name, .. } = event {
            seen.push(file_name.clone());
        }
    });

    assert!(!summary.has_failures());
    assert_eq!(seen, vec!["c.hwpx", "a.hwpx", "b.hwpx"]);
    // Console output accumulates in the same order.
    assert_eq!(
        String::from_utf8(console).unwrap(),
        "c.hwpx\na.hwpx\nb.hwpx\n"
    );
}

#[test]
fn worker_reports_progress_with_index_and_total() {
    let dir = tempfile::tempdir().unwrap();
    let mut paths: Vec<PathBuf> = Vec::new();
    for i in 0..3 {
        let path = dir.path().join(format!("doc{}.hwpx", i));
        common::write_simple_hwpx(&path, &["text"]);
        paths.push(path);
    }

    let out = dir.path().join("out");
    let options = ExtractOptions::new().with_output_dir(out);
    let worker = spawn_batch(paths, options);

    let events: Vec<BatchEvent> = worker.events().iter().collect();
    let summary = worker.wait();

    assert!(!summary.has_failures());
    let progress: Vec<(usize, usize)> = events
        .iter()
        .filter_map(|e| match e {
            BatchEvent::Progress { index, total, .. } => Some((*index, *total)),
            _ => None,
        })
        .collect();
    assert_eq!(progress, vec![(0, 3), (1, 3), (2, 3)]);

    let completed = events
        .iter()
        .filter(|e| matches!(e, BatchEvent::Completed { .. }))
        .count();
    assert_eq!(completed, 3);
}

#[test]
fn worker_failure_events_carry_the_message() {
    let dir = tempfile::tempdir().unwrap();
    let bogus = dir.path().join("broken.hwp");
    fs::write(&bogus, b"not a compound file at all").unwrap();

    let worker = spawn_batch(vec![bogus], ExtractOptions::new().with_console(true));
    let events: Vec<BatchEvent> = worker.events().iter().collect();
    let summary = worker.wait();

    assert!(summary.has_failures());
    let failed = events.iter().find_map(|e| match e {
        BatchEvent::Failed { message, .. } => Some(message.clone()),
        _ => None,
    });
    assert!(failed.unwrap().contains("Decode"));
}
