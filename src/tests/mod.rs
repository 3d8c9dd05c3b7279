use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::output;
use crate::prober::{classify, ProbeOutcome};
use crate::runner::{dispatch_all, load_wordlist, Options, Runner};

fn base() -> reqwest::Url {
    reqwest::Url::parse("http://example.com/").unwrap()
}

#[tokio::test]
async fn each_distinct_target_reaches_the_executor_exactly_once() {
    let mut entries = Vec::new();
    for i in 0..250 {
        for _ in 0..4 {
            entries.push(format!("path{}", i));
        }
    }
    assert_eq!(entries.len(), 1000);

    let invocations = Arc::new(AtomicUsize::new(0));
    let seen = Arc::new(Mutex::new(HashSet::new()));
    let execute = {
        let invocations = Arc::clone(&invocations);
        let seen = Arc::clone(&seen);
        move |target: String| {
            let invocations = Arc::clone(&invocations);
            let seen = Arc::clone(&seen);
            async move {
                invocations.fetch_add(1, Ordering::SeqCst);
                seen.lock().unwrap().insert(target.clone());
                ProbeOutcome::Checked {
                    url: target,
                    status: 404,
                }
            }
        }
    };

    let totals = dispatch_all(&base(), entries, 50, execute, |_| {}).await;

    assert_eq!(invocations.load(Ordering::SeqCst), 250);
    assert_eq!(seen.lock().unwrap().len(), 250);
    assert_eq!(totals.dispatched, 250);
    assert_eq!(totals.duplicates, 750);
}

#[tokio::test]
async fn duplicate_entries_produce_a_single_outcome_per_target() {
    let entries = vec![
        "admin".to_string(),
        "admin".to_string(),
        "login".to_string(),
    ];
    let execute = |target: String| async move {
        let status = if target.ends_with("/admin") { 200 } else { 404 };
        classify(target, status, false)
    };

    let mut lines = Vec::new();
    let totals = dispatch_all(&base(), entries, 2, execute, |outcome| {
        lines.extend(output::format_outcome(outcome));
    })
    .await;

    assert_eq!(totals.dispatched, 2);
    assert_eq!(totals.duplicates, 1);
    let lines: HashSet<String> = lines.into_iter().collect();
    assert_eq!(
        lines,
        HashSet::from([
            "Found: http://example.com/admin".to_string(),
            "Checked: http://example.com/login - 404".to_string(),
        ])
    );
}

#[tokio::test]
async fn filtering_suppresses_noise_statuses_but_never_a_find() {
    let entries = vec![
        "admin".to_string(),
        "admin".to_string(),
        "login".to_string(),
    ];
    let execute = |target: String| async move {
        let status = if target.ends_with("/admin") { 200 } else { 404 };
        classify(target, status, true)
    };

    let mut lines = Vec::new();
    dispatch_all(&base(), entries, 2, execute, |outcome| {
        lines.extend(output::format_outcome(outcome));
    })
    .await;

    assert_eq!(lines, vec!["Found: http://example.com/admin".to_string()]);
}

#[tokio::test]
async fn redirects_and_server_errors_are_checked_even_when_filtering() {
    let entries = vec!["old".to_string(), "broken".to_string()];
    let execute = |target: String| async move {
        let status = if target.ends_with("/old") { 301 } else { 500 };
        classify(target, status, true)
    };

    let mut lines = Vec::new();
    dispatch_all(&base(), entries, 2, execute, |outcome| {
        lines.extend(output::format_outcome(outcome));
    })
    .await;

    let lines: HashSet<String> = lines.into_iter().collect();
    assert_eq!(
        lines,
        HashSet::from([
            "Checked: http://example.com/old - 301".to_string(),
            "Checked: http://example.com/broken - 500".to_string(),
        ])
    );
}

#[tokio::test]
async fn transport_failures_are_reported_without_stopping_the_run() {
    let entries = vec!["admin".to_string(), "timeout".to_string()];
    let execute = |target: String| async move {
        if target.ends_with("/timeout") {
            ProbeOutcome::Failed {
                url: target,
                error: "operation timed out".to_string(),
            }
        } else {
            classify(target, 200, false)
        }
    };

    let mut lines = Vec::new();
    let totals = dispatch_all(&base(), entries, 2, execute, |outcome| {
        lines.extend(output::format_outcome(outcome));
    })
    .await;

    assert_eq!(totals.dispatched, 2);
    let lines: HashSet<String> = lines.into_iter().collect();
    assert!(lines.contains("Found: http://example.com/admin"));
    assert!(
        lines.contains("Failed to connect to http://example.com/timeout: operation timed out")
    );
}

#[tokio::test]
async fn a_panicking_task_does_not_abort_its_siblings() {
    let entries = vec![
        "boom".to_string(),
        "admin".to_string(),
        "login".to_string(),
    ];
    let execute = |target: String| async move {
        if target.ends_with("/boom") {
            panic!("executor blew up");
        }
        classify(target, 200, false)
    };

    let mut outcomes = 0;
    let totals = dispatch_all(&base(), entries, 3, execute, |_| outcomes += 1).await;

    assert_eq!(totals.faults, 1);
    assert_eq!(totals.dispatched, 2);
    assert_eq!(outcomes, 2);
}

#[tokio::test]
async fn a_fresh_run_dispatches_the_same_unique_targets() {
    async fn run_once(entries: Vec<String>) -> Vec<String> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let execute = {
            let seen = Arc::clone(&seen);
            move |target: String| {
                let seen = Arc::clone(&seen);
                async move {
                    seen.lock().unwrap().push(target.clone());
                    classify(target, 404, false)
                }
            }
        };
        dispatch_all(&base(), entries, 4, execute, |_| {}).await;
        let mut targets = seen.lock().unwrap().clone();
        targets.sort();
        targets
    }

    let entries: Vec<String> = ["a", "b", "a", "c", "b"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let first = run_once(entries.clone()).await;
    let second = run_once(entries).await;

    let expected: Vec<String> = [
        "http://example.com/a",
        "http://example.com/b",
        "http://example.com/c",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    assert_eq!(first, expected);
    assert_eq!(first, second);
}

#[tokio::test]
async fn a_blank_entry_probes_the_base_url_itself() {
    let entries = vec!["".to_string()];
    let seen = Arc::new(Mutex::new(Vec::new()));
    let execute = {
        let seen = Arc::clone(&seen);
        move |target: String| {
            let seen = Arc::clone(&seen);
            async move {
                seen.lock().unwrap().push(target.clone());
                classify(target, 404, false)
            }
        }
    };

    dispatch_all(&base(), entries, 1, execute, |_| {}).await;

    assert_eq!(seen.lock().unwrap().clone(), vec!["http://example.com/"]);
}

#[tokio::test]
async fn a_full_run_survives_an_unreachable_host_and_reports_failures() {
    let path = std::env::temp_dir().join(format!("dirprobe-words-{}.txt", std::process::id()));
    std::fs::write(&path, "admin\nadmin\nlogin\n").unwrap();

    let options = Options {
        // reserved discard port, nothing listens there
        base_url: "http://127.0.0.1:9/".to_string(),
        wordlist: path.to_string_lossy().to_string(),
        filter_errors: false,
        delay: 0.0,
        threads: 2,
    };
    let runner = Runner::new(options).unwrap();
    let stats = runner.run().await.unwrap();

    assert_eq!(stats.entries, 3);
    assert_eq!(stats.dispatched, 2);
    assert_eq!(stats.duplicates, 1);
    assert_eq!(stats.failed, 2);

    std::fs::remove_file(&path).unwrap();
}

#[tokio::test]
async fn wordlist_lines_are_trimmed_and_blank_lines_kept() {
    let path = std::env::temp_dir().join(format!("dirprobe-trim-{}.txt", std::process::id()));
    std::fs::write(&path, "  admin  \n\nlogin\n").unwrap();

    let entries = load_wordlist(&path.to_string_lossy()).await.unwrap();
    assert_eq!(entries, vec!["admin", "", "login"]);

    std::fs::remove_file(&path).unwrap();
}
