use std::sync::Arc;
use std::time::Duration;

use futures::stream::FuturesUnordered;
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Semaphore;
use tokio::task;
use tokio::time::Instant;

use crate::output;
use crate::prober::{ProbeOutcome, Prober};
use crate::registry::ClaimSet;
use crate::utils;

/// Run configuration, immutable once the probe starts.
#[derive(Clone, Debug)]
pub struct Options {
    pub base_url: String,
    pub wordlist: String,
    pub filter_errors: bool,
    pub delay: f64,
    pub threads: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            wordlist: String::new(),
            filter_errors: false,
            delay: 0.0,
            threads: 10,
        }
    }
}

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("no base URL provided")]
    MissingUrl,

    #[error("no wordlist provided")]
    MissingWordlist,

    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    #[error("invalid thread count {value}, expected a positive integer")]
    InvalidThreads { value: usize },

    #[error("invalid delay {value}, expected a non-negative number of seconds")]
    InvalidDelay { value: f64 },

    #[error("failed to open wordlist: {path}: {source}")]
    WordlistOpen {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read wordlist: {path}: {source}")]
    WordlistRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("probe interrupted")]
    Interrupted,
}

/// What came out of one dispatch pass over the wordlist.
#[derive(Clone, Copy, Debug, Default)]
pub struct DispatchTotals {
    pub dispatched: usize,
    pub duplicates: usize,
    pub faults: usize,
}

/// Counters aggregated while outcomes drain from the pool.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProbeStats {
    pub entries: usize,
    pub dispatched: usize,
    pub duplicates: usize,
    pub faults: usize,
    pub found: usize,
    pub checked: usize,
    pub filtered: usize,
    pub failed: usize,
    pub elapsed: Duration,
}

impl ProbeStats {
    fn record(&mut self, outcome: &ProbeOutcome) {
        match outcome {
            ProbeOutcome::Found { .. } => self.found += 1,
            ProbeOutcome::Checked { .. } => self.checked += 1,
            ProbeOutcome::Filtered { .. } => self.filtered += 1,
            ProbeOutcome::Failed { .. } => self.failed += 1,
        }
    }
}

/// Reads the wordlist into memory, one entry per line, trimming the
/// surrounding whitespace of each. Blank and duplicate lines are kept;
/// the dispatcher's registry collapses duplicates later.
pub async fn load_wordlist(path: &str) -> Result<Vec<String>, ProbeError> {
    let handle = File::open(path)
        .await
        .map_err(|source| ProbeError::WordlistOpen {
            path: path.to_string(),
            source,
        })?;
    let buf = BufReader::new(handle);
    let mut lines = buf.lines();
    let mut entries = Vec::new();
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|source| ProbeError::WordlistRead {
            path: path.to_string(),
            source,
        })?
    {
        entries.push(line.trim().to_string());
    }
    Ok(entries)
}

/// Fans the wordlist out across a pool of `threads` workers.
///
/// One task is submitted per entry, in file order; a semaphore keeps at
/// most `threads` of them running, each to completion (including the
/// executor's pacing delay) before its slot frees up. Every task claims
/// its target in the shared registry before probing, so duplicate entries
/// are skipped silently and each distinct URL reaches the executor
/// exactly once. Outcomes are handed to `on_outcome` as completions
/// arrive, in no particular order. A task that panics surfaces as a join
/// error, is reported on its own line, and never takes its siblings down.
pub async fn dispatch_all<F, Fut>(
    base_url: &reqwest::Url,
    entries: Vec<String>,
    threads: usize,
    execute: F,
    mut on_outcome: impl FnMut(&ProbeOutcome),
) -> DispatchTotals
where
    F: Fn(String) -> Fut + Clone + Send + Sync + 'static,
    Fut: std::future::Future<Output = ProbeOutcome> + Send + 'static,
{
    let claimed = Arc::new(ClaimSet::new());
    let slots = Arc::new(Semaphore::new(threads));
    let mut tasks = FuturesUnordered::new();

    for entry in entries {
        let target = utils::join_target(base_url, &entry);
        let claimed = Arc::clone(&claimed);
        let slots = Arc::clone(&slots);
        let execute = execute.clone();
        tasks.push(task::spawn(async move {
            let _permit = match slots.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => return None,
            };
            if !claimed.claim(&target).await {
                return None;
            }
            Some(execute(target).await)
        }));
    }

    let mut totals = DispatchTotals::default();
    while let Some(joined) = tasks.next().await {
        match joined {
            Ok(Some(outcome)) => {
                totals.dispatched += 1;
                on_outcome(&outcome);
            }
            Ok(None) => totals.duplicates += 1,
            Err(e) => {
                totals.faults += 1;
                output::print_task_fault(&e.to_string());
            }
        }
    }
    totals
}

#[derive(Clone, Debug)]
pub struct Runner {
    options: Options,
}

impl Runner {
    /// Validates the run configuration up front; nothing is dispatched
    /// when any part of it is unusable.
    pub fn new(options: Options) -> Result<Self, ProbeError> {
        if options.base_url.trim().is_empty() {
            return Err(ProbeError::MissingUrl);
        }
        if options.wordlist.trim().is_empty() {
            return Err(ProbeError::MissingWordlist);
        }
        if reqwest::Url::parse(options.base_url.trim()).is_err() {
            return Err(ProbeError::InvalidUrl {
                url: options.base_url.clone(),
            });
        }
        if options.threads == 0 {
            return Err(ProbeError::InvalidThreads {
                value: options.threads,
            });
        }
        if !options.delay.is_finite() || options.delay < 0.0 {
            return Err(ProbeError::InvalidDelay {
                value: options.delay,
            });
        }
        Ok(Self { options })
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Probes every wordlist entry and reports outcomes as they land.
    ///
    /// An interrupt abandons in-flight probes without waiting for them
    /// and comes back as `ProbeError::Interrupted` so the caller can wind
    /// down on its own terms. The attribution trailer is printed on every
    /// exit path once dispatch has begun.
    pub async fn run(&self) -> Result<ProbeStats, ProbeError> {
        let base_url = reqwest::Url::parse(self.options.base_url.trim()).map_err(|_| {
            ProbeError::InvalidUrl {
                url: self.options.base_url.clone(),
            }
        })?;
        let entries = load_wordlist(&self.options.wordlist).await?;
        let prober = Prober::new(self.options.filter_errors, self.options.delay)?;

        let started = Instant::now();
        let pb = ProgressBar::new(entries.len() as u64);
        pb.set_draw_target(ProgressDrawTarget::stderr());
        pb.enable_steady_tick(Duration::from_millis(500));
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.blue} {elapsed} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars(r#"#>-"#),
        );

        let mut stats = ProbeStats {
            entries: entries.len(),
            ..ProbeStats::default()
        };

        let execute = {
            let prober = prober.clone();
            move |target: String| {
                let prober = prober.clone();
                async move { prober.probe(target).await }
            }
        };

        let result = {
            let pb = &pb;
            let stats = &mut stats;
            let dispatch = dispatch_all(
                &base_url,
                entries,
                self.options.threads,
                execute,
                |outcome| {
                    pb.inc(1);
                    pb.set_message(outcome.url().to_string());
                    stats.record(outcome);
                    output::print_outcome(outcome);
                },
            );
            tokio::select! {
                totals = dispatch => Ok(totals),
                _ = tokio::signal::ctrl_c() => {
                    output::print_interrupt_notice();
                    Err(ProbeError::Interrupted)
                }
            }
        };

        pb.finish_and_clear();
        // runs whether dispatch completed, failed, or was interrupted
        output::print_attribution();

        let totals = result?;
        stats.dispatched = totals.dispatched;
        stats.duplicates = totals.duplicates;
        stats.faults = totals.faults;
        stats.elapsed = started.elapsed();
        Ok(stats)
    }
}
