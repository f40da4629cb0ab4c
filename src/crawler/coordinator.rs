//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the round-based drain loop that:
//! - Pops URLs off the frontier and dispatches each one as its own task
//! - Bounds how many pages are processed at once with a semaphore
//! - Waits for the whole round before deciding whether another one is needed
//! - Stops the run on the first page failure or on cancellation

use crate::config::Config;
use crate::crawler::build_http_client;
use crate::crawler::processor::{process_page, PageContext};
use crate::output::CrawlSummary;
use crate::state::{Frontier, VisitedSet};
use crate::storage::PageStore;
use crate::url::Seed;
use crate::MirrorError;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

type Round = JoinSet<Result<(), MirrorError>>;

/// Main crawler coordinator structure
pub struct Coordinator {
    context: Arc<PageContext>,
    slots: Arc<Semaphore>,
    max_parallelism: usize,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// The seed starts out visited and queued.
    ///
    /// # Arguments
    ///
    /// * `seed` - Where the mirror starts, and the prefix that bounds it
    /// * `out_dir` - Root of the mirror on disk
    /// * `client` - HTTP client used for every fetch
    /// * `max_parallelism` - Pages processed at once (values below 1 count as 1)
    /// * `cancel` - Stops the run when triggered
    pub fn new(
        seed: Seed,
        out_dir: impl Into<PathBuf>,
        client: Client,
        max_parallelism: usize,
        cancel: CancellationToken,
    ) -> Self {
        let max_parallelism = max_parallelism.max(1);
        let context = PageContext::new(seed, out_dir, PageStore::new(client), cancel);

        Self {
            context: Arc::new(context),
            slots: Arc::new(Semaphore::new(max_parallelism)),
            max_parallelism,
        }
    }

    /// Creates a coordinator from the loaded configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(MirrorError)` - The HTTP client could not be built
    pub fn from_config(
        seed: Seed,
        out_dir: impl Into<PathBuf>,
        config: &Config,
        cancel: CancellationToken,
    ) -> Result<Self, MirrorError> {
        let client = build_http_client(&config.http).map_err(MirrorError::HttpClient)?;

        Ok(Self::new(
            seed,
            out_dir,
            client,
            config.crawler.max_parallelism as usize,
            cancel,
        ))
    }

    /// URLs observed so far
    pub fn visited(&self) -> &VisitedSet {
        &self.context.visited
    }

    /// URLs waiting to be processed
    pub fn frontier(&self) -> &Frontier {
        &self.context.frontier
    }

    /// The seed this coordinator mirrors
    pub fn seed(&self) -> &Seed {
        &self.context.seed
    }

    /// Root of the mirror on disk
    pub fn out_dir(&self) -> &Path {
        &self.context.out_dir
    }

    /// Current counters
    pub fn summary(&self) -> CrawlSummary {
        self.context.stats.snapshot(self.context.visited.len())
    }

    /// Runs the crawl until the frontier is drained
    ///
    /// Each round pops every queued URL, dispatching one task per URL as soon
    /// as a slot is free, then waits for all of them. Tasks push newly found
    /// links while the round is running, so the frontier is re-checked after
    /// every round and the run ends only when a finished round left it empty.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlSummary)` - The frontier drained without errors
    /// * `Err(MirrorError)` - The first page failure, or `Cancelled`
    pub async fn run(&self) -> Result<CrawlSummary, MirrorError> {
        tracing::info!(
            "Mirroring {} into {} ({} page(s) at a time)",
            self.context.seed,
            self.context.out_dir.display(),
            self.max_parallelism
        );

        let start_time = Instant::now();
        let result = self.drain().await;
        let summary = self.summary();

        match &result {
            Ok(()) => tracing::info!(
                "Mirror completed: {} pages processed ({} fetched, {} from disk) in {:?}",
                summary.pages_processed(),
                summary.pages_fetched,
                summary.pages_from_disk,
                start_time.elapsed()
            ),
            Err(e) => tracing::error!(
                "Mirror stopped after {} pages in {:?}: {}",
                summary.pages_processed(),
                start_time.elapsed(),
                e
            ),
        }

        result.map(|()| summary)
    }

    async fn drain(&self) -> Result<(), MirrorError> {
        let cancel = &self.context.cancel;

        loop {
            let mut round = Round::new();

            while let Some(url) = self.context.frontier.pop() {
                let permit = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(MirrorError::Cancelled),
                    permit = Arc::clone(&self.slots).acquire_owned() => {
                        permit.map_err(|_| MirrorError::Cancelled)?
                    }
                };

                let context = Arc::clone(&self.context);
                round.spawn(async move {
                    let _permit = permit;
                    let result = process_page(&context, &url).await;
                    if let Err(e) = &result {
                        tracing::error!("Error processing {}: {}", url, e);
                    }
                    result
                });
            }

            let dispatched = round.len();
            self.await_round(&mut round).await?;
            self.context.stats.round_completed();

            let remaining = self.context.frontier.len();
            tracing::debug!(
                "Round finished: {} pages processed, {} queued",
                dispatched,
                remaining
            );

            if remaining == 0 {
                return Ok(());
            }
        }
    }

    /// Waits for every task of a round
    ///
    /// On the first failure the rest of the round is detached: those tasks may
    /// finish, but nobody looks at their results.
    async fn await_round(&self, round: &mut Round) -> Result<(), MirrorError> {
        loop {
            let joined = tokio::select! {
                biased;
                _ = self.context.cancel.cancelled() => {
                    round.abort_all();
                    return Err(MirrorError::Cancelled);
                }
                joined = round.join_next() => joined,
            };

            match joined {
                None => return Ok(()),
                Some(Ok(Ok(()))) => {}
                Some(Ok(Err(e))) => {
                    round.detach_all();
                    return Err(e);
                }
                Some(Err(e)) => {
                    round.detach_all();
                    return Err(MirrorError::Task(e));
                }
            }
        }
    }
}

/// Runs a complete mirror operation
///
/// # Arguments
///
/// * `seed` - The seed URL as given by the user
/// * `out_dir` - Root of the mirror on disk
/// * `config` - The loaded configuration
/// * `cancel` - Stops the run when triggered
///
/// # Example
///
/// ```no_run
/// use sumi_mirror::config::Config;
/// use sumi_mirror::crawler::run_mirror;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let summary = run_mirror(
///     "https://example.com/",
///     "./out".as_ref(),
///     &Config::default(),
///     CancellationToken::new(),
/// )
/// .await?;
/// println!("{} pages mirrored", summary.pages_processed());
/// # Ok(())
/// # }
/// ```
pub async fn run_mirror(
    seed: &str,
    out_dir: &Path,
    config: &Config,
    cancel: CancellationToken,
) -> Result<CrawlSummary, MirrorError> {
    let seed = Seed::parse(seed)?;
    let coordinator = Coordinator::from_config(seed, out_dir, config, cancel)?;
    coordinator.run().await
}
