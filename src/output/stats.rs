//! Live crawl counters and the end-of-run summary
//!
//! Counters are plain atomics so every concurrently processed page can update
//! them without coordination.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared by every page processed during a run
#[derive(Debug, Default)]
pub struct CrawlStats {
    pages_fetched: AtomicU64,
    pages_from_disk: AtomicU64,
    pages_written: AtomicU64,
    links_seen: AtomicU64,
    links_enqueued: AtomicU64,
    links_out_of_scope: AtomicU64,
    links_malformed: AtomicU64,
    rounds: AtomicU64,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page_fetched(&self) {
        self.pages_fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn page_read_from_disk(&self) {
        self.pages_from_disk.fetch_add(1, Ordering::Relaxed);
    }

    pub fn page_written(&self) {
        self.pages_written.fetch_add(1, Ordering::Relaxed);
    }

    pub fn link_seen(&self) {
        self.links_seen.fetch_add(1, Ordering::Relaxed);
    }

    pub fn link_enqueued(&self) {
        self.links_enqueued.fetch_add(1, Ordering::Relaxed);
    }

    pub fn link_out_of_scope(&self) {
        self.links_out_of_scope.fetch_add(1, Ordering::Relaxed);
    }

    pub fn link_malformed(&self) {
        self.links_malformed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn round_completed(&self) {
        self.rounds.fetch_add(1, Ordering::Relaxed);
    }

    /// Takes a point-in-time copy of the counters
    ///
    /// # Arguments
    ///
    /// * `urls_visited` - Size of the visited set at the time of the snapshot
    pub fn snapshot(&self, urls_visited: usize) -> CrawlSummary {
        CrawlSummary {
            pages_fetched: self.pages_fetched.load(Ordering::Relaxed),
            pages_from_disk: self.pages_from_disk.load(Ordering::Relaxed),
            pages_written: self.pages_written.load(Ordering::Relaxed),
            links_seen: self.links_seen.load(Ordering::Relaxed),
            links_enqueued: self.links_enqueued.load(Ordering::Relaxed),
            links_out_of_scope: self.links_out_of_scope.load(Ordering::Relaxed),
            links_malformed: self.links_malformed.load(Ordering::Relaxed),
            rounds: self.rounds.load(Ordering::Relaxed),
            urls_visited,
        }
    }
}

/// Snapshot of a run's counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Pages fetched over HTTP
    pub pages_fetched: u64,

    /// Pages read back from the mirror directory
    pub pages_from_disk: u64,

    /// Pages newly written to the mirror directory
    pub pages_written: u64,

    /// Hrefs extracted from all processed pages
    pub links_seen: u64,

    /// Links pushed onto the frontier
    pub links_enqueued: u64,

    /// Links outside the seed prefix (recorded once, never queued)
    pub links_out_of_scope: u64,

    /// Links skipped because they could not be parsed or resolved
    pub links_malformed: u64,

    /// Drain rounds completed
    pub rounds: u64,

    /// Distinct URLs observed
    pub urls_visited: usize,
}

impl CrawlSummary {
    /// Total pages processed, whatever their source
    pub fn pages_processed(&self) -> u64 {
        self.pages_fetched + self.pages_from_disk
    }
}

/// Prints a run summary to stdout in a formatted manner
///
/// # Arguments
///
/// * `summary` - The summary to display
pub fn print_statistics(summary: &CrawlSummary) {
    println!("=== Mirror Statistics ===\n");

    println!("Pages:");
    println!("  Processed: {}", summary.pages_processed());
    println!("  Fetched remotely: {}", summary.pages_fetched);
    println!("  Read from disk: {}", summary.pages_from_disk);
    println!("  Newly written: {}", summary.pages_written);
    println!();

    println!("Links:");
    println!("  Seen: {}", summary.links_seen);
    println!("  Enqueued: {}", summary.links_enqueued);
    println!("  Outside prefix: {}", summary.links_out_of_scope);
    println!("  Malformed: {}", summary.links_malformed);
    println!("  Distinct URLs visited: {}", summary.urls_visited);
    println!();

    let cache_rate = if summary.pages_processed() > 0 {
        (summary.pages_from_disk as f64 / summary.pages_processed() as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Resumed from disk: {:.1}% over {} rounds",
        cache_rate, summary.rounds
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stats_are_zero() {
        let stats = CrawlStats::new();
        assert_eq!(stats.snapshot(0), CrawlSummary::default());
    }

    #[test]
    fn test_snapshot_reflects_counters() {
        let stats = CrawlStats::new();
        stats.page_fetched();
        stats.page_fetched();
        stats.page_read_from_disk();
        stats.page_written();
        stats.link_seen();
        stats.link_seen();
        stats.link_seen();
        stats.link_enqueued();
        stats.link_out_of_scope();
        stats.link_malformed();
        stats.round_completed();

        let summary = stats.snapshot(4);

        assert_eq!(summary.pages_fetched, 2);
        assert_eq!(summary.pages_from_disk, 1);
        assert_eq!(summary.pages_processed(), 3);
        assert_eq!(summary.pages_written, 1);
        assert_eq!(summary.links_seen, 3);
        assert_eq!(summary.links_enqueued, 1);
        assert_eq!(summary.links_out_of_scope, 1);
        assert_eq!(summary.links_malformed, 1);
        assert_eq!(summary.rounds, 1);
        assert_eq!(summary.urls_visited, 4);
    }
}
