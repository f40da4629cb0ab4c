//! Output module for crawl statistics
//!
//! This module handles:
//! - Counting what a run did while it runs
//! - Producing the end-of-run summary

pub mod stats;

pub use stats::{print_statistics, CrawlStats, CrawlSummary};
