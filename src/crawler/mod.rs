//! Crawler module for mirroring a site
//!
//! This module contains the core crawling logic, including:
//! - HTTP client construction
//! - HTML parsing and link extraction
//! - Processing of a single page
//! - The bounded-parallelism crawl loop

mod coordinator;
mod fetcher;
mod parser;
mod processor;

pub use coordinator::{run_mirror, Coordinator};
pub use fetcher::build_http_client;
pub use parser::extract_links;
pub use processor::{process_page, PageContext};
