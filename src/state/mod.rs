//! State module for tracking crawl progress
//!
//! This module provides the two pieces of state shared by every page being
//! processed during a run.
//!
//! # Components
//!
//! - `VisitedSet`: Every canonical URL observed so far, queued or not
//! - `Frontier`: FIFO queue of URLs waiting to be processed
//!
//! Both are internally synchronized and only expose single atomic operations;
//! neither is persisted across runs.

mod frontier;
mod visited;

// Re-export main types
pub use frontier::Frontier;
pub use visited::VisitedSet;
