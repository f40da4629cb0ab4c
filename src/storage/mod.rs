//! Storage module for mirrored pages
//!
//! This module owns everything that touches the mirror on disk:
//! - Reading back pages mirrored by an earlier run (the implicit resume cache)
//! - Fetching pages that are not on disk yet
//! - Publishing new pages without ever replacing an existing file

mod page_store;

pub use page_store::{Page, PageSource, PageStore};
