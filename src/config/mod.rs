//! Configuration module for Sumi-Mirror
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file, plus validation of the seed URL given on the command line.
//!
//! # Example
//!
//! ```no_run
//! use sumi_mirror::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("mirror.toml")).unwrap();
//! println!("Parallelism: {}", config.crawler.max_parallelism);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, HttpConfig};

// Re-export parser and validation functions
pub use parser::{load_config, parse_config};
pub use validation::{validate, validate_seed, MAX_PARALLELISM};
