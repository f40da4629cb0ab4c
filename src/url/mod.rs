//! URL handling module for Sumi-Mirror
//!
//! This module provides fragment stripping, link resolution, the seed prefix
//! that bounds a mirror, and the mapping from URLs to local file paths.

mod normalize;
mod path;

use crate::UrlError;
use std::fmt;
use url::Url;

// Re-export main functions
pub use normalize::{defrag, resolve};
pub use path::{map_url_to_path, INDEX_FILE};

/// The starting point of a mirror
///
/// The seed is kept in canonical form (parsed, fragment removed). Its string form
/// is both the first URL crawled and the prefix every other crawled URL must share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seed {
    url: Url,
}

impl Seed {
    /// Parses and canonicalizes a seed URL
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_mirror::url::Seed;
    ///
    /// let seed = Seed::parse("https://example.com#top").unwrap();
    /// assert_eq!(seed.as_str(), "https://example.com/");
    /// assert!(seed.contains("https://example.com/about"));
    /// assert!(!seed.contains("https://other.com/"));
    /// ```
    pub fn parse(raw: &str) -> Result<Self, UrlError> {
        let mut url = Url::parse(raw).map_err(|e| UrlError::Parse(format!("{}: {}", raw, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(UrlError::InvalidScheme(format!(
                "Only HTTP and HTTPS seeds are supported, got: {}",
                url.scheme()
            )));
        }

        url.set_fragment(None);
        Ok(Self { url })
    }

    /// The canonical seed string
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// The parsed seed, used as the base for resolving every discovered link
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Returns true if `candidate` lies inside the mirrored prefix
    pub fn contains(&self, candidate: &str) -> bool {
        candidate.starts_with(self.as_str())
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
