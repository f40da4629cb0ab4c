use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};

/// Concurrent set of canonical URLs already observed
///
/// The set only grows. Out-of-prefix links are recorded here too, so they are
/// evaluated once and never again.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: RwLock<HashSet<String>>,
}

impl VisitedSet {
    /// Creates an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `url` has been added
    pub fn has(&self, url: &str) -> bool {
        self.urls
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(url)
    }

    /// Adds `url`; adding a URL that is already present changes nothing
    pub fn add(&self, url: &str) {
        let mut urls = self.urls.write().unwrap_or_else(PoisonError::into_inner);
        if !urls.contains(url) {
            urls.insert(url.to_string());
        }
    }

    /// Adds `url` and reports whether it was absent before
    ///
    /// The membership check and the insertion happen under one lock, so of
    /// several concurrent callers with the same URL exactly one sees `true`.
    pub fn insert(&self, url: &str) -> bool {
        let mut urls = self.urls.write().unwrap_or_else(PoisonError::into_inner);
        if urls.contains(url) {
            return false;
        }
        urls.insert(url.to_string())
    }

    /// Number of distinct URLs observed
    pub fn len(&self) -> usize {
        self.urls.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns true if nothing has been observed yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies the observed URLs out, sorted
    pub fn snapshot(&self) -> Vec<String> {
        let mut urls: Vec<String> = self
            .urls
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect();
        urls.sort();
        urls
    }
}
