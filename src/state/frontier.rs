use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

/// Concurrent FIFO queue of URLs pending a fetch
///
/// `pop` never blocks waiting for work: an empty queue yields `None`, which the
/// crawl loop reads as "this drain round is over".
#[derive(Debug, Default)]
pub struct Frontier {
    queue: Mutex<VecDeque<String>>,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a URL at the back of the queue
    pub fn push(&self, url: impl Into<String>) {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(url.into());
    }

    /// Removes and returns the oldest queued URL
    pub fn pop(&self) -> Option<String> {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }

    /// Number of URLs queued and not yet popped
    pub fn len(&self) -> usize {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns true if nothing is queued
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
