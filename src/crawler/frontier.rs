//! FIFO crawl frontier with visited tracking
//!
//! A URL enters the queue at most once for the lifetime of a frontier: it is
//! refused while queued and after it has been visited.

use std::collections::{HashSet, VecDeque};

/// Ordered queue of canonical URLs awaiting a visit, plus the visited set
#[derive(Debug, Default)]
pub struct Frontier {
    /// URLs in the order they were discovered
    queue: VecDeque<String>,

    /// Mirror of `queue` for O(1) membership checks
    queued: HashSet<String>,

    /// URLs that have been popped and fetched (successfully or not)
    visited: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a URL unless it is already queued or visited
    ///
    /// Returns true if the URL was added.
    pub fn push(&mut self, url: String) -> bool {
        if self.visited.contains(&url) || self.queued.contains(&url) {
            return false;
        }
        self.queued.insert(url.clone());
        self.queue.push_back(url);
        true
    }

    /// Removes and returns the earliest-queued URL
    pub fn pop(&mut self) -> Option<String> {
        let url = self.queue.pop_front()?;
        self.queued.remove(&url);
        Some(url)
    }

    /// Records a visit; returns false if the URL had already been visited
    pub fn mark_visited(&mut self, url: &str) -> bool {
        self.visited.insert(url.to_string())
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn is_queued(&self, url: &str) -> bool {
        self.queued.contains(url)
    }

    /// Number of URLs waiting in the queue
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of distinct URLs visited so far
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut frontier = Frontier::new();
        frontier.push("a".to_string());
        frontier.push("b".to_string());
        frontier.push("c".to_string());

        assert_eq!(frontier.pop().as_deref(), Some("a"));
        assert_eq!(frontier.pop().as_deref(), Some("b"));
        assert_eq!(frontier.pop().as_deref(), Some("c"));
        assert_eq!(frontier.pop(), None);
    }

    #[test]
    fn test_duplicate_while_queued_rejected() {
        let mut frontier = Frontier::new();
        assert!(frontier.push("a".to_string()));
        assert!(!frontier.push("a".to_string()));
        assert_eq!(frontier.len(), 1);
        assert!(frontier.is_queued("a"));
    }

    #[test]
    fn test_visited_url_never_requeued() {
        let mut frontier = Frontier::new();
        frontier.push("a".to_string());
        let url = frontier.pop().unwrap();
        assert!(frontier.mark_visited(&url));

        assert!(!frontier.push("a".to_string()));
        assert!(frontier.is_empty());
        assert!(frontier.is_visited("a"));
        assert!(!frontier.is_queued("a"));
    }

    #[test]
    fn test_mark_visited_twice() {
        let mut frontier = Frontier::new();
        assert!(frontier.mark_visited("a"));
        assert!(!frontier.mark_visited("a"));
        assert_eq!(frontier.visited_count(), 1);
    }
}
