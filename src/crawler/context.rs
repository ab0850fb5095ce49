//! Crawl context correlation
//!
//! Every detail-page fetch carries a [`ContextToken`]; the registry maps it
//! to the slot of the listing that fetch must enrich. Registration happens
//! right after the index stage appends the listing, and the detail handler
//! claims the entry exactly once. The registry only records where to write:
//! listing storage is owned by the result collection alone.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Opaque correlation token carried by one detail-page fetch job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextToken(u64);

/// Table correlating in-flight detail fetches with result-collection slots.
#[derive(Debug, Default)]
pub struct ContextRegistry {
    next_token: AtomicU64,
    slots: Mutex<HashMap<u64, usize>>,
}

impl ContextRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a pending enrichment for the given slot and returns the
    /// token the detail fetch must carry.
    pub fn register(&self, slot: usize) -> ContextToken {
        let id = self.next_token.fetch_add(1, Ordering::Relaxed);
        self.slots.lock().unwrap().insert(id, slot);
        ContextToken(id)
    }

    /// Claims a token, removing the entry. Returns `None` for a token that
    /// was never registered or was already claimed; callers treat that as
    /// the fatal correlation failure.
    pub fn claim(&self, token: ContextToken) -> Option<usize> {
        self.slots.lock().unwrap().remove(&token.0)
    }

    /// Number of registered, unclaimed entries.
    pub fn pending(&self) -> usize {
        self.slots.lock().unwrap().len()
    }
}
