use std::collections::{HashMap, VecDeque};

use tracing::debug;

use crate::envelope::Envelope;

/// Most list responses kept at once; older queries are refetched.
pub const MAX_ENTRIES: usize = 32;

/// List responses keyed by the serialized query that produced them.
///
/// Entries are dropped on invalidation and evicted oldest-first past
/// [`MAX_ENTRIES`]. The page on screen is owned by the controller, so
/// clearing the cache never blanks the view.
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: HashMap<String, Envelope>,
    order: VecDeque<String>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh(&self, key: &str) -> Option<&Envelope> {
        self.entries.get(key)
    }

    pub fn store(&mut self, key: String, envelope: Envelope) {
        if self.entries.insert(key.clone(), envelope).is_some() {
            self.order.retain(|k| k != &key);
        }
        self.order.push_back(key);

        while self.order.len() > MAX_ENTRIES {
            if let Some(oldest) = self.order.pop_front() {
                debug!(key = %oldest, "evicting cached list");
                self.entries.remove(&oldest);
            }
        }
    }

    /// Forget every entry; the next read of any key refetches.
    pub fn invalidate(&mut self) {
        debug!(entries = self.entries.len(), "invalidating list cache");
        self.entries.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
