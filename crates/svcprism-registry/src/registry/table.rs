use std::sync::Arc;

use dashmap::DashMap;

use super::endpoint::{EndpointInfo, EndpointStats};

#[derive(Clone)]
struct EndpointEntry {
    info: Arc<EndpointInfo>,
    stats: Arc<EndpointStats>,
}

/// Endpoint table: `business subject -> (descriptor, stats)`.
///
/// Filled once at startup; entries are never removed. Stats are mutated in
/// place through the shared `Arc<EndpointStats>`.
#[derive(Default)]
pub struct EndpointTable {
    entries: DashMap<String, EndpointEntry>,
}

impl EndpointTable {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Last write wins for a repeated subject.
    pub(crate) fn insert(&self, info: Arc<EndpointInfo>, stats: Arc<EndpointStats>) {
        self.entries
            .insert(info.subject.clone(), EndpointEntry { info, stats });
    }

    pub fn stats(&self, subject: &str) -> Option<Arc<EndpointStats>> {
        self.entries.get(subject).map(|e| Arc::clone(&e.stats))
    }

    pub fn info(&self, subject: &str) -> Option<Arc<EndpointInfo>> {
        self.entries.get(subject).map(|e| Arc::clone(&e.info))
    }

    pub fn subjects(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
