use dashmap::DashMap;

use crate::domain::MetricResult;

/// Last successful analysis per file path.
///
/// Safe to write from worker threads while the callback thread reads.
#[derive(Debug, Default)]
pub struct ResultCache {
    // path -> metrics
    entries: DashMap<String, MetricResult>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the entry for `path`.
    pub fn put(&self, path: &str, result: MetricResult) {
        self.entries.insert(path.to_string(), result);
    }

    pub fn get(&self, path: &str) -> Option<MetricResult> {
        self.entries.get(path).map(|r| r.value().clone())
    }

    pub fn remove(&self, path: &str) {
        self.entries.remove(path);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy of every entry, sorted by path.
    pub fn snapshot(&self) -> Vec<(String, MetricResult)> {
        let mut rows: Vec<(String, MetricResult)> = self
            .entries
            .iter()
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));
        rows
    }
}
