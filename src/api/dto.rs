use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::MetricResult;
use crate::infrastructure::ResultCache;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub file: String,
    pub metric: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub rows: Vec<ReportRow>,
}

impl Report {
    /// Rows for one cached file; empty if it has no result.
    pub fn single(cache: &ResultCache, path: &str) -> Self {
        let mut report = Report::default();
        if let Some(result) = cache.get(path) {
            report.push_file(path, &result);
        }
        report
    }

    /// Rows for every cached file, files ordered by path.
    pub fn all(cache: &ResultCache) -> Self {
        let mut report = Report::default();
        for (path, result) in cache.snapshot() {
            report.push_file(&path, &result);
        }
        report
    }

    fn push_file(&mut self, path: &str, result: &MetricResult) {
        let file = display_name(path);
        self.rows.extend(result.iter().map(|(metric, value)| ReportRow {
            file: file.clone(),
            metric: metric.label().to_string(),
            value: value.to_string(),
        }));
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Last path component, or the whole path when there is none.
pub fn display_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}
