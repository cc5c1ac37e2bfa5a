use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// One of the fixed text statistics reported for every document.
///
/// The declaration order is the display order of a [`MetricResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    TotalWords,
    UniqueWords,
    MostFrequentWord,
    CharactersWithSpaces,
    CharactersNoSpaces,
    SentenceCount,
    AverageWordLength,
    LongestWord,
    ShortestWord,
    TopWords,
}

impl Metric {
    pub const COUNT: usize = 10;

    pub const ALL: [Metric; Metric::COUNT] = [
        Metric::TotalWords,
        Metric::UniqueWords,
        Metric::MostFrequentWord,
        Metric::CharactersWithSpaces,
        Metric::CharactersNoSpaces,
        Metric::SentenceCount,
        Metric::AverageWordLength,
        Metric::LongestWord,
        Metric::ShortestWord,
        Metric::TopWords,
    ];

    /// Display key, e.g. `"Total Words"`.
    pub fn label(self) -> &'static str {
        match self {
            Metric::TotalWords => "Total Words",
            Metric::UniqueWords => "Unique Words",
            Metric::MostFrequentWord => "Most Frequent Word",
            Metric::CharactersWithSpaces => "Characters (with spaces)",
            Metric::CharactersNoSpaces => "Characters (no spaces)",
            Metric::SentenceCount => "Sentence Count",
            Metric::AverageWordLength => "Average Word Length",
            Metric::LongestWord => "Longest Word",
            Metric::ShortestWord => "Shortest Word",
            Metric::TopWords => "Top 5 Words",
        }
    }

    pub fn from_label(label: &str) -> Option<Metric> {
        Metric::ALL.into_iter().find(|m| m.label() == label)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered metric name -> formatted value mapping.
///
/// Always holds exactly one value per [`Metric`], iterated in [`Metric::ALL`] order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricResult {
    values: [String; Metric::COUNT],
}

impl MetricResult {
    /// Builds a result from values given in [`Metric::ALL`] order.
    pub(crate) fn from_values(values: [String; Metric::COUNT]) -> Self {
        Self { values }
    }

    pub fn get(&self, metric: Metric) -> &str {
        &self.values[metric.index()]
    }

    /// Lookup by display key; `None` for unknown keys.
    pub fn get_by_label(&self, label: &str) -> Option<&str> {
        Metric::from_label(label).map(|m| self.get(m))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, &str)> + '_ {
        Metric::ALL
            .into_iter()
            .zip(self.values.iter().map(String::as_str))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Serialize for MetricResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (metric, value) in self.iter() {
            map.serialize_entry(metric.label(), value)?;
        }
        map.end()
    }
}
