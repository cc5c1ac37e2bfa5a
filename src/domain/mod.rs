pub mod analyzer;
pub mod metrics;

pub use analyzer::TextAnalyzer;
pub use metrics::{Metric, MetricResult};
