pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ports;

pub use application::{BatchDriver, BatchHandle, DriverConfig};
pub use domain::{Metric, MetricResult, TextAnalyzer};
pub use error::{DriverError, ErrorKind};
pub use infrastructure::ResultCache;
pub use ports::{BatchEvent, BatchObserver};
