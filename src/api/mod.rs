pub mod dto;

pub use dto::{Report, ReportRow};
