//! Benchmark execution and reporting.
//!
//! - [`measure`]: times one backend on one corpus entry in an exclusive scratch dir
//! - [`session::BenchSession`]: runs every available backend over the corpus
//! - [`report`]: result types, best-value marking and totals
//! - [`table`]: console rendering

pub mod measure;
pub mod report;
pub mod session;
pub mod table;

pub use measure::measure;
pub use report::{BackendInfo, BackendResult, BenchReport, BenchmarkCase, Measurement, Total};
pub use session::{BenchSession, SessionConfig};
pub use table::TableStyle;
