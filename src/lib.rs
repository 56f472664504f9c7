//! # png-bench
//!
//! Size and speed comparison harness for PNG encoders.
//!
//! A candidate encoder (an external executable) is run over a corpus of raw
//! pixel files alongside in-process reference encoders. Each run records the
//! encoded size and the wall-clock encode time, and the results are rendered
//! as a table with the best value per case highlighted.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use png_bench::{BackendRegistry, BenchSession, Corpus, CorpusOptions, SessionConfig, TableStyle};
//!
//! let registry = BackendRegistry::standard("build/png_encoder")?;
//! let corpus = Corpus::resolve("examples/raw", "examples/png", &CorpusOptions::default())?;
//!
//! let session = BenchSession::new(SessionConfig::default(), registry);
//! let report = session.run(&corpus)?;
//! print!("{}", png_bench::eval::table::render(&report, &TableStyle::default()));
//! ```
//!
//! ## Modules
//!
//! - [`error`]: Error types for the library
//! - [`corpus`]: Corpus resolution and raw file preparation
//! - [`backend`]: Encoder backends and the backend registry
//! - [`eval`]: Measurement, session, report and table rendering

pub mod backend;
pub mod corpus;
pub mod error;
pub mod eval;

// Re-export commonly used types
pub use backend::{
    Availability, BackendDescriptor, BackendRegistry, EncoderBackend, ExternalBackend,
    ImageRsBackend, Requirement, ZuneBackend,
};
pub use corpus::{Corpus, CorpusEntry, CorpusOptions};
pub use error::{Error, Result};
pub use eval::{BenchReport, BenchSession, BenchmarkCase, Measurement, SessionConfig, TableStyle};
