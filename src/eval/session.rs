//! Benchmark session: runs every available backend over every corpus entry.
//!
//! Execution is strictly sequential. Cases run one at a time and, within a
//! case, backends run one at a time, so no measurement overlaps another. The
//! first failure aborts the whole run and no partial report is returned.

use std::path::PathBuf;

use tracing::info;

use crate::backend::BackendRegistry;
use crate::corpus::{Corpus, CorpusEntry};
use crate::error::{Error, Result};
use crate::eval::measure::measure;
use crate::eval::report::{BenchReport, BenchmarkCase};

/// Configuration for a benchmark session.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Parent directory for per-run scratch directories (system temp if unset).
    pub scratch_dir: Option<PathBuf>,

    /// Directory for JSON/CSV export of the finished report.
    pub report_dir: Option<PathBuf>,
}

impl SessionConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::default()
    }
}

/// Builder for [`SessionConfig`].
#[derive(Debug, Default)]
pub struct SessionConfigBuilder {
    scratch_dir: Option<PathBuf>,
    report_dir: Option<PathBuf>,
}

impl SessionConfigBuilder {
    /// Set the scratch parent directory.
    #[must_use]
    pub fn scratch_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(path.into());
        self
    }

    /// Set the report export directory.
    #[must_use]
    pub fn report_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_dir = Some(path.into());
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> SessionConfig {
        SessionConfig {
            scratch_dir: self.scratch_dir,
            report_dir: self.report_dir,
        }
    }
}

/// Benchmark session over a fixed backend registry.
///
/// # Example
///
/// ```rust,ignore
/// use png_bench::{BackendRegistry, BenchSession, Corpus, CorpusOptions, SessionConfig};
///
/// let registry = BackendRegistry::standard("build/png_encoder")?;
/// let corpus = Corpus::resolve("examples/raw", "examples/png", &CorpusOptions::default())?;
/// let session = BenchSession::new(SessionConfig::default(), registry);
/// let report = session.run(&corpus)?;
/// ```
pub struct BenchSession {
    config: SessionConfig,
    registry: BackendRegistry,
}

impl BenchSession {
    /// Create a new session.
    #[must_use]
    pub fn new(config: SessionConfig, registry: BackendRegistry) -> Self {
        Self { config, registry }
    }

    /// Measure every available backend on every entry, in order.
    ///
    /// Inputs are checked for every entry before the first measurement, so a
    /// missing counterpart aborts the run with nothing measured.
    pub fn run(&self, corpus: &Corpus) -> Result<BenchReport> {
        if corpus.is_empty() {
            return Err(Error::EmptyCorpus {
                dir: corpus.raw_dir.clone(),
                extension: corpus.raw_extension.clone(),
            });
        }

        if self.registry.available().next().is_none() {
            return Err(Error::Config("no available backends".to_string()));
        }

        self.check_inputs(corpus)?;

        let mut report = BenchReport::new(&self.registry);
        for (index, entry) in corpus.iter().enumerate() {
            info!(
                case = %entry.name,
                index = index + 1,
                total = corpus.len(),
                "benchmarking"
            );
            report.cases.push(self.run_case(entry)?);
        }

        Ok(report)
    }

    /// Check that every available backend has the files it reads for every entry.
    pub fn check_inputs(&self, corpus: &Corpus) -> Result<()> {
        for entry in corpus.iter() {
            for descriptor in self.registry.available() {
                descriptor.check_inputs(entry)?;
            }
        }
        Ok(())
    }

    /// Measure every available backend on a single entry.
    pub fn run_case(&self, entry: &CorpusEntry) -> Result<BenchmarkCase> {
        let mut case = BenchmarkCase::new(entry.clone());
        for descriptor in self.registry.available() {
            let measurement =
                measure(descriptor.backend(), entry, self.config.scratch_dir.as_deref())?;
            case.insert(descriptor.name(), measurement)?;
        }
        Ok(case)
    }

    /// Export the report if a report directory is configured.
    ///
    /// Returns the written JSON and CSV paths.
    pub fn write_report(&self, report: &BenchReport) -> Result<Option<(PathBuf, PathBuf)>> {
        match &self.config.report_dir {
            Some(dir) => report.write_to_dir(dir).map(Some),
            None => Ok(None),
        }
    }
}
