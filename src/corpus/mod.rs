//! Benchmark corpus resolution.
//!
//! A corpus is a directory of raw pixel files named
//! `<case-name>-<width>x<height>.raw` plus a parallel directory of
//! reference-encoded files named `<case-name>.png`.
//!
//! ## Example
//!
//! ```rust,ignore
//! use png_bench::corpus::{Corpus, CorpusOptions};
//!
//! let corpus = Corpus::resolve("examples/raw", "examples/png", &CorpusOptions::default())?;
//! for entry in &corpus.entries {
//!     println!("{} {}x{}", entry.name, entry.width, entry.height);
//! }
//! ```

mod discovery;
pub mod prepare;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use discovery::parse_dimension_token;

use crate::error::Result;

/// Default extension of raw pixel files.
pub const DEFAULT_RAW_EXTENSION: &str = "raw";

/// Default extension of reference-encoded counterparts.
pub const DEFAULT_REFERENCE_EXTENSION: &str = "png";

/// File naming options for corpus resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusOptions {
    /// Extension of raw pixel files (without the dot).
    pub raw_extension: String,
    /// Extension of reference-encoded counterparts (without the dot).
    pub reference_extension: String,
}

impl Default for CorpusOptions {
    fn default() -> Self {
        Self {
            raw_extension: DEFAULT_RAW_EXTENSION.to_string(),
            reference_extension: DEFAULT_REFERENCE_EXTENSION.to_string(),
        }
    }
}

/// One benchmark case's inputs.
///
/// Carries both input forms so that each backend reads the one it needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusEntry {
    /// Case name: the raw file stem without its dimension token.
    pub name: String,

    /// Image dimensions as encoded in the raw filename.
    pub width: u32,
    pub height: u32,

    /// Raw interleaved pixel bytes.
    pub raw_path: PathBuf,

    /// Reference-encoded counterpart, if one was found.
    pub reference_path: Option<PathBuf>,
}

impl CorpusEntry {
    /// Get pixel count.
    #[must_use]
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// An ordered, resolved benchmark corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Corpus {
    /// Directory holding the raw pixel files.
    pub raw_dir: PathBuf,

    /// Directory holding the reference-encoded counterparts.
    pub reference_dir: PathBuf,

    /// Extension the raw files were matched on.
    pub raw_extension: String,

    /// Entries ordered by raw filename.
    pub entries: Vec<CorpusEntry>,
}

impl Corpus {
    /// Resolve a corpus from a raw directory and its reference directory.
    ///
    /// Fails on an empty corpus, a malformed dimension token or a duplicate
    /// case name. A missing counterpart is recorded as `None`.
    pub fn resolve(
        raw_dir: impl AsRef<Path>,
        reference_dir: impl AsRef<Path>,
        options: &CorpusOptions,
    ) -> Result<Self> {
        discovery::resolve_corpus(raw_dir.as_ref(), reference_dir.as_ref(), options)
    }

    /// Number of cases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the corpus has no cases.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in run order.
    pub fn iter(&self) -> impl Iterator<Item = &CorpusEntry> {
        self.entries.iter()
    }

    /// Entries lacking a reference counterpart.
    pub fn missing_references(&self) -> impl Iterator<Item = &CorpusEntry> {
        self.entries.iter().filter(|e| e.reference_path.is_none())
    }
}
