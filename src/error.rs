//! Error types for png-bench operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for png-bench operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a benchmark run.
///
/// Every variant is fatal. Optional backends that are missing never surface
/// as an error; they are filtered out by the registry instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Corpus directory could not be read or is not a directory.
    #[error("Corpus error: {0}")]
    Corpus(String),

    /// No raw input files were found.
    #[error("No input: no .{extension} files found in {}", dir.display())]
    EmptyCorpus {
        /// Directory that was scanned.
        dir: PathBuf,
        /// Raw file extension that was searched for.
        extension: String,
    },

    /// A raw filename does not end in a `<width>x<height>` token.
    #[error("Malformed dimension token in {}: {reason}", path.display())]
    MalformedDimensions {
        /// Offending raw file.
        path: PathBuf,
        /// What was wrong with the name.
        reason: String,
    },

    /// Two raw files resolve to the same case name.
    #[error("Duplicate case '{name}': {} and {}", first.display(), second.display())]
    DuplicateCase {
        /// Shared case name.
        name: String,
        /// File resolved first.
        first: PathBuf,
        /// File that collided with it.
        second: PathBuf,
    },

    /// A backend needs an input the corpus entry does not have.
    #[error("Backend '{backend}' cannot run case '{case}': missing {what}")]
    MissingInput {
        /// Backend identifier.
        backend: String,
        /// Case name.
        case: String,
        /// Description of the missing input, including the expected path.
        what: String,
    },

    /// A mandatory backend could not be set up.
    #[error("Backend '{backend}' unavailable: {reason}")]
    BackendUnavailable {
        /// Backend identifier.
        backend: String,
        /// Reason the backend is unavailable.
        reason: String,
    },

    /// The external encoder failed to run or exited unsuccessfully.
    #[error("Encoder '{backend}' failed on case '{case}': {message}")]
    EncoderFailed {
        /// Backend identifier.
        backend: String,
        /// Case name.
        case: String,
        /// Exit status and captured stderr.
        message: String,
    },

    /// An in-process codec failed while decoding or encoding.
    #[error("Codec error ({backend}) on case '{case}': {message}")]
    Codec {
        /// Backend identifier.
        backend: String,
        /// Case name.
        case: String,
        /// Error message from the codec.
        message: String,
    },

    /// A backend reported success but wrote nothing at the destination.
    #[error("Backend '{backend}' produced no output at {}", path.display())]
    MissingOutput {
        /// Backend identifier.
        backend: String,
        /// Destination that was expected to exist.
        path: PathBuf,
    },

    /// Invalid harness configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error wrapper.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Image decode/encode error from the `image` crate.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
