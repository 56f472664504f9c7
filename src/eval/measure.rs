//! Single-run measurement of one backend on one corpus entry.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::debug;

use crate::backend::EncoderBackend;
use crate::corpus::CorpusEntry;
use crate::error::{Error, Result};
use crate::eval::report::Measurement;

/// Prefix of per-run scratch directories.
pub const SCRATCH_PREFIX: &str = "png-bench-";

/// Run `backend` once on `entry` in a fresh scratch directory.
///
/// Only the `encode` call is timed. The scratch directory is created under
/// `scratch_root` (or the system temp dir) and removed before returning, on
/// success and on failure. Backend errors are returned as-is.
pub fn measure(
    backend: &dyn EncoderBackend,
    entry: &CorpusEntry,
    scratch_root: Option<&Path>,
) -> Result<Measurement> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(SCRATCH_PREFIX);
    let scratch = match scratch_root {
        Some(root) => builder.tempdir_in(root)?,
        None => builder.tempdir()?,
    };

    let dest = scratch
        .path()
        .join(format!("{}.{}.png", entry.name, backend.name()));

    let start = Instant::now();
    backend.encode(entry, &dest)?;
    let duration = start.elapsed();

    let size = match fs::metadata(&dest) {
        Ok(meta) if meta.is_file() => meta.len(),
        Ok(_) => return Err(missing_output(backend, dest)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(missing_output(backend, dest));
        }
        Err(e) => return Err(Error::Io(e)),
    };

    scratch.close()?;

    debug!(
        case = %entry.name,
        backend = backend.name(),
        size,
        duration_us = duration.as_micros() as u64,
        "measured"
    );

    Ok(Measurement { size, duration })
}

fn missing_output(backend: &dyn EncoderBackend, path: PathBuf) -> Error {
    Error::MissingOutput {
        backend: backend.name().to_string(),
        path,
    }
}
