//! Candidate encoder run as a separate executable.
//!
//! Invocation contract:
//!
//! ```text
//! <executable> <raw-input-path> <destination-path> <width> <height>
//! ```
//!
//! Exit status 0 is success. Anything else aborts the run.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use super::{Availability, EncoderBackend, Requirement, require_raw};
use crate::corpus::CorpusEntry;
use crate::error::{Error, Result};

/// Backend identifier used in reports.
pub const CANDIDATE: &str = "candidate";

/// Lines of stderr kept in a failure message.
const STDERR_TAIL_LINES: usize = 8;

/// External-process backend for the candidate encoder.
#[derive(Debug, Clone)]
pub struct ExternalBackend {
    name: String,
    program: OsString,
    resolved: std::result::Result<PathBuf, String>,
}

impl ExternalBackend {
    /// Resolve `program` (a path or a name on `PATH`) once.
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self::with_name(CANDIDATE, program)
    }

    /// Same as [`ExternalBackend::new`] with a custom report name.
    pub fn with_name(name: impl Into<String>, program: impl AsRef<OsStr>) -> Self {
        let program = program.as_ref().to_os_string();
        let resolved = which::which(&program).map_err(|e| {
            format!("encoder executable {} not found: {e}", Path::new(&program).display())
        });
        Self {
            name: name.into(),
            program,
            resolved,
        }
    }

    /// Resolved executable path, if it was found.
    #[must_use]
    pub fn executable(&self) -> Option<&Path> {
        self.resolved.as_deref().ok()
    }

    fn failure(&self, entry: &CorpusEntry, message: String) -> Error {
        Error::EncoderFailed {
            backend: self.name.clone(),
            case: entry.name.clone(),
            message,
        }
    }
}

impl EncoderBackend for ExternalBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn requirement(&self) -> Requirement {
        Requirement::Mandatory
    }

    fn probe(&self) -> Availability {
        match &self.resolved {
            Ok(_) => Availability::Available,
            Err(reason) => Availability::Unavailable(reason.clone()),
        }
    }

    fn encode(&self, entry: &CorpusEntry, dest: &Path) -> Result<()> {
        let executable = self.resolved.as_ref().map_err(|reason| Error::BackendUnavailable {
            backend: self.name.clone(),
            reason: reason.clone(),
        })?;
        let raw = require_raw(&self.name, entry)?;

        debug!(
            program = %Path::new(&self.program).display(),
            raw = %raw.display(),
            dest = %dest.display(),
            "spawning encoder"
        );

        let output = Command::new(executable)
            .arg(raw)
            .arg(dest)
            .arg(entry.width.to_string())
            .arg(entry.height.to_string())
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                self.failure(entry, format!("failed to spawn {}: {e}", executable.display()))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let tail = stderr_tail(&stderr);
            let message = if tail.is_empty() {
                format!("{}", output.status)
            } else {
                format!("{}: {tail}", output.status)
            };
            return Err(self.failure(entry, message));
        }

        Ok(())
    }
}

/// Last few non-empty stderr lines, joined with " | ".
fn stderr_tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join(" | ")
}
