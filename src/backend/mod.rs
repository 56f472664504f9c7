//! Encoder backends and the registry that orders them.
//!
//! Each backend turns one [`CorpusEntry`] into an encoded file at a
//! caller-supplied path:
//! - [`external::ExternalBackend`]: the candidate encoder, run as a child process
//! - [`image_rs::ImageRsBackend`]: re-encode of the reference PNG with the `image` crate
//! - [`zune::ZuneBackend`]: re-encode with `zune-png` (optional)
//!
//! Availability is resolved once when a backend is registered. Mandatory
//! backends that are unavailable fail registration; optional ones are kept in
//! the roster but never measured.

pub mod external;
pub mod image_rs;
pub mod zune;

use std::ffi::OsStr;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::corpus::CorpusEntry;
use crate::error::{Error, Result};

pub use external::ExternalBackend;
pub use image_rs::ImageRsBackend;
pub use zune::ZuneBackend;

/// Whether a backend must be present for a run to be valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Requirement {
    /// Absence aborts the run.
    Mandatory,
    /// Absence silently removes the backend from every case.
    Optional,
}

/// Result of probing a backend at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Available,
    Unavailable(String),
}

impl Availability {
    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available => f.write_str("available"),
            Self::Unavailable(reason) => write!(f, "unavailable ({reason})"),
        }
    }
}

/// One encoder implementation.
///
/// Implementations are stateless: `encode` may be called any number of times
/// and must only touch `dest`.
pub trait EncoderBackend: Send + Sync {
    /// Stable identifier used as the report column name.
    fn name(&self) -> &str;

    /// Whether the run requires this backend.
    fn requirement(&self) -> Requirement;

    /// Whether `encode` reads the entry's reference-encoded counterpart.
    fn needs_reference(&self) -> bool {
        false
    }

    /// Check whether the backend can run. Called once, at registration.
    fn probe(&self) -> Availability {
        Availability::Available
    }

    /// Encode `entry` into a file at `dest`.
    fn encode(&self, entry: &CorpusEntry, dest: &Path) -> Result<()>;
}

/// A registered backend together with its resolved availability.
pub struct BackendDescriptor {
    backend: Box<dyn EncoderBackend>,
    availability: Availability,
}

impl BackendDescriptor {
    #[must_use]
    pub fn name(&self) -> &str {
        self.backend.name()
    }

    #[must_use]
    pub fn requirement(&self) -> Requirement {
        self.backend.requirement()
    }

    #[must_use]
    pub fn availability(&self) -> &Availability {
        &self.availability
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.availability.is_available()
    }

    #[must_use]
    pub fn backend(&self) -> &dyn EncoderBackend {
        self.backend.as_ref()
    }

    /// Fail with `MissingInput` if `entry` lacks a file this backend reads.
    pub fn check_inputs(&self, entry: &CorpusEntry) -> Result<()> {
        if self.backend.needs_reference() {
            require_reference(self.name(), entry)?;
        }
        Ok(())
    }
}

impl fmt::Debug for BackendDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendDescriptor")
            .field("name", &self.name())
            .field("requirement", &self.requirement())
            .field("availability", &self.availability)
            .finish()
    }
}

/// Ordered set of backends: mandatory first, optional last, each group in
/// registration order.
#[derive(Debug, Default)]
pub struct BackendRegistry {
    descriptors: Vec<BackendDescriptor>,
}

impl BackendRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the candidate encoder, the `image` backend and the
    /// optional `zune-png` backend.
    pub fn standard(encoder: impl AsRef<OsStr>) -> Result<Self> {
        let mut registry = Self::new();
        registry.register(Box::new(ExternalBackend::new(encoder)))?;
        registry.register(Box::new(ImageRsBackend::new()))?;
        registry.register(Box::new(ZuneBackend::new()))?;
        Ok(registry)
    }

    /// Probe and register a backend.
    ///
    /// Fails if the name is taken or if a mandatory backend is unavailable.
    pub fn register(&mut self, backend: Box<dyn EncoderBackend>) -> Result<&mut Self> {
        let name = backend.name().to_string();
        if self.get(&name).is_some() {
            return Err(Error::Config(format!("backend '{name}' registered twice")));
        }

        let availability = backend.probe();
        let requirement = backend.requirement();

        match (&availability, requirement) {
            (Availability::Unavailable(reason), Requirement::Mandatory) => {
                return Err(Error::BackendUnavailable {
                    backend: name,
                    reason: reason.clone(),
                });
            }
            (Availability::Unavailable(reason), Requirement::Optional) => {
                debug!(backend = %name, %reason, "optional backend unavailable, excluding");
            }
            (Availability::Available, _) => {
                info!(backend = %name, ?requirement, "backend available");
            }
        }

        let descriptor = BackendDescriptor { backend, availability };
        match requirement {
            Requirement::Optional => self.descriptors.push(descriptor),
            Requirement::Mandatory => {
                let at = self
                    .descriptors
                    .iter()
                    .position(|d| d.requirement() == Requirement::Optional)
                    .unwrap_or(self.descriptors.len());
                self.descriptors.insert(at, descriptor);
            }
        }

        Ok(self)
    }

    /// Exclude an optional backend from the run.
    pub fn skip(&mut self, name: &str) -> Result<()> {
        let descriptor = self
            .descriptors
            .iter_mut()
            .find(|d| d.name() == name)
            .ok_or_else(|| Error::Config(format!("unknown backend '{name}'")))?;

        if descriptor.requirement() == Requirement::Mandatory {
            return Err(Error::Config(format!("backend '{name}' is mandatory and cannot be skipped")));
        }

        descriptor.availability = Availability::Unavailable("skipped by configuration".to_string());
        Ok(())
    }

    /// All registered backends, in run order.
    #[must_use]
    pub fn descriptors(&self) -> &[BackendDescriptor] {
        &self.descriptors
    }

    /// Backends that will be measured, in run order.
    pub fn available(&self) -> impl Iterator<Item = &BackendDescriptor> {
        self.descriptors.iter().filter(|d| d.is_available())
    }

    /// Look up a backend by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&BackendDescriptor> {
        self.descriptors.iter().find(|d| d.name() == name)
    }
}

/// The entry's reference counterpart, or `MissingInput`.
pub(crate) fn require_reference<'a>(backend: &str, entry: &'a CorpusEntry) -> Result<&'a Path> {
    entry.reference_path.as_deref().ok_or_else(|| Error::MissingInput {
        backend: backend.to_string(),
        case: entry.name.clone(),
        what: "reference-encoded counterpart".to_string(),
    })
}

/// The entry's raw pixel file, or `MissingInput` if it vanished.
pub(crate) fn require_raw<'a>(backend: &str, entry: &'a CorpusEntry) -> Result<&'a Path> {
    if entry.raw_path.is_file() {
        Ok(&entry.raw_path)
    } else {
        Err(Error::MissingInput {
            backend: backend.to_string(),
            case: entry.name.clone(),
            what: format!("raw pixel file {}", entry.raw_path.display()),
        })
    }
}
