//! Backend listing command.

use std::path::Path;

use anyhow::Result;
use png_bench::backend::external::CANDIDATE;
use png_bench::{
    BackendRegistry, EncoderBackend, ExternalBackend, ImageRsBackend, Requirement, ZuneBackend,
};

pub fn run(encoder: &Path) -> Result<()> {
    // The candidate is probed on its own so a missing executable is listed
    // instead of failing registration.
    let candidate = ExternalBackend::new(encoder);
    let candidate_status = match candidate.executable() {
        Some(path) => format!("available ({})", path.display()),
        None => candidate.probe().to_string(),
    };

    let mut registry = BackendRegistry::new();
    registry
        .register(Box::new(ImageRsBackend::new()))?
        .register(Box::new(ZuneBackend::new()))?;

    println!("{:<12} {:<10} {}", "Backend", "Required", "Status");
    println!("{:-<60}", "");
    println!("{:<12} {:<10} {}", CANDIDATE, "mandatory", candidate_status);
    for descriptor in registry.descriptors() {
        let required = match descriptor.requirement() {
            Requirement::Mandatory => "mandatory",
            Requirement::Optional => "optional",
        };
        println!("{:<12} {:<10} {}", descriptor.name(), required, descriptor.availability());
    }

    Ok(())
}
