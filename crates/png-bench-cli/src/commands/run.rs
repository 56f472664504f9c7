//! Benchmark command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use png_bench::eval::table::{render, render_banner};
use png_bench::{BackendRegistry, BenchSession, Corpus, SessionConfig, TableStyle};
use tracing::info;

use crate::CorpusArgs;

pub struct RunOptions {
    pub corpus: CorpusArgs,
    pub encoder: PathBuf,
    pub scratch_dir: Option<PathBuf>,
    pub report_dir: Option<PathBuf>,
    pub color: bool,
    pub skip: Vec<String>,
}

pub fn run(options: RunOptions) -> Result<()> {
    // Backends first: a missing encoder is a precondition failure, reported
    // before any corpus problem.
    let mut registry = BackendRegistry::standard(&options.encoder).with_context(|| {
        format!("Required backend missing (encoder: {})", options.encoder.display())
    })?;
    for name in &options.skip {
        registry
            .skip(name)
            .with_context(|| format!("Cannot skip backend '{name}'"))?;
    }

    let corpus = Corpus::resolve(
        &options.corpus.raw_dir,
        &options.corpus.reference_dir,
        &options.corpus.options(),
    )
    .with_context(|| {
        format!("Failed to resolve corpus in {}", options.corpus.raw_dir.display())
    })?;

    let mut config = SessionConfig::builder();
    if let Some(dir) = options.scratch_dir {
        config = config.scratch_dir(dir);
    }
    if let Some(dir) = options.report_dir {
        config = config.report_dir(dir);
    }
    let session = BenchSession::new(config.build(), registry);

    let report = session.run(&corpus).context("Benchmark aborted")?;

    println!("{}", render_banner(&report));
    print!("{}", render(&report, &TableStyle { color: options.color }));

    if let Some((json, csv)) = session
        .write_report(&report)
        .context("Failed to write report files")?
    {
        info!(json = %json.display(), csv = %csv.display(), "report written");
    }

    Ok(())
}
