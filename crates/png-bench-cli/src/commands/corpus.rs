//! Corpus listing command.

use anyhow::{Context, Result};
use png_bench::Corpus;

use crate::CorpusArgs;

pub fn run(args: &CorpusArgs) -> Result<()> {
    let corpus = Corpus::resolve(&args.raw_dir, &args.reference_dir, &args.options())
        .with_context(|| format!("Failed to resolve corpus in {}", args.raw_dir.display()))?;

    println!("Corpus: {}", corpus.raw_dir.display());
    println!("  References: {}", corpus.reference_dir.display());
    println!("  Cases: {}", corpus.len());
    println!();

    let width = corpus.iter().map(|e| e.name.len()).max().unwrap_or(4).max(4);
    println!("{:<width$}  {:>11}  {:>10}  {}", "Case", "Dimensions", "Pixels", "Reference");
    println!("{:-<1$}", "", width + 38);
    for entry in corpus.iter() {
        let reference = entry
            .reference_path
            .as_ref()
            .map_or_else(|| "missing".to_string(), |p| p.display().to_string());
        println!(
            "{:<width$}  {:>11}  {:>10}  {}",
            entry.name,
            format!("{}x{}", entry.width, entry.height),
            entry.pixel_count(),
            reference
        );
    }

    let missing = corpus.missing_references().count();
    if missing > 0 {
        println!();
        println!("{missing} case(s) have no reference file; `run` will refuse to start");
    }

    Ok(())
}
