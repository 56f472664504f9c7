//! Raw corpus preparation command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use png_bench::corpus::prepare::write_raw;

pub fn run(sources: &[PathBuf], out_dir: &Path, name: Option<&str>) -> Result<()> {
    if name.is_some() && sources.len() > 1 {
        bail!("--name can only be used with a single source image");
    }

    for source in sources {
        let written = write_raw(source, out_dir, name)
            .with_context(|| format!("Failed to convert {}", source.display()))?;
        println!("{}", written.display());
    }

    Ok(())
}
