//! Corpus preparation: convert a decoded image into a raw pixel file.
//!
//! Output is RGB8, interleaved, row-major, with no header. The file is named
//! `<name>-<width>x<height>.raw` so the corpus resolver can read its
//! dimensions back from the filename.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::corpus::DEFAULT_RAW_EXTENSION;
use crate::error::{Error, Result};

/// Number of interleaved channels written per pixel.
pub const RAW_CHANNELS: usize = 3;

/// Decode `source` and write its RGB8 bytes into `out_dir`.
///
/// `name` defaults to the source file stem. Returns the written path.
pub fn write_raw(source: &Path, out_dir: &Path, name: Option<&str>) -> Result<PathBuf> {
    let name = match name {
        Some(n) => n.to_string(),
        None => source
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                Error::Config(format!("cannot derive a case name from {}", source.display()))
            })?
            .to_string(),
    };

    if name.is_empty() {
        return Err(Error::Config("case name must not be empty".to_string()));
    }

    let rgb = image::open(source)?.to_rgb8();
    let (width, height) = rgb.dimensions();

    fs::create_dir_all(out_dir)?;
    let dest = out_dir.join(format!("{name}-{width}x{height}.{DEFAULT_RAW_EXTENSION}"));
    let bytes = rgb.into_raw();
    fs::write(&dest, &bytes)?;

    debug!(
        source = %source.display(),
        dest = %dest.display(),
        bytes = bytes.len(),
        "wrote raw corpus file"
    );

    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{Corpus, CorpusOptions};

    use image::{Rgba, RgbaImage};

    #[test]
    fn test_write_raw_drops_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("dots.png");
        let img = RgbaImage::from_fn(5, 3, |x, y| Rgba([x as u8, y as u8, 7, 128]));
        img.save(&src).unwrap();

        let out = dir.path().join("raw");
        let written = write_raw(&src, &out, None).unwrap();

        assert!(written.ends_with("dots-5x3.raw"));
        let bytes = fs::read(&written).unwrap();
        assert_eq!(bytes.len(), 5 * 3 * RAW_CHANNELS);
        // Second pixel of the first row.
        assert_eq!(&bytes[3..6], &[1, 0, 7]);
    }

    #[test]
    fn test_written_file_resolves() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("input.png");
        RgbaImage::new(4, 2).save(&src).unwrap();

        let out = dir.path().join("raw");
        write_raw(&src, &out, Some("flat")).unwrap();

        let corpus = Corpus::resolve(&out, dir.path(), &CorpusOptions::default()).unwrap();
        assert_eq!(corpus.entries[0].name, "flat");
        assert_eq!((corpus.entries[0].width, corpus.entries[0].height), (4, 2));
    }

    #[test]
    fn test_empty_name_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_raw(&dir.path().join("x.png"), dir.path(), Some("")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
