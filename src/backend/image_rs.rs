//! Reference backend built on the `image` crate.
//!
//! Decodes the reference PNG and re-encodes it losslessly with the strongest
//! compression and adaptive filtering.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::ImageEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};

use super::{EncoderBackend, Requirement, require_reference};
use crate::corpus::CorpusEntry;
use crate::error::{Error, Result};

/// Backend identifier used in reports.
pub const IMAGE_RS: &str = "image-rs";

/// `image` crate PNG backend.
#[derive(Debug, Clone, Copy)]
pub struct ImageRsBackend {
    compression: CompressionType,
    filter: FilterType,
}

impl ImageRsBackend {
    /// Size-optimizing settings: best compression, adaptive filter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            compression: CompressionType::Best,
            filter: FilterType::Adaptive,
        }
    }

    fn codec_error(&self, entry: &CorpusEntry, stage: &str, e: impl std::fmt::Display) -> Error {
        Error::Codec {
            backend: IMAGE_RS.to_string(),
            case: entry.name.clone(),
            message: format!("{stage}: {e}"),
        }
    }
}

impl Default for ImageRsBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl EncoderBackend for ImageRsBackend {
    fn name(&self) -> &str {
        IMAGE_RS
    }

    fn requirement(&self) -> Requirement {
        Requirement::Mandatory
    }

    fn needs_reference(&self) -> bool {
        true
    }

    fn encode(&self, entry: &CorpusEntry, dest: &Path) -> Result<()> {
        let source = require_reference(IMAGE_RS, entry)?;

        let img = image::open(source)
            .map_err(|e| self.codec_error(entry, &format!("decode {}", source.display()), e))?;

        let mut writer = BufWriter::new(File::create(dest)?);
        let encoder = PngEncoder::new_with_quality(&mut writer, self.compression, self.filter);
        encoder
            .write_image(img.as_bytes(), img.width(), img.height(), img.color().into())
            .map_err(|e| self.codec_error(entry, "encode", e))?;
        writer.flush()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::fs;
    use std::path::PathBuf;

    fn entry_with_reference(reference_path: Option<PathBuf>) -> CorpusEntry {
        CorpusEntry {
            name: "gradient".to_string(),
            width: 16,
            height: 8,
            raw_path: PathBuf::from("gradient-16x8.raw"),
            reference_path,
        }
    }

    #[test]
    fn test_reencode_is_lossless() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("gradient.png");
        let img = RgbImage::from_fn(16, 8, |x, y| Rgb([(x * 16) as u8, (y * 32) as u8, 99]));
        img.save(&src).unwrap();

        let dest = dir.path().join("out.png");
        ImageRsBackend::new()
            .encode(&entry_with_reference(Some(src)), &dest)
            .unwrap();

        let decoded = image::open(&dest).unwrap().to_rgb8();
        assert_eq!(decoded, img);
    }

    #[test]
    fn test_missing_reference() {
        let dir = tempfile::tempdir().unwrap();
        let err = ImageRsBackend::new()
            .encode(&entry_with_reference(None), &dir.path().join("out.png"))
            .unwrap_err();
        assert!(matches!(err, Error::MissingInput { .. }));
    }

    #[test]
    fn test_undecodable_reference() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("broken.png");
        fs::write(&src, b"not a png").unwrap();

        let err = ImageRsBackend::new()
            .encode(&entry_with_reference(Some(src)), &dir.path().join("out.png"))
            .unwrap_err();
        assert!(matches!(err, Error::Codec { .. }));
    }
}
