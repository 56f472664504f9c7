//! Optional reference backend built on `zune-png`.
//!
//! Compiled in with the `zune` feature. Without it the backend still
//! registers, but probes as unavailable and is left out of every case.

use std::path::Path;

use super::{Availability, EncoderBackend, Requirement};
use crate::corpus::CorpusEntry;
use crate::error::Result;

/// Backend identifier used in reports.
pub const ZUNE: &str = "zune-png";

/// `zune-png` decode + re-encode backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZuneBackend;

impl ZuneBackend {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl EncoderBackend for ZuneBackend {
    fn name(&self) -> &str {
        ZUNE
    }

    fn requirement(&self) -> Requirement {
        Requirement::Optional
    }

    fn needs_reference(&self) -> bool {
        true
    }

    fn probe(&self) -> Availability {
        #[cfg(feature = "zune")]
        {
            match imp::self_test() {
                Ok(()) => Availability::Available,
                Err(reason) => Availability::Unavailable(reason),
            }
        }
        #[cfg(not(feature = "zune"))]
        {
            Availability::Unavailable("built without the `zune` feature".to_string())
        }
    }

    fn encode(&self, entry: &CorpusEntry, dest: &Path) -> Result<()> {
        #[cfg(feature = "zune")]
        {
            imp::encode(entry, dest)
        }
        #[cfg(not(feature = "zune"))]
        {
            let _ = (entry, dest);
            Err(crate::error::Error::BackendUnavailable {
                backend: ZUNE.to_string(),
                reason: "built without the `zune` feature".to_string(),
            })
        }
    }
}

#[cfg(feature = "zune")]
mod imp {
    use std::fs;
    use std::path::Path;

    use zune_core::bit_depth::BitDepth;
    use zune_core::colorspace::ColorSpace;
    use zune_core::options::{DecoderOptions, EncoderOptions};
    use zune_png::{PngDecoder, PngEncoder};

    use super::ZUNE;
    use crate::backend::require_reference;
    use crate::corpus::CorpusEntry;
    use crate::error::{Error, Result};

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    struct Decoded {
        pixels: Vec<u8>,
        width: usize,
        height: usize,
        colorspace: ColorSpace,
    }

    fn decode(data: &[u8]) -> std::result::Result<Decoded, String> {
        let options = DecoderOptions::default().png_set_strip_to_8bit(true);
        let mut decoder = PngDecoder::new_with_options(data, options);
        decoder.decode_headers().map_err(|e| format!("{e:?}"))?;

        let (width, height) = decoder
            .get_dimensions()
            .ok_or_else(|| "no dimensions after header decode".to_string())?;
        let colorspace = decoder
            .get_colorspace()
            .ok_or_else(|| "no colorspace after header decode".to_string())?;
        let pixels = decoder.decode_raw().map_err(|e| format!("{e:?}"))?;

        Ok(Decoded {
            pixels,
            width,
            height,
            colorspace,
        })
    }

    fn encode_pixels(image: &Decoded) -> Vec<u8> {
        let options =
            EncoderOptions::new(image.width, image.height, image.colorspace, BitDepth::Eight);
        PngEncoder::new(&image.pixels, options).encode()
    }

    /// Encode a single pixel and check the output looks like a PNG.
    pub(super) fn self_test() -> std::result::Result<(), String> {
        let probe = Decoded {
            pixels: vec![0x10, 0x20, 0x30],
            width: 1,
            height: 1,
            colorspace: ColorSpace::RGB,
        };
        let encoded = encode_pixels(&probe);
        if encoded.starts_with(&PNG_SIGNATURE) {
            Ok(())
        } else {
            Err("zune-png self-test produced no PNG signature".to_string())
        }
    }

    pub(super) fn encode(entry: &CorpusEntry, dest: &Path) -> Result<()> {
        let source = require_reference(ZUNE, entry)?;
        let data = fs::read(source)?;

        let image = decode(&data).map_err(|message| Error::Codec {
            backend: ZUNE.to_string(),
            case: entry.name.clone(),
            message: format!("decode {}: {message}", source.display()),
        })?;

        fs::write(dest, encode_pixels(&image))?;
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use image::{Rgba, RgbaImage};
        use std::path::PathBuf;

        #[test]
        fn test_self_test_passes() {
            assert_eq!(self_test(), Ok(()));
        }

        #[test]
        fn test_reencode_is_lossless() {
            let dir = tempfile::tempdir().unwrap();
            let src = dir.path().join("dots.png");
            let img = RgbaImage::from_fn(9, 4, |x, y| Rgba([x as u8 * 20, y as u8 * 50, 3, 200]));
            img.save(&src).unwrap();

            let entry = CorpusEntry {
                name: "dots".to_string(),
                width: 9,
                height: 4,
                raw_path: PathBuf::from("dots-9x4.raw"),
                reference_path: Some(src),
            };
            let dest = dir.path().join("out.png");
            encode(&entry, &dest).unwrap();

            let decoded = image::open(&dest).unwrap().to_rgba8();
            assert_eq!(decoded, img);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_optional() {
        assert_eq!(ZuneBackend::new().requirement(), Requirement::Optional);
        assert_eq!(ZuneBackend::new().name(), ZUNE);
    }

    #[cfg(not(feature = "zune"))]
    #[test]
    fn test_unavailable_without_feature() {
        assert!(!ZuneBackend::new().probe().is_available());
    }
}
