//! Image inputs accepted by the solver.
//!
//! A solve needs decoded RGB pixels. Callers may hand over a path, encoded
//! bytes (e.g. a downloaded JPEG), any reader, or an image they already
//! decoded themselves.

use std::io::Read;
use std::path::PathBuf;

use image::{DynamicImage, RgbImage};

use crate::error::{ImageLoadError, ImageRole};

/// Where an input image comes from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Image file on disk; format guessed from content and extension.
    Path(PathBuf),
    /// Encoded image bytes held in memory.
    Bytes(Vec<u8>),
    /// Already decoded pixels.
    Decoded(DynamicImage),
}

impl ImageSource {
    /// Drain `reader` into an in-memory byte source.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, ImageLoadError> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|source| ImageLoadError::Io {
                role: ImageRole::Standalone,
                path: None,
                source,
            })?;
        Ok(Self::Bytes(bytes))
    }

    /// Decode into 8-bit RGB.
    pub fn load(&self) -> Result<RgbImage, ImageLoadError> {
        self.load_as(ImageRole::Standalone)
    }

    pub(crate) fn load_as(&self, role: ImageRole) -> Result<RgbImage, ImageLoadError> {
        let decoded = match self {
            Self::Path(path) => {
                let reader = image::ImageReader::open(path).map_err(|source| {
                    ImageLoadError::Io {
                        role,
                        path: Some(path.clone()),
                        source,
                    }
                })?;
                let reader = reader.with_guessed_format().map_err(|source| {
                    ImageLoadError::Io {
                        role,
                        path: Some(path.clone()),
                        source,
                    }
                })?;
                reader
                    .decode()
                    .map_err(|source| ImageLoadError::Decode { role, source })?
            }
            Self::Bytes(bytes) => image::load_from_memory(bytes)
                .map_err(|source| ImageLoadError::Decode { role, source })?,
            Self::Decoded(image) => return Ok(image.to_rgb8()),
        };
        Ok(decoded.to_rgb8())
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&std::path::Path> for ImageSource {
    fn from(path: &std::path::Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<DynamicImage> for ImageSource {
    fn from(image: DynamicImage) -> Self {
        Self::Decoded(image)
    }
}

impl From<RgbImage> for ImageSource {
    fn from(image: RgbImage) -> Self {
        Self::Decoded(DynamicImage::ImageRgb8(image))
    }
}
