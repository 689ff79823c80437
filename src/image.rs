// src/image.rs

//! Image resources for `Rasterizer::draw_image`.
//!
//! Loading is behind the `ImageLoader` trait so scenes can be tested with
//! in-memory images; `PngImageLoader` reads PNG files from disk.

use log::trace;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure to read or decode an image resource.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("failed to read image {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: png::DecodingError,
    },
    #[error("unsupported image {path}: {reason}")]
    Unsupported { path: PathBuf, reason: String },
}

/// A decoded image: straight (non-premultiplied) RGBA, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaImage {
    pub width: u32,
    pub height: u32,
    /// `width * height * 4` bytes.
    pub data: Vec<u8>,
}

impl RgbaImage {
    /// Wraps an RGBA byte plane, checking its length against the dimensions.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        let image = Self {
            width,
            height,
            data,
        };
        image.is_well_formed().then_some(image)
    }

    /// Whether `data` holds exactly `width * height` RGBA pixels. The fields
    /// are public, so images built by hand may not.
    pub fn is_well_formed(&self) -> bool {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|n| n.checked_mul(4))
            .map_or(false, |len| len == self.data.len())
    }

    /// The RGBA pixel at `(x, y)`. Callers keep coordinates in range.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }
}

/// Source of image resources.
pub trait ImageLoader {
    fn load(&self, path: &Path) -> Result<RgbaImage, ImageError>;
}

/// Loads PNG files from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngImageLoader;

impl PngImageLoader {
    pub fn new() -> Self {
        Self
    }
}

impl ImageLoader for PngImageLoader {
    fn load(&self, path: &Path) -> Result<RgbaImage, ImageError> {
        let file = File::open(path).map_err(|source| ImageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let decode_err = |source| ImageError::Decode {
            path: path.to_path_buf(),
            source,
        };

        let mut decoder = png::Decoder::new(BufReader::new(file));
        // Expand palettes and low bit depths, strip 16-bit down to 8.
        decoder.set_transformations(png::Transformations::normalize_to_color8());
        let mut reader = decoder.read_info().map_err(decode_err)?;
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).map_err(decode_err)?;
        buf.truncate(info.buffer_size());

        let data = match info.color_type {
            png::ColorType::Rgba => buf,
            png::ColorType::Rgb => buf
                .chunks_exact(3)
                .flat_map(|c| [c[0], c[1], c[2], 255])
                .collect(),
            png::ColorType::GrayscaleAlpha => buf
                .chunks_exact(2)
                .flat_map(|c| [c[0], c[0], c[0], c[1]])
                .collect(),
            png::ColorType::Grayscale => buf.iter().flat_map(|&v| [v, v, v, 255]).collect(),
            other => {
                return Err(ImageError::Unsupported {
                    path: path.to_path_buf(),
                    reason: format!("color type {:?} after expansion", other),
                })
            }
        };

        trace!(
            "Decoded {} ({}x{}, {:?})",
            path.display(),
            info.width,
            info.height,
            info.color_type
        );

        RgbaImage::from_raw(info.width, info.height, data).ok_or_else(|| {
            ImageError::Unsupported {
                path: path.to_path_buf(),
                reason: "decoded buffer does not match image dimensions".to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufWriter;

    fn write_png(path: &Path, width: u32, height: u32, color: png::ColorType, data: &[u8]) {
        let file = File::create(path).unwrap();
        let mut encoder = png::Encoder::new(BufWriter::new(file), width, height);
        encoder.set_color(color);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(data).unwrap();
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("pixoo-render-{}-{}", std::process::id(), name))
    }

    #[test]
    fn loads_rgba_png() {
        let path = temp_path("rgba.png");
        let data = [255, 0, 0, 255, 0, 255, 0, 128];
        write_png(&path, 2, 1, png::ColorType::Rgba, &data);

        let img = PngImageLoader::new().load(&path).unwrap();
        assert_eq!((img.width, img.height), (2, 1));
        assert_eq!(img.pixel(0, 0), [255, 0, 0, 255]);
        assert_eq!(img.pixel(1, 0), [0, 255, 0, 128]);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn rgb_png_gets_opaque_alpha() {
        let path = temp_path("rgb.png");
        write_png(&path, 1, 2, png::ColorType::Rgb, &[1, 2, 3, 4, 5, 6]);

        let img = PngImageLoader::new().load(&path).unwrap();
        assert_eq!(img.pixel(0, 1), [4, 5, 6, 255]);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = PngImageLoader::new()
            .load(Path::new("/definitely/not/here.png"))
            .unwrap_err();
        assert!(matches!(err, ImageError::Io { .. }));
    }

    #[test]
    fn garbage_is_decode_error() {
        let path = temp_path("garbage.png");
        std::fs::write(&path, b"not a png at all").unwrap();
        let err = PngImageLoader::new().load(&path).unwrap_err();
        assert!(matches!(err, ImageError::Decode { .. }));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn from_raw_checks_length() {
        assert!(RgbaImage::from_raw(2, 2, vec![0; 16]).is_some());
        assert!(RgbaImage::from_raw(2, 2, vec![0; 15]).is_none());
    }

    #[test]
    fn hand_built_image_reports_short_plane() {
        let short = RgbaImage {
            width: 2,
            height: 2,
            data: vec![0; 4],
        };
        assert!(!short.is_well_formed());
        assert!(RgbaImage::from_raw(0, 0, Vec::new()).is_some_and(|img| img.is_well_formed()));
    }
}
