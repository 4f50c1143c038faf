use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::{ImageFormat, ImageReader};

use super::{DecodeError, Image};

/// Produces decoded RGBA8 images from files.
///
/// Implementations must return rows top row first, whatever order the file
/// stores them in.
pub trait ImageSource {
    fn decode(&self, path: &Path) -> Result<Image, DecodeError>;
}

/// Decodes TGA files (and other formats the `image` crate was built with,
/// selected by file extension).
///
/// TGA has no magic number, so paths without a recognized extension are
/// decoded as TGA.
#[derive(Debug, Copy, Clone, Default)]
pub struct TgaSource;

impl TgaSource {
    pub fn new() -> Self {
        Self
    }
}

impl ImageSource for TgaSource {
    fn decode(&self, path: &Path) -> Result<Image, DecodeError> {
        let file = File::open(path).map_err(|source| DecodeError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let format = ImageFormat::from_path(path).unwrap_or(ImageFormat::Tga);

        let decoded = ImageReader::with_format(BufReader::new(file), format)
            .decode()
            .map_err(|source| DecodeError::Format {
                path: path.to_path_buf(),
                source,
            })?;

        let rgba = decoded.into_rgba8();
        let (width, height) = rgba.dimensions();

        log::debug!(
            "decoded {} as {format:?}: {width}x{height}",
            path.display()
        );

        Image::from_rgba8(width, height, rgba.into_raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds an uncompressed 32-bit true-color TGA.
    ///
    /// `rows` are given top row first as RGBA; they are written in file order
    /// (reversed when `top_left_origin` is false) and swizzled to BGRA.
    fn tga_bytes(width: u16, height: u16, rows: &[[u8; 4]], top_left_origin: bool) -> Vec<u8> {
        let mut out = vec![0u8; 18];
        out[2] = 2; // uncompressed true-color
        out[12..14].copy_from_slice(&width.to_le_bytes());
        out[14..16].copy_from_slice(&height.to_le_bytes());
        out[16] = 32;
        out[17] = 8 | if top_left_origin { 0x20 } else { 0 };

        let w = width as usize;
        let mut file_rows: Vec<&[[u8; 4]]> = rows.chunks(w).collect();
        if !top_left_origin {
            file_rows.reverse();
        }
        for row in file_rows {
            for [r, g, b, a] in row {
                out.extend_from_slice(&[*b, *g, *r, *a]);
            }
        }
        out
    }

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];

    #[test]
    fn decodes_top_left_origin_tga() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("top.tga");
        std::fs::write(&path, tga_bytes(2, 2, &[RED, RED, BLUE, BLUE], true)).unwrap();

        let img = TgaSource::new().decode(&path).unwrap();
        assert_eq!((img.width(), img.height()), (2, 2));
        assert_eq!(img.pixel(0, 0), Some(RED));
        assert_eq!(img.pixel(1, 1), Some(BLUE));
    }

    #[test]
    fn bottom_left_origin_is_returned_top_row_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bottom.tga");
        std::fs::write(&path, tga_bytes(1, 2, &[RED, BLUE], false)).unwrap();

        let img = TgaSource::new().decode(&path).unwrap();
        assert_eq!(img.pixel(0, 0), Some(RED));
        assert_eq!(img.pixel(0, 1), Some(BLUE));
    }

    #[test]
    fn extensionless_path_is_read_as_tga() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("texture");
        std::fs::write(&path, tga_bytes(1, 1, &[BLUE], true)).unwrap();

        let img = TgaSource::new().decode(&path).unwrap();
        assert_eq!(img.pixels(), &BLUE);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = TgaSource::new().decode(&dir.path().join("nope.tga")).unwrap_err();
        assert!(matches!(err, DecodeError::Io { .. }));
    }

    #[test]
    fn truncated_file_is_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.tga");
        let mut bytes = tga_bytes(4, 4, &[RED; 16], true);
        bytes.truncate(30);
        std::fs::write(&path, bytes).unwrap();

        let err = TgaSource::new().decode(&path).unwrap_err();
        assert!(matches!(err, DecodeError::Format { .. }));
    }
}
