use super::DecodeError;

/// Bytes per decoded pixel (RGBA8).
pub const BYTES_PER_PIXEL: u32 = 4;

/// Image extent in pixels.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Row pitch of tightly packed RGBA8 data.
    #[inline]
    pub const fn bytes_per_row(self) -> u32 {
        self.width * BYTES_PER_PIXEL
    }
}

/// Decoded RGBA8 image, rows stored top row first.
///
/// Immutable once built: the renderer reads it once during construction and
/// the caller may drop it afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    size: ImageSize,
    pixels: Vec<u8>,
}

impl Image {
    /// Wraps tightly packed RGBA8 pixels.
    ///
    /// Fails if either extent is zero or if `pixels.len() != width * height * 4`.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, DecodeError> {
        if width == 0 || height == 0 {
            return Err(DecodeError::EmptyImage { width, height });
        }

        let expected = width as usize * height as usize * BYTES_PER_PIXEL as usize;
        if pixels.len() != expected {
            return Err(DecodeError::PixelLength {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            size: ImageSize::new(width, height),
            pixels,
        })
    }

    #[inline]
    pub fn size(&self) -> ImageSize {
        self.size
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.size.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.size.height
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Returns the RGBA bytes of the pixel at `(x, y)`, `y = 0` being the top row.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let i = (y as usize * self.size.width as usize + x as usize) * BYTES_PER_PIXEL as usize;
        let p = &self.pixels[i..i + 4];
        Some([p[0], p[1], p[2], p[3]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_exact_length() {
        let img = Image::from_rgba8(2, 3, vec![0; 24]).unwrap();
        assert_eq!(img.size(), ImageSize::new(2, 3));
        assert_eq!(img.size().bytes_per_row(), 8);
    }

    #[test]
    fn rejects_short_buffer() {
        let err = Image::from_rgba8(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(err, DecodeError::PixelLength { expected: 16, actual: 15, .. }));
    }

    #[test]
    fn rejects_zero_extent() {
        assert!(matches!(
            Image::from_rgba8(0, 4, Vec::new()),
            Err(DecodeError::EmptyImage { width: 0, height: 4 })
        ));
    }

    #[test]
    fn pixel_indexes_top_row_first() {
        let mut px = vec![0u8; 2 * 2 * 4];
        px[8..12].copy_from_slice(&[1, 2, 3, 4]); // (0, 1)
        let img = Image::from_rgba8(2, 2, px).unwrap();
        assert_eq!(img.pixel(0, 1), Some([1, 2, 3, 4]));
        assert_eq!(img.pixel(2, 0), None);
    }
}
