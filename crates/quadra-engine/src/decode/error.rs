use std::path::PathBuf;

use thiserror::Error;

/// Failure to produce an [`Image`](super::Image).
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to read image {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image {path}")]
    Format {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("image has zero extent ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("pixel buffer holds {actual} bytes, expected {expected} for {width}x{height} RGBA8")]
    PixelLength {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}
