//! Image decoding.
//!
//! The renderer consumes decoded pixels only through [`ImageSource`]; file
//! formats stay behind this seam. [`TgaSource`] is the production source.

mod error;
mod bitmap;
mod source;

pub use error::DecodeError;
pub use bitmap::{Image, ImageSize, BYTES_PER_PIXEL};
pub use source::{ImageSource, TgaSource};
