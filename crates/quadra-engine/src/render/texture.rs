use crate::decode::Image;

use super::backend::{RenderBackend, TexelRegion, TextureDesc, TextureOf};
use super::error::RenderError;

/// Pixel format of uploaded images: 8-bit RGBA, matching [`Image`] byte order.
pub const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// Allocates a texture sized to `image` and copies every pixel into it.
pub fn upload_texture<B: RenderBackend>(
    backend: &B,
    image: &Image,
) -> Result<TextureOf<B>, RenderError> {
    let (width, height) = (image.width(), image.height());

    let texture = backend.create_texture(&TextureDesc {
        label: "quadra image texture",
        width,
        height,
        format: TEXTURE_FORMAT,
    })?;

    backend.upload_texture_region(
        &texture,
        TexelRegion { x: 0, y: 0, width, height },
        image.pixels(),
        image.size().bytes_per_row(),
    )?;

    log::debug!("uploaded {width}x{height} texture ({} bytes)", image.pixels().len());

    Ok(texture)
}
