//! Quad geometry: six vertices, two triangles, centered on the origin.

use bytemuck::{Pod, Zeroable};
use thiserror::Error;

use crate::decode::ImageSize;

/// Vertex count of one quad (two triangles, no index buffer).
pub const NUM_VERTICES: u32 = 6;

// ── vertex ────────────────────────────────────────────────────────────────

/// Vertex layout shared with `shaders/textured_quad.wgsl`.
///
///  offset 0  position  [f32; 2]  loc 0  (pixels from quad center, +Y up)
///  offset 8  texcoord  [f32; 2]  loc 1  (normalized)
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct TexturedVertex {
    pub position: [f32; 2],
    pub texcoord: [f32; 2],
}

impl TexturedVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Float32x2  // texcoord
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TexturedVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

// ── texcoord convention ───────────────────────────────────────────────────

/// Where `v = 0` sits on the source image.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum TexcoordOrigin {
    /// `v = y / height`: row 0 of the pixel data is the bottom of the quad.
    Mathematical,
    /// `v = (height - y) / height`: compensates for top-row-first pixel data
    /// so the image's top row lands on the top edge of the quad.
    #[default]
    Raster,
}

impl TexcoordOrigin {
    #[inline]
    pub fn toggled(self) -> Self {
        match self {
            Self::Mathematical => Self::Raster,
            Self::Raster => Self::Mathematical,
        }
    }

    #[inline]
    fn v(self, y: u32, height: u32) -> f32 {
        let h = height as f32;
        match self {
            Self::Mathematical => y as f32 / h,
            Self::Raster => (h - y as f32) / h,
        }
    }
}

// ── region ────────────────────────────────────────────────────────────────

/// Rejected [`QuadRegion`].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum RegionError {
    #[error("region has zero width (start_x = end_x = {0})")]
    ZeroWidth(u32),

    #[error("region has zero height (start_y = end_y = {0})")]
    ZeroHeight(u32),

    #[error("region start_x {start_x} is not left of end_x {end_x}")]
    ReversedX { start_x: u32, end_x: u32 },

    #[error("region exceeds {width}x{height} image")]
    OutOfBounds { width: u32, height: u32 },
}

/// Sub-rectangle of the source image mapped onto the quad, in pixels.
///
/// Invariants (checked by [`QuadRegion::new`]):
/// - `start_x < end_x <= width`
/// - `start_y != end_y`, both `<= height`
///
/// `start_y` maps to the bottom edge of the quad and `end_y` to the top edge,
/// so `start_y > end_y` shows the region flipped vertically.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct QuadRegion {
    start_x: u32,
    start_y: u32,
    end_x: u32,
    end_y: u32,
}

impl QuadRegion {
    pub fn new(
        image: ImageSize,
        start_x: u32,
        start_y: u32,
        end_x: u32,
        end_y: u32,
    ) -> Result<Self, RegionError> {
        if start_x == end_x {
            return Err(RegionError::ZeroWidth(start_x));
        }
        if start_y == end_y {
            return Err(RegionError::ZeroHeight(start_y));
        }
        if start_x > end_x {
            return Err(RegionError::ReversedX { start_x, end_x });
        }
        if end_x > image.width || start_y.max(end_y) > image.height {
            return Err(RegionError::OutOfBounds {
                width: image.width,
                height: image.height,
            });
        }

        Ok(Self { start_x, start_y, end_x, end_y })
    }

    /// Region covering the whole image, bottom edge at `y = 0`.
    #[inline]
    pub fn full(image: ImageSize) -> Self {
        Self {
            start_x: 0,
            start_y: 0,
            end_x: image.width,
            end_y: image.height,
        }
    }

    #[inline]
    pub fn start(self) -> (u32, u32) {
        (self.start_x, self.start_y)
    }

    #[inline]
    pub fn end(self) -> (u32, u32) {
        (self.end_x, self.end_y)
    }

    #[inline]
    pub fn width(self) -> u32 {
        self.end_x - self.start_x
    }

    #[inline]
    pub fn height(self) -> u32 {
        self.start_y.abs_diff(self.end_y)
    }

    fn fits(self, image: ImageSize) -> bool {
        self.start_x < self.end_x
            && self.start_y != self.end_y
            && self.end_x <= image.width
            && self.start_y.max(self.end_y) <= image.height
    }
}

// ── builder ───────────────────────────────────────────────────────────────

/// Builds the two triangles of a quad showing `region` of an image.
///
/// The quad is `region.width() x region.height()` pixels centered on the
/// origin. Winding:
/// - triangle 1: bottom-right, bottom-left, top-left
/// - triangle 2: bottom-right, top-left, top-right
///
/// # Panics
///
/// If `region` does not fit `image` (regions from [`QuadRegion::new`] built
/// against the same size always fit).
pub fn build_quad(
    image: ImageSize,
    region: &QuadRegion,
    origin: TexcoordOrigin,
) -> [TexturedVertex; NUM_VERTICES as usize] {
    assert!(
        region.fits(image),
        "quad region {region:?} does not fit {}x{} image",
        image.width,
        image.height
    );

    let half_w = region.width() as f32 / 2.0;
    let half_h = region.height() as f32 / 2.0;

    let w = image.width as f32;
    let u_left = region.start_x as f32 / w;
    let u_right = region.end_x as f32 / w;
    let v_bottom = origin.v(region.start_y, image.height);
    let v_top = origin.v(region.end_y, image.height);

    let vertex = |x: f32, y: f32, u: f32, v: f32| TexturedVertex {
        position: [x, y],
        texcoord: [u, v],
    };

    let bottom_right = vertex(half_w, -half_h, u_right, v_bottom);
    let bottom_left = vertex(-half_w, -half_h, u_left, v_bottom);
    let top_left = vertex(-half_w, half_h, u_left, v_top);
    let top_right = vertex(half_w, half_h, u_right, v_top);

    #[rustfmt::skip]
    let vertices = [
        bottom_right, bottom_left, top_left,
        bottom_right, top_left, top_right,
    ];
    vertices
}
