/// Drawable size in physical pixels.
///
/// Updated in place on every surface resize and uploaded to the vertex stage
/// each frame; the quad shader maps pixel positions to NDC with it.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

impl ViewportSize {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns `[width, height]` as floats for uniform upload.
    ///
    /// Zero extents are raised to 1 so the shader never divides by zero.
    #[inline]
    pub fn as_uniform(self) -> [f32; 2] {
        [self.width.max(1) as f32, self.height.max(1) as f32]
    }
}

impl From<winit::dpi::PhysicalSize<u32>> for ViewportSize {
    fn from(size: winit::dpi::PhysicalSize<u32>) -> Self {
        Self::new(size.width, size.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_when_either_extent_is_zero() {
        assert!(ViewportSize::new(0, 10).is_empty());
        assert!(ViewportSize::new(10, 0).is_empty());
        assert!(!ViewportSize::new(1, 1).is_empty());
    }

    #[test]
    fn uniform_never_contains_zero() {
        assert_eq!(ViewportSize::new(0, 0).as_uniform(), [1.0, 1.0]);
        assert_eq!(ViewportSize::new(800, 600).as_uniform(), [800.0, 600.0]);
    }

    #[test]
    fn converts_from_physical_size() {
        let size = winit::dpi::PhysicalSize::new(640u32, 480u32);
        assert_eq!(ViewportSize::from(size), ViewportSize::new(640, 480));
    }
}
