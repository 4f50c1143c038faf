use winit::dpi::PhysicalSize;

use crate::coords::ViewportSize;
use crate::render::BackendError;

/// Window surface plus the configuration it was last given.
///
/// The surface is only configured while the drawable has a non-zero size;
/// a minimized window keeps the old configuration and yields no frames.
pub(crate) struct SurfaceSlot<'w> {
    surface: wgpu::Surface<'w>,
    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
}

impl<'w> SurfaceSlot<'w> {
    pub(crate) fn new(
        surface: wgpu::Surface<'w>,
        device: &wgpu::Device,
        config: wgpu::SurfaceConfiguration,
    ) -> Self {
        let size = PhysicalSize::new(config.width, config.height);
        let slot = Self {
            surface,
            config,
            size,
        };
        slot.configure(device);
        slot
    }

    pub(crate) fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub(crate) fn size(&self) -> ViewportSize {
        self.size.into()
    }

    /// Records the new drawable size and reconfigures if it is non-zero.
    pub(crate) fn resize(&mut self, device: &wgpu::Device, new_size: PhysicalSize<u32>) {
        self.size = new_size;
        if self.size().is_empty() {
            log::debug!("surface minimized; frames paused");
            return;
        }

        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.configure(device);
    }

    /// Acquires the next drawable.
    ///
    /// `Ok(None)` covers every recoverable case: zero size, timeout, and a
    /// lost or outdated surface (reconfigured here for the next frame).
    pub(crate) fn acquire(
        &self,
        device: &wgpu::Device,
    ) -> Result<Option<wgpu::SurfaceTexture>, BackendError> {
        if self.size().is_empty() {
            return Ok(None);
        }

        match self.surface.get_current_texture() {
            Ok(texture) => Ok(Some(texture)),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("surface lost or outdated; reconfiguring");
                self.configure(device);
                Ok(None)
            }
            Err(err @ (wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other)) => {
                log::debug!("no drawable this frame: {err}");
                Ok(None)
            }
            Err(err @ wgpu::SurfaceError::OutOfMemory) => {
                Err(BackendError::SurfaceLost(err.to_string()))
            }
        }
    }

    fn configure(&self, device: &wgpu::Device) {
        if self.size().is_empty() {
            return;
        }
        self.surface.configure(device, &self.config);
    }
}

/// Picks the surface format: an 8-bit sRGB format when `prefer_srgb` and one
/// is offered, otherwise the adapter's first choice.
pub(crate) fn pick_format(
    formats: &[wgpu::TextureFormat],
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    const SRGB: [wgpu::TextureFormat; 2] = [
        wgpu::TextureFormat::Bgra8UnormSrgb,
        wgpu::TextureFormat::Rgba8UnormSrgb,
    ];

    prefer_srgb
        .then(|| SRGB.into_iter().find(|f| formats.contains(f)))
        .flatten()
        .or_else(|| formats.first().copied())
}

pub(crate) fn pick_alpha_mode(
    modes: &[wgpu::CompositeAlphaMode],
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| modes.contains(m))
        .or_else(|| modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

#[cfg(test)]
mod tests {
    use super::*;

    use wgpu::CompositeAlphaMode as Alpha;
    use wgpu::TextureFormat as F;

    #[test]
    fn srgb_preferred_when_offered() {
        let formats = [F::Bgra8Unorm, F::Rgba8UnormSrgb];
        assert_eq!(pick_format(&formats, true), Some(F::Rgba8UnormSrgb));
        assert_eq!(pick_format(&formats, false), Some(F::Bgra8Unorm));
    }

    #[test]
    fn falls_back_to_first_format() {
        assert_eq!(pick_format(&[F::Rgb10a2Unorm, F::Bgra8Unorm], true), Some(F::Rgb10a2Unorm));
        assert_eq!(pick_format(&[], true), None);
    }

    #[test]
    fn alpha_mode_honours_supported_request() {
        let modes = [Alpha::Opaque, Alpha::PreMultiplied];
        assert_eq!(pick_alpha_mode(&modes, Some(Alpha::PreMultiplied)), Alpha::PreMultiplied);
        assert_eq!(pick_alpha_mode(&modes, Some(Alpha::PostMultiplied)), Alpha::Opaque);
        assert_eq!(pick_alpha_mode(&modes, None), Alpha::Opaque);
        assert_eq!(pick_alpha_mode(&[], None), Alpha::Auto);
    }
}
