use winit::window::{Window, WindowId};

use crate::coords::ViewportSize;
use crate::device::Gpu;
use crate::window::RuntimeCtx;

/// Per-window handles.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

impl WindowCtx<'_> {
    /// Current drawable size in physical pixels.
    pub fn physical_size(&self) -> ViewportSize {
        self.window.inner_size().into()
    }

    /// Tells the compositor a frame is about to be presented.
    pub fn pre_present_notify(&self) {
        self.window.pre_present_notify();
    }
}

/// Context passed to `core::App::on_init`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct InitCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a Gpu<'w>,
}

/// Per-frame context passed to `core::App::on_frame`.
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub runtime: &'a mut RuntimeCtx,
}
