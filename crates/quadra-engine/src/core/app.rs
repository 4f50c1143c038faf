use winit::event::WindowEvent;
use winit::window::WindowId;

use crate::coords::ViewportSize;

use super::ctx::{FrameCtx, InitCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract driven by `window::Runtime`.
///
/// Callbacks arrive serially on the event-loop thread, in this order:
/// `on_init` once, then any mix of `on_window_event`, `on_resize` and
/// `on_frame`.
pub trait App {
    /// Called once the window and GPU exist, before the first frame.
    ///
    /// An error stops the runtime and is returned from `Runtime::run`.
    fn on_init(&mut self, ctx: &mut InitCtx<'_, '_>) -> anyhow::Result<()>;

    /// Called for every window event before the runtime handles it.
    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        let _ = (window_id, event);
        AppControl::Continue
    }

    /// Called after the surface has been reconfigured for `size`.
    fn on_resize(&mut self, size: ViewportSize) {
        let _ = size;
    }

    /// Called once per redraw.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
