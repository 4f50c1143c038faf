use std::path::PathBuf;

use anyhow::Context;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowId;

use quadra_engine::coords::ViewportSize;
use quadra_engine::core::{App, AppControl, FrameCtx, InitCtx};
use quadra_engine::decode::TgaSource;
use quadra_engine::device::WgpuResources;
use quadra_engine::render::{QuadConfig, QuadRenderer, RenderError};

enum ViewerState<T> {
    Uninitialized,
    Ready(T),
}

impl<T> ViewerState<T> {
    /// The renderer, or `NotReady` if initialization has not completed.
    fn renderer(&self) -> Result<&T, RenderError> {
        match self {
            Self::Ready(renderer) => Ok(renderer),
            Self::Uninitialized => Err(RenderError::NotReady),
        }
    }
}

/// Shows one image until the window is closed or Escape is pressed.
pub struct Viewer {
    image: PathBuf,
    config: QuadConfig,
    state: ViewerState<QuadRenderer<WgpuResources>>,
}

impl Viewer {
    pub fn new(image: PathBuf, config: QuadConfig) -> Self {
        Self {
            image,
            config,
            state: ViewerState::Uninitialized,
        }
    }
}

impl App for Viewer {
    fn on_init(&mut self, ctx: &mut InitCtx<'_, '_>) -> anyhow::Result<()> {
        let size = ctx.window.physical_size();
        log::debug!("window {:?} is {}x{}", ctx.window.id, size.width, size.height);

        let renderer = QuadRenderer::load(ctx.gpu, &TgaSource, &self.image, &self.config)
            .with_context(|| format!("cannot display {}", self.image.display()))?;

        self.state = ViewerState::Ready(renderer);
        Ok(())
    }

    fn on_window_event(&mut self, _: WindowId, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed
                    && event.logical_key == Key::Named(NamedKey::Escape) =>
            {
                AppControl::Exit
            }
            _ => AppControl::Continue,
        }
    }

    fn on_resize(&mut self, size: ViewportSize) {
        if let ViewerState::Ready(renderer) = &mut self.state {
            renderer.resize(size);
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let renderer = match self.state.renderer() {
            Ok(renderer) => renderer,
            Err(e) => {
                ctx.runtime.fail(e.into());
                return AppControl::Exit;
            }
        };

        ctx.window.pre_present_notify();
        match renderer.draw(ctx.gpu) {
            Ok(_) => AppControl::Continue,
            Err(e) => {
                ctx.runtime.fail(anyhow::Error::new(e).context("frame failed"));
                AppControl::Exit
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_before_init_is_not_ready() {
        let state: ViewerState<u32> = ViewerState::Uninitialized;
        assert!(matches!(state.renderer(), Err(RenderError::NotReady)));
    }

    #[test]
    fn ready_state_yields_renderer() {
        let state = ViewerState::Ready(7u32);
        assert_eq!(state.renderer().ok(), Some(&7));
    }

    #[test]
    fn new_viewer_starts_uninitialized() {
        let viewer = Viewer::new(PathBuf::from("img.tga"), QuadConfig::default());
        assert!(matches!(viewer.state, ViewerState::Uninitialized));
        assert!(matches!(viewer.state.renderer(), Err(RenderError::NotReady)));
    }
}
