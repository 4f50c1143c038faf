use std::path::Path;

use crate::coords::{ClearColor, ViewportSize};
use crate::decode::{Image, ImageSize, ImageSource};

use super::backend::{BackendResources, PassEncoder, RenderBackend};
use super::error::RenderError;
use super::geometry::{build_quad, QuadRegion, RegionError, TexcoordOrigin, NUM_VERTICES};
use super::pipeline::configure_pipeline;
use super::texture::upload_texture;

/// Which part of the image the quad shows.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum RegionSpec {
    #[default]
    Full,
    /// Pixel corners, validated against the decoded image size.
    Pixels {
        start_x: u32,
        start_y: u32,
        end_x: u32,
        end_y: u32,
    },
}

impl RegionSpec {
    pub fn resolve(self, image: ImageSize) -> Result<QuadRegion, RegionError> {
        match self {
            Self::Full => Ok(QuadRegion::full(image)),
            Self::Pixels { start_x, start_y, end_x, end_y } => {
                QuadRegion::new(image, start_x, start_y, end_x, end_y)
            }
        }
    }
}

/// Renderer configuration.
#[derive(Debug, Clone, Default)]
pub struct QuadConfig {
    pub region: RegionSpec,
    pub texcoord_origin: TexcoordOrigin,
    pub clear_color: ClearColor,
}

/// Result of one [`QuadRenderer::draw`] call.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameOutcome {
    Presented,
    /// No drawable was available; nothing was recorded or submitted.
    Skipped,
}

/// Draws one textured quad per frame.
///
/// A `QuadRenderer` only exists once every GPU resource it needs has been
/// created; construction either yields a fully usable renderer or an error.
/// All handles are owned here and released when the renderer is dropped.
///
/// The renderer is generic over the handle set `R`, not the backend, so it
/// can outlive any one borrow of the backend.
pub struct QuadRenderer<R: BackendResources> {
    pipeline: R::Pipeline,
    vertex_buffer: R::Buffer,
    texture: R::Texture,
    queue: R::Queue,

    image_size: ImageSize,
    region: QuadRegion,
    clear_color: ClearColor,
    viewport: ViewportSize,
}

impl<R: BackendResources> QuadRenderer<R> {
    /// Decodes `path` through `source`, then builds the renderer.
    pub fn load<B, S>(
        backend: &B,
        source: &S,
        path: &Path,
        config: &QuadConfig,
    ) -> Result<Self, RenderError>
    where
        B: RenderBackend<Resources = R>,
        S: ImageSource + ?Sized,
    {
        let image = source.decode(path)?;
        log::info!(
            "loaded {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );
        Self::new(backend, &image, config)
    }

    /// Builds geometry, uploads `image`, and creates the pipeline and queue.
    ///
    /// `image` is only read; the caller may drop it afterwards.
    pub fn new<B>(backend: &B, image: &Image, config: &QuadConfig) -> Result<Self, RenderError>
    where
        B: RenderBackend<Resources = R>,
    {
        let image_size = image.size();
        let region = config.region.resolve(image_size)?;

        let vertices = build_quad(image_size, &region, config.texcoord_origin);
        let vertex_buffer =
            backend.create_buffer("quadra quad vertices", bytemuck::cast_slice(&vertices))?;

        let texture = upload_texture(backend, image)?;
        let pipeline = configure_pipeline(backend, backend.output_format())?;
        let queue = backend.create_command_queue()?;

        let viewport = backend.drawable_size();
        log::info!(
            "quad renderer ready: region {:?}..{:?}, {:?} texcoords, viewport {}x{}",
            region.start(),
            region.end(),
            config.texcoord_origin,
            viewport.width,
            viewport.height
        );

        Ok(Self {
            pipeline,
            vertex_buffer,
            texture,
            queue,
            image_size,
            region,
            clear_color: config.clear_color,
            viewport,
        })
    }

    pub fn image_size(&self) -> ImageSize {
        self.image_size
    }

    pub fn region(&self) -> QuadRegion {
        self.region
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    /// Records the new drawable size for the next frame's uniform.
    pub fn resize(&mut self, size: ViewportSize) {
        log::trace!("viewport resized to {}x{}", size.width, size.height);
        self.viewport = size;
    }

    /// Records, presents and submits one frame.
    ///
    /// Order: viewport, pipeline, vertex buffer, viewport uniform, texture,
    /// draw, end encoding, schedule present, commit.
    pub fn draw<B>(&self, backend: &mut B) -> Result<FrameOutcome, RenderError>
    where
        B: RenderBackend<Resources = R>,
    {
        let Some(mut frame) = backend.acquire_frame()? else {
            log::trace!("no drawable; frame skipped");
            return Ok(FrameOutcome::Skipped);
        };

        {
            let mut pass = backend.begin_pass(&self.queue, &mut frame, self.clear_color);
            pass.set_viewport(self.viewport);
            pass.set_pipeline(&self.pipeline);
            pass.set_vertex_buffer(0, &self.vertex_buffer);
            pass.set_viewport_uniform(self.viewport);
            pass.set_fragment_texture(&self.texture);
            pass.draw(wgpu::PrimitiveTopology::TriangleList, 0..NUM_VERTICES);
            pass.end_encoding();
        }

        backend.schedule_present(&mut frame);
        backend.commit(&self.queue, frame);

        Ok(FrameOutcome::Presented)
    }
}
